use paging::{Access, Cache, CacheConfig, IndexKind, Outcome, PageId, PolicyKind, Step};
use proptest::prelude::*;

const MAX_PAGE_ID: PageId = 12;

fn run(config: CacheConfig, references: &[PageId]) -> (Cache, Vec<Step>) {
    let mut cache = Cache::new(config).unwrap();
    let steps = cache.run(references.iter().copied()).unwrap();
    (cache, steps)
}

/// Eviction-relevant view of a run: what happened and where pages ended up.
fn trace(steps: &[Step]) -> Vec<(Outcome, Option<PageId>, Vec<Option<PageId>>)> {
    steps
        .iter()
        .map(|step| (step.outcome, step.evicted, step.occupancy.clone()))
        .collect()
}

fn references() -> impl Strategy<Value = Vec<PageId>> {
    // A few ids above MAX_PAGE_ID exercise the invalid-page path.
    prop::collection::vec(0..MAX_PAGE_ID + 3, 0..200)
}

proptest! {
    /// Index, frames and replacer agree after every reference, and a full
    /// cache never evicts a hot page while a cold one is resident.
    #[test]
    fn prop_invariants_hold(
        capacity in 1usize..8,
        k in 0usize..5,
        references in references(),
        policy in prop_oneof![
            Just(PolicyKind::Segmented),
            Just(PolicyKind::Tail),
            Just(PolicyKind::Scan),
        ],
    ) {
        let config = CacheConfig::new(capacity, k, MAX_PAGE_ID).with_policy(policy);
        let mut cache = Cache::new(config).unwrap();
        for page_id in references {
            let before = cache.snapshot();
            let full = cache.used() == cache.capacity();
            let result = cache.reference(page_id);
            cache.check_invariants();

            prop_assert!(cache.used() <= cache.capacity());
            if let Ok(Access::Miss { evicted: Some(victim), .. }) = result {
                prop_assert!(full);
                if !before.cold.is_empty() {
                    prop_assert!(before.cold.iter().any(|page| page.page_id == victim));
                }
            }
            let after = cache.snapshot();
            for page in after.hot.iter().chain(after.cold.iter()) {
                prop_assert!((1..=cache.k()).contains(&page.reference_count));
            }
        }
    }

    /// The clock moves by exactly one per valid reference and not at all on
    /// invalid ones.
    #[test]
    fn prop_clock_counts_valid_references(
        capacity in 1usize..8,
        k in 1usize..4,
        references in references(),
    ) {
        let (cache, _) = run(CacheConfig::new(capacity, k, MAX_PAGE_ID), &references);
        let valid = references.iter().filter(|&&page_id| page_id <= MAX_PAGE_ID).count() as u64;
        prop_assert_eq!(cache.clock(), valid);
        prop_assert_eq!(cache.faults() + cache.hits(), valid);
        prop_assert_eq!(cache.invalid_references(), references.len() as u64 - valid);
    }

    /// With K = 1 every reference reaches the hot threshold, so LRU-K is
    /// plain LRU.
    #[test]
    fn prop_k_one_is_lru(capacity in 1usize..8, references in references()) {
        let (_, lru) = run(
            CacheConfig::new(capacity, 1, MAX_PAGE_ID).with_policy(PolicyKind::Lru),
            &references,
        );
        for policy in [PolicyKind::Segmented, PolicyKind::Tail, PolicyKind::Scan] {
            let (_, lru_k) = run(
                CacheConfig::new(capacity, 1, MAX_PAGE_ID).with_policy(policy),
                &references,
            );
            prop_assert_eq!(trace(&lru_k), trace(&lru));
        }
    }

    /// The linked-segmentation and linear-scan replacers pick the same
    /// victims for every K.
    #[test]
    fn prop_segmented_matches_scan(
        capacity in 1usize..8,
        k in 1usize..5,
        references in references(),
    ) {
        let base = CacheConfig::new(capacity, k, MAX_PAGE_ID);
        let (segmented_cache, segmented) = run(base.clone().with_policy(PolicyKind::Segmented), &references);
        let (scan_cache, scan) = run(base.with_policy(PolicyKind::Scan), &references);
        prop_assert_eq!(trace(&segmented), trace(&scan));
        prop_assert_eq!(segmented_cache.snapshot(), scan_cache.snapshot());
    }

    /// The page index representation never changes the outcome.
    #[test]
    fn prop_dense_matches_sparse(
        capacity in 1usize..8,
        k in 1usize..4,
        references in references(),
    ) {
        let base = CacheConfig::new(capacity, k, MAX_PAGE_ID);
        let (_, dense) = run(base.clone().with_index(IndexKind::Dense), &references);
        let (_, sparse) = run(base.with_index(IndexKind::Sparse), &references);
        prop_assert_eq!(trace(&dense), trace(&sparse));
    }

    /// Replaying the same reference string on a fresh cache is deterministic.
    #[test]
    fn prop_replay_is_deterministic(
        capacity in 1usize..8,
        k in 1usize..4,
        references in references(),
    ) {
        let config = CacheConfig::new(capacity, k, MAX_PAGE_ID);
        let (first_cache, first) = run(config.clone(), &references);
        let (second_cache, second) = run(config, &references);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first_cache.faults(), second_cache.faults());
        prop_assert_eq!(first_cache.report(), second_cache.report());
    }
}
