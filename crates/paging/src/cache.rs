use pagesim_error::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::config::CacheConfig;
use crate::frame::FrameTable;
use crate::history::ReferenceHistory;
use crate::page_table::PageTable;
use crate::replacer::{build_replacer, Replacer, Snapshot};
use crate::report::SimulationReport;
use crate::typedef::{FrameId, PageId, Timestamp};
use crate::Result;

/// How a single reference was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Hit {
        slot: FrameId,
    },
    /// A page fault. `evicted` is the page that gave up `slot`, if the pool
    /// was full.
    Miss {
        slot: FrameId,
        evicted: Option<PageId>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Hit,
    Miss,
    Invalid,
}

/// One processed reference and the frame occupancy right after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub page_id: PageId,
    pub outcome: Outcome,
    pub evicted: Option<PageId>,
    pub occupancy: Vec<Option<PageId>>,
}

/// The replacement engine: a fixed pool of frames, an index from page id to
/// frame, and a replacer that picks victims on a full-pool miss.
///
/// References are processed one at a time in arrival order; every valid
/// reference advances the logical clock by one and is either a hit or a
/// fully resolved miss.
#[derive(Debug)]
pub struct Cache {
    config: CacheConfig,
    frames: FrameTable,
    page_table: PageTable,
    replacer: Box<dyn Replacer>,
    clock: Timestamp,
    faults: u64,
    hits: u64,
    invalid: u64,
}

impl Cache {
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let page_table = PageTable::new(config.resolved_index(), config.max_page_id);
        info!(
            capacity = config.capacity,
            k = config.k,
            max_page_id = config.max_page_id,
            index = ?page_table.kind(),
            policy = ?config.policy,
            "creating cache"
        );

        Ok(Self {
            frames: FrameTable::new(config.capacity),
            page_table,
            replacer: build_replacer(config.policy, config.capacity, config.k),
            clock: 0,
            faults: 0,
            hits: 0,
            invalid: 0,
            config,
        })
    }

    /// Processes one reference.
    ///
    /// Returns `Error::InvalidPage` for ids above `max_page_id`; the cache is
    /// left untouched and the clock does not advance.
    pub fn reference(&mut self, page_id: PageId) -> Result<Access> {
        if !self.page_table.contains_range(page_id) {
            let max_page_id = self.page_table.max_page_id();
            self.invalid += 1;
            warn!(page_id, max_page_id, "skipping invalid page");
            return Err(Error::InvalidPage {
                page_id,
                max_page_id,
            });
        }

        self.clock += 1;
        let now = self.clock;

        if let Some(frame_id) = self.page_table.lookup(page_id) {
            self.replacer.record_access(frame_id, now);
            self.hits += 1;
            trace!(page_id, frame_id, now, "hit");
            return Ok(Access::Hit { slot: frame_id });
        }

        self.faults += 1;
        let (frame_id, evicted) = self.get_free_frame();

        self.page_table.insert(page_id, frame_id)?;
        self.frames.install(frame_id, page_id);
        self.replacer.admit(frame_id, page_id, now);
        debug!(page_id, frame_id, now, ?evicted, "miss");

        Ok(Access::Miss {
            slot: frame_id,
            evicted,
        })
    }

    /// Finds a frame for a new page: a never-used frame while the pool fills,
    /// otherwise the replacer's victim, whose page is dropped from the index.
    fn get_free_frame(&mut self) -> (FrameId, Option<PageId>) {
        if let Some(frame_id) = self.frames.take_free() {
            return (frame_id, None);
        }

        let frame_id = self
            .replacer
            .evict()
            .expect("a full cache always has an eviction candidate");
        let evicted = self.frames.reset(frame_id);
        if let Some(victim) = evicted {
            self.page_table.remove(victim);
            debug!(page_id = victim, frame_id, "evicted");
        }
        (frame_id, evicted)
    }

    /// Processes a whole reference string, recording every step. Recoverable
    /// errors are recorded as invalid references that repeat the previous
    /// occupancy; any other error stops the run.
    pub fn run<I>(&mut self, references: I) -> Result<Vec<Step>>
    where
        I: IntoIterator<Item = PageId>,
    {
        let mut steps = Vec::new();
        for page_id in references {
            let (outcome, evicted) = match self.reference(page_id) {
                Ok(Access::Hit { .. }) => (Outcome::Hit, None),
                Ok(Access::Miss { evicted, .. }) => (Outcome::Miss, evicted),
                Err(err) if err.is_recoverable() => (Outcome::Invalid, None),
                Err(err) => return Err(err),
            };
            steps.push(Step {
                page_id,
                outcome,
                evicted,
                occupancy: self.occupancy().to_vec(),
            });
        }
        Ok(steps)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.frames.capacity()
    }

    /// Effective K. Always 1 under plain LRU.
    pub fn k(&self) -> usize {
        self.replacer.k()
    }

    pub fn used(&self) -> usize {
        self.frames.used()
    }

    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    pub fn faults(&self) -> u64 {
        self.faults
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn invalid_references(&self) -> u64 {
        self.invalid
    }

    /// Page held by each frame, in frame order.
    pub fn occupancy(&self) -> &[Option<PageId>] {
        self.frames.occupancy()
    }

    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.page_table.lookup(page_id).is_some()
    }

    pub fn reference_count(&self, page_id: PageId) -> Option<usize> {
        self.history(page_id).map(ReferenceHistory::reference_count)
    }

    pub fn history(&self, page_id: PageId) -> Option<&ReferenceHistory> {
        let frame_id = self.page_table.lookup(page_id)?;
        self.replacer.record(frame_id).map(|record| record.history())
    }

    /// The page the next full-pool miss would evict.
    pub fn next_victim(&self) -> Option<PageId> {
        let frame_id = self.replacer.peek_victim()?;
        self.frames.page(frame_id)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.replacer.snapshot()
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport::new(self)
    }

    /// Panics if the index, the frames and the replacer disagree about which
    /// pages are resident.
    pub fn check_invariants(&self) {
        let used = self.frames.used();
        assert!(used <= self.frames.capacity());
        assert_eq!(used, self.page_table.len());
        assert_eq!(used, self.replacer.size());
        assert_eq!(used, self.snapshot().len());

        for (frame_id, page) in self.frames.occupancy().iter().enumerate() {
            match (page, self.replacer.record(frame_id)) {
                (Some(page_id), Some(record)) => {
                    assert_eq!(self.page_table.lookup(*page_id), Some(frame_id));
                    assert_eq!(record.page_id(), *page_id);
                    assert!(record.history().most_recent() <= self.clock);
                }
                (None, None) => {}
                (page, record) => panic!(
                    "frame {frame_id} holds {page:?} but tracks {:?}",
                    record.map(|record| record.page_id())
                ),
            }
        }
        self.replacer.check_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndexKind, PolicyKind};

    fn cache(capacity: usize, k: usize, max_page_id: PageId) -> Cache {
        Cache::new(CacheConfig::new(capacity, k, max_page_id)).unwrap()
    }

    #[test]
    fn test_zero_capacity() {
        let err = Cache::new(CacheConfig::new(0, 2, 10)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_huge_capacity_rejected_before_allocating() {
        let err = Cache::new(CacheConfig::new(usize::MAX, 2, 10)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_fill_then_hit() {
        let mut cache = cache(3, 2, 10);
        assert_eq!(cache.reference(1), Ok(Access::Miss { slot: 0, evicted: None }));
        assert_eq!(cache.reference(2), Ok(Access::Miss { slot: 1, evicted: None }));
        assert_eq!(cache.reference(1), Ok(Access::Hit { slot: 0 }));
        assert_eq!(cache.occupancy(), &[Some(1), Some(2), None]);
        assert_eq!(cache.faults(), 2);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.used(), 2);
        assert_eq!(cache.reference_count(1), Some(2));
        assert_eq!(cache.history(1).map(ReferenceHistory::to_vec), Some(vec![3, 1]));
        cache.check_invariants();
    }

    #[test]
    fn test_eviction_reuses_slot() {
        let mut cache = cache(2, 2, 10);
        cache.reference(1).unwrap();
        cache.reference(2).unwrap();
        assert_eq!(cache.next_victim(), Some(1));
        assert_eq!(cache.reference(3), Ok(Access::Miss { slot: 0, evicted: Some(1) }));
        assert_eq!(cache.occupancy(), &[Some(3), Some(2)]);
        assert!(!cache.is_resident(1));
        assert_eq!(cache.reference_count(1), None);
        cache.check_invariants();
    }

    #[test]
    fn test_invalid_page_is_a_no_op() {
        let mut cache = cache(2, 2, 5);
        cache.reference(1).unwrap();
        let clock = cache.clock();

        let err = cache.reference(6).unwrap_err();
        assert_eq!(err, Error::InvalidPage { page_id: 6, max_page_id: 5 });
        assert_eq!(cache.clock(), clock);
        assert_eq!(cache.faults(), 1);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.invalid_references(), 1);
        assert_eq!(cache.occupancy(), &[Some(1), None]);
        cache.check_invariants();
    }

    #[test]
    fn test_clock_advances_per_valid_reference() {
        let mut cache = cache(2, 2, 5);
        for (expected, page_id) in (1..).zip([1, 1, 2, 3, 1]) {
            cache.reference(page_id).unwrap();
            assert_eq!(cache.clock(), expected);
        }
    }

    #[test]
    fn test_run_records_steps() {
        let mut cache = cache(2, 2, 4);
        let steps = cache.run([1, 9, 2, 1, 3]).unwrap();

        let outcomes: Vec<Outcome> = steps.iter().map(|step| step.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Miss, Outcome::Invalid, Outcome::Miss, Outcome::Hit, Outcome::Miss]
        );
        assert_eq!(steps[1].occupancy, steps[0].occupancy);
        assert_eq!(steps[4].evicted, Some(2));
        assert_eq!(steps[4].occupancy, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_sparse_index_with_large_ids() {
        let config = CacheConfig::new(2, 2, u64::MAX).with_index(IndexKind::Auto);
        let mut cache = Cache::new(config).unwrap();
        cache.reference(u64::MAX).unwrap();
        cache.reference(1 << 40).unwrap();
        cache.reference(u64::MAX).unwrap();
        assert_eq!(cache.faults(), 2);
        assert_eq!(cache.reference_count(u64::MAX), Some(2));
        cache.check_invariants();
    }

    #[test]
    fn test_lru_policy_reports_k_one() {
        let config = CacheConfig::new(2, 4, 10).with_policy(PolicyKind::Lru);
        let cache = Cache::new(config).unwrap();
        assert_eq!(cache.k(), 1);
    }
}
