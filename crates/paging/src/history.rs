use std::collections::VecDeque;

use crate::typedef::Timestamp;

/// The last K reference times of one resident page, most recent first, and a
/// reference count that saturates at K.
///
/// Once the count reaches K the page is "hot" and the K-th entry is its
/// backward K-distance. Before that the distance is treated as infinitely old
/// (timestamp 0), so every cold page ranks below every hot page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceHistory {
    k: usize,
    reference_count: usize,
    timestamps: VecDeque<Timestamp>,
}

impl ReferenceHistory {
    /// History of a page admitted at `now`.
    pub fn new(k: usize, now: Timestamp) -> Self {
        let k = k.max(1);
        let mut timestamps = VecDeque::with_capacity(k);
        timestamps.push_front(now);
        Self {
            k,
            reference_count: 1,
            timestamps,
        }
    }

    /// Records a reference at `now`: the newest stamp goes in front and the
    /// oldest falls off once K are held.
    pub fn record_reference(&mut self, now: Timestamp) {
        debug_assert!(
            self.timestamps.front().map_or(true, |&last| now > last),
            "reference time must increase"
        );
        self.timestamps.push_front(now);
        self.timestamps.truncate(self.k);
        if self.reference_count < self.k {
            self.reference_count += 1;
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn reference_count(&self) -> usize {
        self.reference_count
    }

    pub fn is_hot(&self) -> bool {
        self.reference_count == self.k
    }

    pub fn most_recent(&self) -> Timestamp {
        self.timestamps.front().copied().unwrap_or_default()
    }

    /// Time of the K-th most recent reference, if the page has been
    /// referenced K times.
    pub fn kth_most_recent(&self) -> Option<Timestamp> {
        if self.is_hot() {
            self.timestamps.get(self.k - 1).copied()
        } else {
            None
        }
    }

    /// Backward K-distance surrogate: the K-th most recent time, or 0 while
    /// the page is cold.
    pub fn backward_k_distance(&self) -> Timestamp {
        self.kth_most_recent().unwrap_or(0)
    }

    /// Ordering key for victim selection. The smallest key is evicted.
    pub fn eviction_key(&self) -> (Timestamp, Timestamp) {
        (self.backward_k_distance(), self.most_recent())
    }

    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.timestamps.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Timestamp> {
        self.timestamps().collect()
    }

    /// Panics unless the count and stamps agree and stamps strictly decrease.
    pub fn check_invariants(&self) {
        assert!((1..=self.k).contains(&self.reference_count));
        assert_eq!(self.timestamps.len(), self.reference_count.min(self.k));
        assert!(self
            .timestamps
            .iter()
            .zip(self.timestamps.iter().skip(1))
            .all(|(newer, older)| newer > older));
    }
}
