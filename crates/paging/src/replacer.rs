pub(crate) mod lru_k_replacer;
pub(crate) mod lru_replacer;
pub(crate) mod scan_replacer;
pub(crate) mod segment;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PolicyKind;
use crate::record::TrackingRecord;
use crate::typedef::{FrameId, PageId, Timestamp};

use self::lru_k_replacer::{HotVictim, LrukReplacer};
use self::lru_replacer::LruReplacer;
use self::scan_replacer::ScanReplacer;

/// Victim selection over the resident pages. Records are addressed by the
/// frame holding their page.
pub(crate) trait Replacer: fmt::Debug {
    /// Starts tracking a page just installed in `frame_id`, referenced at `now`.
    fn admit(&mut self, frame_id: FrameId, page_id: PageId, now: Timestamp);

    /// Records a hit on the page in `frame_id` at `now`.
    fn record_access(&mut self, frame_id: FrameId, now: Timestamp);

    /// The frame the next `evict` would pick, without removing it.
    fn peek_victim(&self) -> Option<FrameId>;

    /// Removes the policy's victim and returns its frame.
    /// Returns `None` only when nothing is tracked.
    fn evict(&mut self) -> Option<FrameId>;

    /// Stops tracking the page in `frame_id`.
    fn remove(&mut self, frame_id: FrameId);

    /// Returns the number of tracked pages.
    fn size(&self) -> usize;

    /// Effective reference threshold.
    fn k(&self) -> usize;

    fn record(&self, frame_id: FrameId) -> Option<&TrackingRecord>;

    /// Resident pages split into hot and cold, most recently used first.
    fn snapshot(&self) -> Snapshot;

    /// Panics if internal bookkeeping disagrees with itself.
    fn check_invariants(&self);
}

pub(crate) fn build_replacer(policy: PolicyKind, capacity: usize, k: usize) -> Box<dyn Replacer> {
    match policy {
        PolicyKind::Segmented => Box::new(LrukReplacer::new(capacity, k)),
        PolicyKind::Tail => {
            Box::new(LrukReplacer::new(capacity, k).with_hot_victim(HotVictim::Tail))
        }
        PolicyKind::Scan => Box::new(ScanReplacer::new(capacity, k)),
        PolicyKind::Lru => Box::new(LruReplacer::new()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentPage {
    pub page_id: PageId,
    pub reference_count: usize,
    pub slot: FrameId,
    pub last_reference: Timestamp,
}

impl From<&TrackingRecord> for ResidentPage {
    fn from(record: &TrackingRecord) -> Self {
        Self {
            page_id: record.page_id(),
            reference_count: record.reference_count(),
            slot: record.slot(),
            last_reference: record.history().most_recent(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub k: usize,
    /// Pages with K references, most recently used first.
    pub hot: Vec<ResidentPage>,
    /// Pages with fewer than K references, most recently used first.
    pub cold: Vec<ResidentPage>,
}

impl Snapshot {
    /// Builds a snapshot from records in arbitrary order.
    pub(crate) fn from_records<'a>(
        k: usize,
        records: impl IntoIterator<Item = &'a TrackingRecord>,
    ) -> Self {
        let (mut hot, mut cold): (Vec<&TrackingRecord>, Vec<&TrackingRecord>) =
            records.into_iter().partition(|record| record.is_hot());
        hot.sort_by_key(|record| std::cmp::Reverse(record.history().most_recent()));
        cold.sort_by_key(|record| std::cmp::Reverse(record.history().most_recent()));
        Self {
            k,
            hot: hot.into_iter().map(ResidentPage::from).collect(),
            cold: cold.into_iter().map(ResidentPage::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.hot.len() + self.cold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, pages) in [("HOT >=K", &self.hot), ("COLD <K", &self.cold)] {
            write!(f, "{name} (MRU -> LRU)[{}]: ", pages.len())?;
            for page in pages {
                write!(f, "{}(r{}) ", page.page_id, page.reference_count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
