use crate::history::ReferenceHistory;
use crate::typedef::{FrameId, PageId, Timestamp};

/// Per-resident-page tracking state. Lives exactly as long as the page is
/// resident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackingRecord {
    page_id: PageId,
    slot: FrameId,
    history: ReferenceHistory,
}

impl TrackingRecord {
    pub(crate) fn new(page_id: PageId, slot: FrameId, k: usize, now: Timestamp) -> Self {
        Self {
            page_id,
            slot,
            history: ReferenceHistory::new(k, now),
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Physical frame holding the page. Reporting only.
    pub fn slot(&self) -> FrameId {
        self.slot
    }

    pub fn history(&self) -> &ReferenceHistory {
        &self.history
    }

    pub fn reference_count(&self) -> usize {
        self.history.reference_count()
    }

    pub fn is_hot(&self) -> bool {
        self.history.is_hot()
    }

    pub(crate) fn record_reference(&mut self, now: Timestamp) {
        self.history.record_reference(now);
    }
}
