use std::collections::HashMap;

use crate::record::TrackingRecord;
use crate::typedef::{FrameId, PageId, Timestamp};

use super::{Replacer, Snapshot};

/// Plain LRU. Every resident page counts as hot from its first reference,
/// which makes this LRU-K with K = 1.
#[derive(Debug)]
pub(crate) struct LruReplacer {
    node_store: HashMap<FrameId, TrackingRecord>,
}

impl LruReplacer {
    pub(crate) fn new() -> Self {
        LruReplacer {
            node_store: HashMap::new(),
        }
    }
}

impl Replacer for LruReplacer {
    fn admit(&mut self, frame_id: FrameId, page_id: PageId, now: Timestamp) {
        self.node_store
            .insert(frame_id, TrackingRecord::new(page_id, frame_id, 1, now));
    }

    /// Records an access and updates the timestamp.
    fn record_access(&mut self, frame_id: FrameId, now: Timestamp) {
        if let Some(node) = self.node_store.get_mut(&frame_id) {
            node.record_reference(now);
        }
    }

    fn peek_victim(&self) -> Option<FrameId> {
        self.node_store
            .values()
            .min_by_key(|node| node.history().most_recent()) // Find the smallest timestamp
            .map(TrackingRecord::slot)
    }

    /// Evicts the least recently used frame.
    fn evict(&mut self) -> Option<FrameId> {
        let lru_frame = self.peek_victim()?;
        self.node_store.remove(&lru_frame);
        Some(lru_frame)
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.node_store.remove(&frame_id);
    }

    fn size(&self) -> usize {
        self.node_store.len()
    }

    fn k(&self) -> usize {
        1
    }

    fn record(&self, frame_id: FrameId) -> Option<&TrackingRecord> {
        self.node_store.get(&frame_id)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::from_records(1, self.node_store.values())
    }

    fn check_invariants(&self) {
        for (&frame_id, node) in &self.node_store {
            node.history().check_invariants();
            assert_eq!(node.slot(), frame_id);
        }
    }
}
