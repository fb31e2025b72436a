use crate::record::TrackingRecord;
use crate::typedef::{FrameId, PageId, Timestamp};

use super::{Replacer, Snapshot};

/// LRU-K over a dense, frame-indexed record array. Victims are chosen by a
/// linear scan for the smallest (backward K-distance, last reference) pair.
#[derive(Debug)]
pub(crate) struct ScanReplacer {
    k: usize,
    records: Vec<Option<TrackingRecord>>,
    size: usize,
}

impl ScanReplacer {
    pub(crate) fn new(capacity: usize, k: usize) -> Self {
        let mut records = Vec::with_capacity(capacity);
        records.resize_with(capacity, || None);
        Self {
            k: k.max(1),
            records,
            size: 0,
        }
    }
}

impl Replacer for ScanReplacer {
    fn admit(&mut self, frame_id: FrameId, page_id: PageId, now: Timestamp) {
        let record = TrackingRecord::new(page_id, frame_id, self.k, now);
        if self.records[frame_id].replace(record).is_none() {
            self.size += 1;
        }
    }

    fn record_access(&mut self, frame_id: FrameId, now: Timestamp) {
        if let Some(record) = self.records[frame_id].as_mut() {
            record.record_reference(now);
        }
    }

    fn peek_victim(&self) -> Option<FrameId> {
        self.records
            .iter()
            .flatten()
            .min_by_key(|record| record.history().eviction_key())
            .map(TrackingRecord::slot)
    }

    fn evict(&mut self) -> Option<FrameId> {
        let victim = self.peek_victim()?;
        self.remove(victim);
        Some(victim)
    }

    fn remove(&mut self, frame_id: FrameId) {
        if self.records[frame_id].take().is_some() {
            self.size -= 1;
        }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn k(&self) -> usize {
        self.k
    }

    fn record(&self, frame_id: FrameId) -> Option<&TrackingRecord> {
        self.records.get(frame_id).and_then(Option::as_ref)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::from_records(self.k, self.records.iter().flatten())
    }

    fn check_invariants(&self) {
        assert_eq!(self.size, self.records.iter().flatten().count());
        for (frame_id, record) in self.records.iter().enumerate() {
            if let Some(record) = record {
                record.history().check_invariants();
                assert_eq!(record.slot(), frame_id);
            }
        }
    }
}
