use tracing::trace;

use crate::record::TrackingRecord;
use crate::typedef::{FrameId, PageId, Timestamp};

use super::segment::{Segment, Segmentation};
use super::{Replacer, ResidentPage, Snapshot};

/// How a victim is chosen once every resident page is hot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum HotVictim {
    /// The hot page with the oldest K-th reference.
    #[default]
    KDistance,
    /// The hot list's tail, i.e. the least recently used hot page.
    Tail,
}

/// LRU-K with records kept in a frame-indexed arena and linked into cold and
/// hot recency lists.
///
/// A cold victim is the cold list's tail, found in O(1). Only when every
/// resident page is hot does the replacer consult the hot list, either
/// walking it for the oldest K-th reference or taking its tail.
#[derive(Debug)]
pub(crate) struct LrukReplacer {
    k: usize,
    hot_victim: HotVictim,
    records: Vec<Option<TrackingRecord>>,
    segments: Segmentation,
    size: usize,
}

impl LrukReplacer {
    pub(crate) fn new(capacity: usize, k: usize) -> Self {
        let mut records = Vec::with_capacity(capacity);
        records.resize_with(capacity, || None);
        Self {
            k: k.max(1),
            hot_victim: HotVictim::default(),
            records,
            segments: Segmentation::new(capacity),
            size: 0,
        }
    }

    pub(crate) fn with_hot_victim(mut self, hot_victim: HotVictim) -> Self {
        self.hot_victim = hot_victim;
        self
    }

    /// Re-files the record at the front of the list its reference count
    /// calls for.
    fn promote(&mut self, frame_id: FrameId) {
        let segment = match &self.records[frame_id] {
            Some(record) if record.is_hot() => Segment::Hot,
            Some(_) => Segment::Cold,
            None => return,
        };
        self.segments.promote(frame_id, segment);
    }

    fn oldest_kth_reference(&self) -> Option<FrameId> {
        self.segments
            .iter_from_tail(Segment::Hot)
            .filter_map(|frame_id| {
                let record = self.records[frame_id].as_ref()?;
                Some((record.history().eviction_key(), frame_id))
            })
            .min()
            .map(|(_, frame_id)| frame_id)
    }

    #[cfg(test)]
    fn list(&self, segment: Segment) -> Vec<PageId> {
        self.segments
            .iter(segment)
            .filter_map(|frame_id| self.records[frame_id].as_ref())
            .map(TrackingRecord::page_id)
            .collect()
    }
}

impl Replacer for LrukReplacer {
    fn admit(&mut self, frame_id: FrameId, page_id: PageId, now: Timestamp) {
        let record = TrackingRecord::new(page_id, frame_id, self.k, now);
        if self.records[frame_id].replace(record).is_none() {
            self.size += 1;
        }
        self.segments.promote(frame_id, Segment::Cold);
        // With K = 1 the first reference already makes the page hot.
        self.promote(frame_id);
    }

    fn record_access(&mut self, frame_id: FrameId, now: Timestamp) {
        let Some(record) = self.records[frame_id].as_mut() else {
            return;
        };
        let was_hot = record.is_hot();
        record.record_reference(now);
        if !was_hot && record.is_hot() {
            trace!(page_id = record.page_id(), "page became hot");
        }
        self.promote(frame_id);
    }

    fn peek_victim(&self) -> Option<FrameId> {
        self.segments
            .tail(Segment::Cold)
            .or_else(|| match self.hot_victim {
                HotVictim::KDistance => self.oldest_kth_reference(),
                HotVictim::Tail => self.segments.tail(Segment::Hot),
            })
    }

    fn evict(&mut self) -> Option<FrameId> {
        let victim = self.peek_victim()?;
        self.remove(victim);
        Some(victim)
    }

    fn remove(&mut self, frame_id: FrameId) {
        if self.records[frame_id].take().is_some() {
            self.segments.unlink(frame_id);
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
        let pages = |segment| -> Vec<ResidentPage> {
            self.segments
                .iter(segment)
                .filter_map(|frame_id| self.record(frame_id))
                .map(ResidentPage::from)
                .collect()
        };
        Snapshot {
            k: self.k,
            hot: pages(Segment::Hot),
            cold: pages(Segment::Cold),
        }
    }

    fn check_invariants(&self) {
        assert_eq!(
            self.size,
            self.segments.len(Segment::Cold) + self.segments.len(Segment::Hot)
        );
        assert_eq!(self.size, self.records.iter().flatten().count());

        for (frame_id, record) in self.records.iter().enumerate() {
            let segment = self.segments.segment_of(frame_id);
            match record {
                Some(record) => {
                    record.history().check_invariants();
                    assert_eq!(record.slot(), frame_id);
                    let expected = if record.is_hot() {
                        Segment::Hot
                    } else {
                        Segment::Cold
                    };
                    assert_eq!(segment, Some(expected));
                }
                None => assert_eq!(segment, None),
            }
        }

        for segment in [Segment::Cold, Segment::Hot] {
            let recency: Vec<Timestamp> = self
                .segments
                .iter(segment)
                .filter_map(|frame_id| self.record(frame_id))
                .map(|record| record.history().most_recent())
                .collect();
            assert_eq!(recency.len(), self.segments.len(segment));
            assert!(recency.windows(2).all(|pair| pair[0] > pair[1]));
        }
    }
}
