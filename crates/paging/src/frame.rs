use std::collections::VecDeque;

use crate::typedef::{FrameId, PageId};

/// Physical frame occupancy. Frames are handed out in ascending order while
/// the pool fills; afterwards an evicted frame is reused in place.
#[derive(Debug)]
pub(crate) struct FrameTable {
    frames: Vec<Option<PageId>>,
    free_list: VecDeque<FrameId>,
}

impl FrameTable {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            frames: vec![None; capacity],
            free_list: (0..capacity).collect(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn used(&self) -> usize {
        self.frames.len() - self.free_list.len()
    }

    /// Takes the lowest never-used frame, if any remain.
    pub(crate) fn take_free(&mut self) -> Option<FrameId> {
        self.free_list.pop_front()
    }

    pub(crate) fn page(&self, frame_id: FrameId) -> Option<PageId> {
        self.frames.get(frame_id).copied().flatten()
    }

    pub(crate) fn install(&mut self, frame_id: FrameId, page_id: PageId) {
        self.frames[frame_id] = Some(page_id);
    }

    /// Empties a frame, returning the page it held.
    pub(crate) fn reset(&mut self, frame_id: FrameId) -> Option<PageId> {
        self.frames[frame_id].take()
    }

    pub(crate) fn occupancy(&self) -> &[Option<PageId>] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_in_order() {
        let mut frames = FrameTable::new(3);
        assert_eq!(frames.used(), 0);
        assert_eq!(frames.take_free(), Some(0));
        assert_eq!(frames.take_free(), Some(1));
        frames.install(0, 7);
        frames.install(1, 8);
        assert_eq!(frames.used(), 2);
        assert_eq!(frames.occupancy(), &[Some(7), Some(8), None]);
        assert_eq!(frames.take_free(), Some(2));
        assert_eq!(frames.take_free(), None);
    }

    #[test]
    fn test_reset_and_reuse() {
        let mut frames = FrameTable::new(1);
        let frame_id = frames.take_free().unwrap();
        frames.install(frame_id, 4);
        assert_eq!(frames.reset(frame_id), Some(4));
        assert_eq!(frames.page(frame_id), None);
        frames.install(frame_id, 5);
        assert_eq!(frames.page(frame_id), Some(5));
        assert_eq!(frames.used(), 1);
    }
}
