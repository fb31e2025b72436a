use std::collections::HashMap;

use pagesim_error::Error;

use crate::config::{IndexKind, DENSE_INDEX_LIMIT};
use crate::typedef::{FrameId, PageId};
use crate::Result;

/// Identity map from a resident page to the frame (and record handle) that
/// holds it. Ids above `max_page_id` are never stored.
#[derive(Debug)]
pub struct PageTable {
    max_page_id: PageId,
    repr: Repr,
}

#[derive(Debug)]
enum Repr {
    Dense {
        slots: Vec<Option<FrameId>>,
        len: usize,
    },
    Sparse(HashMap<PageId, FrameId>),
}

impl PageTable {
    /// A dense table is only built below [`DENSE_INDEX_LIMIT`]; a larger id
    /// space always gets the hash map, whatever `kind` asks for.
    pub fn new(kind: IndexKind, max_page_id: PageId) -> Self {
        let dense = match kind {
            IndexKind::Dense | IndexKind::Auto => max_page_id < DENSE_INDEX_LIMIT,
            IndexKind::Sparse => false,
        };
        let repr = if dense {
            Repr::Dense {
                slots: vec![None; max_page_id as usize + 1],
                len: 0,
            }
        } else {
            Repr::Sparse(HashMap::new())
        };
        Self { max_page_id, repr }
    }

    pub fn kind(&self) -> IndexKind {
        match self.repr {
            Repr::Dense { .. } => IndexKind::Dense,
            Repr::Sparse(_) => IndexKind::Sparse,
        }
    }

    pub fn max_page_id(&self) -> PageId {
        self.max_page_id
    }

    pub fn contains_range(&self, page_id: PageId) -> bool {
        page_id <= self.max_page_id
    }

    pub fn lookup(&self, page_id: PageId) -> Option<FrameId> {
        if !self.contains_range(page_id) {
            return None;
        }
        match &self.repr {
            Repr::Dense { slots, .. } => slots[page_id as usize],
            Repr::Sparse(map) => map.get(&page_id).copied(),
        }
    }

    /// Maps `page_id` to `frame_id`, replacing any previous mapping.
    pub fn insert(&mut self, page_id: PageId, frame_id: FrameId) -> Result<()> {
        if !self.contains_range(page_id) {
            return Err(Error::OutOfRange(page_id));
        }
        match &mut self.repr {
            Repr::Dense { slots, len } => {
                if slots[page_id as usize].replace(frame_id).is_none() {
                    *len += 1;
                }
            }
            Repr::Sparse(map) => {
                map.insert(page_id, frame_id);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, page_id: PageId) -> Option<FrameId> {
        if !self.contains_range(page_id) {
            return None;
        }
        match &mut self.repr {
            Repr::Dense { slots, len } => {
                let removed = slots[page_id as usize].take();
                if removed.is_some() {
                    *len -= 1;
                }
                removed
            }
            Repr::Sparse(map) => map.remove(&page_id),
        }
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Dense { len, .. } => *len,
            Repr::Sparse(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both(max_page_id: PageId) -> [PageTable; 2] {
        [
            PageTable::new(IndexKind::Dense, max_page_id),
            PageTable::new(IndexKind::Sparse, max_page_id),
        ]
    }

    #[test]
    fn test_insert_lookup_remove() {
        for mut table in both(10) {
            table.insert(3, 0).unwrap();
            table.insert(10, 1).unwrap();
            assert_eq!(table.len(), 2);
            assert_eq!(table.lookup(3), Some(0));
            assert_eq!(table.lookup(10), Some(1));
            assert_eq!(table.lookup(4), None);

            assert_eq!(table.remove(3), Some(0));
            assert_eq!(table.remove(3), None);
            assert_eq!(table.lookup(3), None);
            assert_eq!(table.len(), 1);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        for mut table in both(4) {
            assert_eq!(table.insert(5, 0), Err(Error::OutOfRange(5)));
            assert_eq!(table.lookup(5), None);
            assert_eq!(table.remove(5), None);
            assert!(table.is_empty());
        }
    }

    #[test]
    fn test_reinsert_keeps_len() {
        for mut table in both(4) {
            table.insert(2, 0).unwrap();
            table.insert(2, 1).unwrap();
            assert_eq!(table.len(), 1);
            assert_eq!(table.lookup(2), Some(1));
        }
    }

    #[test]
    fn test_kind() {
        assert_eq!(PageTable::new(IndexKind::Dense, 8).kind(), IndexKind::Dense);
        assert_eq!(PageTable::new(IndexKind::Sparse, 8).kind(), IndexKind::Sparse);
        assert_eq!(PageTable::new(IndexKind::Auto, 8).kind(), IndexKind::Dense);
        assert_eq!(
            PageTable::new(IndexKind::Auto, DENSE_INDEX_LIMIT).kind(),
            IndexKind::Sparse
        );
    }

    #[test]
    fn test_dense_request_beyond_limit_uses_map() {
        let mut table = PageTable::new(IndexKind::Dense, u64::MAX);
        assert_eq!(table.kind(), IndexKind::Sparse);
        assert_eq!(table.max_page_id(), u64::MAX);
        assert_eq!(table.lookup(u64::MAX), None);
        table.insert(u64::MAX, 0).unwrap();
        assert_eq!(table.lookup(u64::MAX), Some(0));
        assert_eq!(table.remove(u64::MAX), Some(0));
    }
}
