use pagesim_error::errconfig;
use serde::{Deserialize, Serialize};

use crate::typedef::PageId;
use crate::Result;

/// Largest `max_page_id` for which a dense, array-backed page index is used.
pub const DENSE_INDEX_LIMIT: PageId = 1 << 20;

/// Largest frame count a cache accepts. Frames and records are allocated up
/// front, so the bound is checked before anything is built.
pub const MAX_FRAMES: usize = 1 << 20;

/// Representation of the page index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// One slot per valid page id. Best for small, dense id spaces.
    Dense,
    /// Hash map keyed by page id. Best for large, sparse id spaces.
    Sparse,
    /// Dense up to [`DENSE_INDEX_LIMIT`], sparse above it.
    #[default]
    Auto,
}

/// Victim selection policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// LRU-K over an arena of records linked into cold and hot recency lists.
    #[default]
    Segmented,
    /// LRU-K over a dense record array, choosing victims by a linear scan.
    Scan,
    /// Like `Segmented`, but once no cold page remains the victim is the hot
    /// list's tail: the least recently used hot page, not the one with the
    /// oldest K-th reference.
    Tail,
    /// Plain LRU, ignoring K.
    Lru,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of physical frames.
    pub capacity: usize,
    /// LRU-K threshold, at least 1.
    pub k: usize,
    /// Valid page ids are `0..=max_page_id`.
    pub max_page_id: PageId,
    pub index: IndexKind,
    pub policy: PolicyKind,
}

/// Clamps a signed K from user input to the smallest meaningful threshold.
pub fn clamp_k(k: i64) -> usize {
    usize::try_from(k).unwrap_or(0).max(1)
}

impl CacheConfig {
    pub fn new(capacity: usize, k: usize, max_page_id: PageId) -> Self {
        Self {
            capacity,
            k: k.max(1),
            max_page_id,
            index: IndexKind::Auto,
            policy: PolicyKind::Segmented,
        }
    }

    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Checks the configuration before any reference is processed.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return errconfig!("frame count must be positive");
        }
        if self.capacity > MAX_FRAMES {
            return errconfig!(
                "frame count {} exceeds the limit of {MAX_FRAMES}",
                self.capacity
            );
        }
        if self.k == 0 {
            return errconfig!("K must be at least 1");
        }
        if self.index == IndexKind::Dense && self.max_page_id >= DENSE_INDEX_LIMIT {
            return errconfig!(
                "dense page index supports page ids below {DENSE_INDEX_LIMIT}, got max page {}",
                self.max_page_id
            );
        }
        Ok(())
    }

    /// The index representation actually used, with `Auto` resolved.
    pub fn resolved_index(&self) -> IndexKind {
        match self.index {
            IndexKind::Auto if self.max_page_id < DENSE_INDEX_LIMIT => IndexKind::Dense,
            IndexKind::Auto => IndexKind::Sparse,
            kind => kind,
        }
    }
}
