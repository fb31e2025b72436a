//! LRU-K page replacement engine.
//!
//! A [`Cache`] owns a fixed pool of frames and decides, on every miss, which
//! resident page to evict. Pages referenced fewer than K times ("cold") are
//! always evicted before pages referenced K or more times ("hot").

mod cache;
mod config;
mod frame;
mod history;
mod page_table;
mod record;
mod replacer;
mod report;
mod typedef;

pub use cache::{Access, Cache, Outcome, Step};
pub use config::{clamp_k, CacheConfig, IndexKind, PolicyKind, DENSE_INDEX_LIMIT, MAX_FRAMES};
pub use history::ReferenceHistory;
pub use page_table::PageTable;
pub use record::TrackingRecord;
pub use replacer::{ResidentPage, Snapshot};
pub use report::SimulationReport;
pub use typedef::{FrameId, PageId, Timestamp};

pub use pagesim_error::Error;

pub type Result<T> = std::result::Result<T, pagesim_error::Error>;
