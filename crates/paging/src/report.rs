use serde::{Deserialize, Serialize};

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::replacer::Snapshot;
use crate::typedef::PageId;

/// Final state of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: CacheConfig,
    pub references: u64,
    pub faults: u64,
    pub hits: u64,
    pub invalid: u64,
    pub hit_ratio: f64,
    pub final_occupancy: Vec<Option<PageId>>,
    pub snapshot: Snapshot,
}

impl SimulationReport {
    pub(crate) fn new(cache: &Cache) -> Self {
        let references = cache.faults() + cache.hits();
        let hit_ratio = if references == 0 {
            0.0
        } else {
            cache.hits() as f64 / references as f64
        };
        Self {
            config: cache.config().clone(),
            references,
            faults: cache.faults(),
            hits: cache.hits(),
            invalid: cache.invalid_references(),
            hit_ratio,
            final_occupancy: cache.occupancy().to_vec(),
            snapshot: cache.snapshot(),
        }
    }
}
