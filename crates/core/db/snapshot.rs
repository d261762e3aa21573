//! Published index snapshots.
//!
//! A snapshot is one complete, immutable spatial index built from a single
//! dataset load, together with the metadata of that load.

use crate::compute::spatial::{SpatialIndex, range_query};
use crate::config::{IndexStats, QueryFilter, QueryResult};
use serde::Serialize;
use std::time::{Duration, SystemTime};

/// Outcome of a successful dataset load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Monotonic number of the published snapshot, starting at 1
    pub generation: u64,
    /// Data rows read from the source
    pub rows_read: u64,
    /// Rows skipped for missing coordinates
    pub rows_skipped: u64,
    /// Distinct rounded coordinates indexed
    pub distinct_points: usize,
    /// Largest per-coordinate count
    pub max_count: u64,
    /// Time spent ingesting and building
    pub elapsed: Duration,
}

/// An immutable, queryable index built from one dataset load.
#[derive(Debug)]
pub struct Snapshot {
    index: SpatialIndex,
    report: LoadReport,
    loaded_at: SystemTime,
}

impl Snapshot {
    pub(crate) fn new(index: SpatialIndex, report: LoadReport) -> Self {
        Self {
            index,
            report,
            loaded_at: SystemTime::now(),
        }
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn generation(&self) -> u64 {
        self.report.generation
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Run a range query against this snapshot without filter validation.
    pub fn query(&self, filter: &QueryFilter) -> QueryResult {
        range_query(&self.index, filter)
    }
}
