//! Index lifecycle: dataset loading and snapshot publication.
//!
//! `Heatmap` owns the currently published [`Snapshot`]. A load runs the whole
//! ingest → aggregate → build pipeline without touching the published
//! snapshot, then swaps the new one in with a single pointer store. Readers
//! clone the current `Arc<Snapshot>` and query it without holding any lock, so
//! each query sees exactly one snapshot, old or new.

use crate::compute::spatial::SpatialIndex;
use crate::config::{Config, IndexStats};
use crate::error::{HeatmapError, Result};
use crate::ingest::{CsvIngestor, PointAggregator};
use parking_lot::{Mutex, RwLock};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

mod snapshot;

pub use snapshot::{LoadReport, Snapshot};

struct HeatmapInner {
    current: RwLock<Option<Arc<Snapshot>>>,
    /// Serializes rebuilds and holds the last published generation
    rebuild: Mutex<u64>,
    config: Config,
}

/// In-memory aggregate point index with atomic reloads.
///
/// Cheap to clone; clones share the same published snapshot.
///
/// ```rust
/// use heatmap::{Heatmap, HeatmapError, QueryFilter};
///
/// let heatmap = Heatmap::new();
/// assert!(matches!(
///     heatmap.query(&QueryFilter::unbounded()),
///     Err(HeatmapError::IndexUnavailable)
/// ));
/// ```
#[derive(Clone)]
pub struct Heatmap {
    inner: Arc<HeatmapInner>,
}

impl Heatmap {
    /// Create an empty index with default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    pub fn builder() -> crate::builder::HeatmapBuilder {
        crate::builder::HeatmapBuilder::new()
    }

    /// Create an empty index with custom configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(HeatmapError::Config)?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: Config) -> Self {
        Self {
            inner: Arc::new(HeatmapInner {
                current: RwLock::new(None),
                rebuild: Mutex::new(0),
                config,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Build a new snapshot from `source` and publish it.
    ///
    /// Loads are serialized; a concurrent call waits for the one in progress.
    /// On error nothing is published and the previous snapshot stays live.
    pub fn load_dataset<R: Read>(&self, source: R) -> Result<LoadReport> {
        self.load_from(CsvIngestor::new(source, &self.inner.config))
    }

    /// Open `path` and load it like [`Heatmap::load_dataset`].
    ///
    /// The file is opened before the rebuild lock is taken, so a missing file
    /// fails without waiting on a load in progress.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        log::info!("Loading dataset from {}", path.display());
        self.load_from(CsvIngestor::from_path(path, &self.inner.config)?)
    }

    fn load_from<R: Read>(&self, mut ingestor: CsvIngestor<R>) -> Result<LoadReport> {
        let mut generation = self.inner.rebuild.lock();
        let started = Instant::now();

        let mut aggregator = PointAggregator::new();
        if let Err(e) = aggregator.consume(&mut ingestor) {
            log::warn!(
                "Dataset load aborted after {} rows, keeping snapshot generation {}: {}",
                ingestor.rows_read(),
                *generation,
                e
            );
            return Err(e);
        }
        log::debug!(
            "Aggregated {} records into {} points",
            aggregator.records(),
            aggregator.len()
        );

        let index = SpatialIndex::build(aggregator.finish(), self.inner.config.grid_cell_degrees);
        let stats = index.stats();
        log::debug!(
            "Built {}x{} grid ({} occupied cells, {:.1} points per cell, {} degree cells)",
            stats.grid_rows,
            stats.grid_cols,
            stats.occupied_cells,
            stats.mean_cell_occupancy(),
            stats.cell_degrees
        );

        let report = LoadReport {
            generation: *generation + 1,
            rows_read: ingestor.rows_read(),
            rows_skipped: ingestor.rows_skipped(),
            distinct_points: stats.points,
            max_count: stats.max_count,
            elapsed: started.elapsed(),
        };
        if report.rows_skipped > 0 {
            log::warn!(
                "Skipped {} rows with missing coordinates",
                report.rows_skipped
            );
        }

        self.publish(Snapshot::new(index, report.clone()));
        *generation = report.generation;

        log::info!(
            "Published snapshot generation {}: {} points from {} rows in {:?}",
            report.generation,
            report.distinct_points,
            report.rows_read,
            report.elapsed
        );
        Ok(report)
    }

    fn publish(&self, snapshot: Snapshot) {
        *self.inner.current.write() = Some(Arc::new(snapshot));
    }

    /// The currently published snapshot.
    ///
    /// Holding the returned `Arc` pins that snapshot, so several queries can
    /// run against the same data even while a reload publishes a new one.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.inner
            .current
            .read()
            .clone()
            .ok_or(HeatmapError::IndexUnavailable)
    }

    /// True once a dataset has been published.
    pub fn is_loaded(&self) -> bool {
        self.inner.current.read().is_some()
    }

    /// Statistics of the published snapshot.
    pub fn stats(&self) -> Result<IndexStats> {
        Ok(self.snapshot()?.stats())
    }
}

impl Default for Heatmap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Heatmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let generation = self
            .inner
            .current
            .read()
            .as_ref()
            .map(|s| s.generation());
        f.debug_struct("Heatmap")
            .field("generation", &generation)
            .field("config", &self.inner.config)
            .finish()
    }
}
