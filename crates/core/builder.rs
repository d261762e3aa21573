//! Builder for configuring a `Heatmap` and loading its first dataset.

use crate::config::Config;
use crate::db::Heatmap;
use crate::error::Result;
use std::path::PathBuf;

/// Builder for a [`Heatmap`] with custom configuration and an optional
/// initial dataset.
#[derive(Debug)]
pub struct HeatmapBuilder {
    config: Config,
    dataset: Option<PathBuf>,
}

impl HeatmapBuilder {
    /// Create a new builder with default configuration and no dataset.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            dataset: None,
        }
    }

    /// Set the index configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load this dataset file when building.
    pub fn dataset<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dataset = Some(path.into());
        self
    }

    /// Set the grid cell size in degrees.
    pub fn grid_cell_degrees(mut self, degrees: f64) -> Self {
        self.config = self.config.with_grid_cell_degrees(degrees);
        self
    }

    /// Build the index, loading the dataset if one was given.
    ///
    /// Fails if the configuration is invalid or the initial load fails.
    pub fn build(self) -> Result<Heatmap> {
        let heatmap = Heatmap::with_config(self.config)?;
        if let Some(path) = self.dataset {
            heatmap.load_path(path)?;
        }
        Ok(heatmap)
    }
}

impl Default for HeatmapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
