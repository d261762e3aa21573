//! Configuration for ingestion, indexing and query behaviour.
//!
//! Value types shared with collaborators are re-exported from the
//! `heatmap-types` crate for convenience.
use serde::de::Error;

pub use heatmap_types::bbox::{FilterBound, QueryFilter};
pub use heatmap_types::coord::{COORDINATE_PRECISION, Coordinate, PointCount};
pub use heatmap_types::result::QueryResult;
pub use heatmap_types::stats::IndexStats;

/// Index configuration
///
/// ```rust
/// use heatmap::Config;
///
/// let json = r#"{
///     "grid_cell_degrees": 0.5,
///     "skip_missing_coordinates": true
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.csv.expected_columns, 10);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Edge length of a spatial grid cell in degrees. The builder coarsens it
    /// when the dataset extent would need too many cells.
    #[serde(default = "Config::default_grid_cell_degrees")]
    pub grid_cell_degrees: f64,

    /// Dataset column layout
    #[serde(default)]
    pub csv: CsvLayout,

    /// Skip rows whose latitude or longitude field is empty instead of
    /// failing the load.
    #[serde(default)]
    pub skip_missing_coordinates: bool,

    /// Reject filters with `min > max` instead of returning an empty result.
    #[serde(default)]
    pub strict_filters: bool,
}

/// Column layout of the input dataset.
///
/// Defaults match the GeoLite2 `City-Blocks` files: ten columns with latitude
/// and longitude in the 8th and 9th position.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsvLayout {
    /// Exact number of fields every data row must have
    #[serde(default = "CsvLayout::default_expected_columns")]
    pub expected_columns: usize,

    /// Zero-based index of the latitude field
    #[serde(default = "CsvLayout::default_latitude_column")]
    pub latitude_column: usize,

    /// Zero-based index of the longitude field
    #[serde(default = "CsvLayout::default_longitude_column")]
    pub longitude_column: usize,

    #[serde(default = "CsvLayout::default_has_header")]
    pub has_header: bool,

    #[serde(default = "CsvLayout::default_delimiter")]
    pub delimiter: char,
}

impl CsvLayout {
    const fn default_expected_columns() -> usize {
        10
    }

    const fn default_latitude_column() -> usize {
        7
    }

    const fn default_longitude_column() -> usize {
        8
    }

    const fn default_has_header() -> bool {
        true
    }

    const fn default_delimiter() -> char {
        ','
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.expected_columns == 0 {
            return Err("Expected column count must be greater than zero".to_string());
        }

        if self.latitude_column >= self.expected_columns
            || self.longitude_column >= self.expected_columns
        {
            return Err(format!(
                "Coordinate columns ({}, {}) must be below the expected column count {}",
                self.latitude_column, self.longitude_column, self.expected_columns
            ));
        }

        if self.latitude_column == self.longitude_column {
            return Err("Latitude and longitude columns must differ".to_string());
        }

        if !self.delimiter.is_ascii() {
            return Err(format!(
                "Delimiter {:?} must be a single ASCII character",
                self.delimiter
            ));
        }

        Ok(())
    }
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            expected_columns: Self::default_expected_columns(),
            latitude_column: Self::default_latitude_column(),
            longitude_column: Self::default_longitude_column(),
            has_header: Self::default_has_header(),
            delimiter: Self::default_delimiter(),
        }
    }
}

impl Config {
    const fn default_grid_cell_degrees() -> f64 {
        1.0
    }

    pub fn with_grid_cell_degrees(mut self, degrees: f64) -> Self {
        assert!(
            degrees.is_finite() && degrees > 0.0,
            "Grid cell size must be a positive finite number of degrees"
        );
        self.grid_cell_degrees = degrees;
        self
    }

    pub fn with_csv_layout(mut self, layout: CsvLayout) -> Self {
        self.csv = layout;
        self
    }

    pub fn with_skip_missing_coordinates(mut self, skip: bool) -> Self {
        self.skip_missing_coordinates = skip;
        self
    }

    pub fn with_strict_filters(mut self, strict: bool) -> Self {
        self.strict_filters = strict;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.grid_cell_degrees.is_finite() || self.grid_cell_degrees <= 0.0 {
            return Err("Grid cell size must be a positive finite number of degrees".to_string());
        }

        self.csv.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_cell_degrees: Self::default_grid_cell_degrees(),
            csv: CsvLayout::default(),
            skip_missing_coordinates: false,
            strict_filters: false,
        }
    }
}
