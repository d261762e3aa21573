//! Error types for the heatmap index.

use heatmap_types::bbox::{FilterBound, InvalidBound};
use thiserror::Error;

/// Why a dataset row was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Row does not have the expected number of fields.
    #[error("expected {expected} fields, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// A coordinate field is not a number, or lies outside the valid
    /// latitude or longitude range.
    #[error("field {column} ({name}) is not a valid coordinate: {value:?}")]
    InvalidCoordinate {
        column: usize,
        name: &'static str,
        value: String,
    },

    /// The CSV reader could not decode the row.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Heatmap index errors.
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// Malformed dataset row. Aborts the load in progress.
    #[error("parse error at line {line}: {kind}")]
    Parse { line: u64, kind: ParseErrorKind },

    /// Non-numeric filter bound supplied by the caller.
    #[error("invalid filter: {bound} value {value:?} is not a number")]
    InvalidFilter { bound: FilterBound, value: String },

    /// Filter with `min > max` on some axis, rejected under strict filtering.
    #[error("invalid filter: minimum bound exceeds maximum bound")]
    InvertedFilter,

    /// Query issued before any dataset was successfully loaded.
    #[error("index unavailable: no dataset has been loaded")]
    IndexUnavailable,

    /// IO error while reading a dataset.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HeatmapError {
    /// True for errors caused by caller input rather than index state.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. } | Self::InvertedFilter)
    }
}

impl From<InvalidBound> for HeatmapError {
    fn from(err: InvalidBound) -> Self {
        Self::InvalidFilter {
            bound: err.bound,
            value: err.value,
        }
    }
}

/// Result type for heatmap operations.
pub type Result<T> = std::result::Result<T, HeatmapError>;
