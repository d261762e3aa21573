//! In-memory aggregate point index for geolocated network blocks.
//!
//! ## Features
//! - **Ingestion**: streaming CSV parsing of GeoLite2-style block files
//! - **Aggregation**: coordinates rounded to 6 decimals and counted per point
//! - **Spatial indexing**: owned uniform grid with closed bounding-box queries
//! - **Atomic reloads**: a new snapshot is built off to the side and swapped in;
//!   queries never see a partial index
//!
//! ```rust
//! use heatmap::{Heatmap, QueryFilter};
//!
//! let heatmap = Heatmap::new();
//! let csv = "network,geoname_id,registered,represented,proxy,satellite,postal,latitude,longitude,radius\n\
//!            2c0f:ff90::/32,1,1,,0,0,,1.0000,38.0000,100\n\
//!            2c0f:ff91::/32,1,1,,0,0,,1.0000,38.0000,100\n";
//! heatmap.load_dataset(csv.as_bytes())?;
//!
//! let result = heatmap.query(&QueryFilter::new(-90.0, 90.0, -180.0, 180.0))?;
//! assert_eq!(result.points.len(), 1);
//! assert_eq!(result.max_count, 2);
//! # Ok::<(), heatmap::HeatmapError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;

pub use builder::HeatmapBuilder;
pub use db::{Heatmap, LoadReport, Snapshot};
pub use error::{HeatmapError, ParseErrorKind, Result};

pub use config::{
    COORDINATE_PRECISION, Config, Coordinate, CsvLayout, FilterBound, IndexStats, PointCount,
    QueryFilter, QueryResult,
};

pub use compute::spatial::SpatialIndex;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Heatmap, HeatmapBuilder, HeatmapError, Result};

    pub use crate::{Config, CsvLayout};

    pub use crate::{Coordinate, PointCount, QueryFilter, QueryResult};
}
