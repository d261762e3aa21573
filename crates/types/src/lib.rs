//! # heatmap-types
//!
//! Value types shared by the heatmap point index and its collaborators.
//!
//! - **Coordinates**: `Coordinate` (fixed 6-decimal precision), `PointCount`
//! - **Filters**: `QueryFilter`, the closed latitude/longitude rectangle
//! - **Results**: `QueryResult`, matched points plus their maximum count
//! - **Statistics**: `IndexStats`
//!
//! All types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use heatmap_types::bbox::QueryFilter;
//! use heatmap_types::coord::Coordinate;
//!
//! let point = Coordinate::new(1.0, 38.0000004);
//! assert_eq!(point, Coordinate::new(1.0, 38.0));
//!
//! let filter = QueryFilter::new(0.0, 2.0, 37.0, 39.0);
//! assert!(filter.contains(&point));
//! ```

pub mod bbox;
pub mod coord;
pub mod result;
pub mod stats;

pub use bbox::{FilterBound, InvalidBound, QueryFilter};
pub use coord::{COORDINATE_PRECISION, Coordinate, PointCount};
pub use result::QueryResult;
pub use stats::IndexStats;
