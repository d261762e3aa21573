pub mod grid;
pub use grid::{MAX_GRID_CELLS, SpatialIndex};

pub mod queries;
pub use queries::{range_query, validate_filter};
