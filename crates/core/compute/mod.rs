//! Spatial indexing and range query processing.

pub mod spatial;
