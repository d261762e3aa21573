//! Dataset ingestion: CSV rows to coordinates, coordinates to point counts.

mod aggregate;
mod reader;

pub use aggregate::PointAggregator;
pub use reader::CsvIngestor;
