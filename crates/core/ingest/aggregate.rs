//! Coordinate deduplication into per-point counts.

use crate::config::{Coordinate, PointCount};
use crate::error::Result;
use rustc_hash::FxHashMap;

/// Counts occurrences of each rounded coordinate.
#[derive(Debug, Default)]
pub struct PointAggregator {
    counts: FxHashMap<Coordinate, u64>,
    records: u64,
}

impl PointAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `coord`.
    #[inline]
    pub fn add(&mut self, coord: Coordinate) {
        *self.counts.entry(coord).or_insert(0) += 1;
        self.records += 1;
    }

    /// Drain a coordinate stream, stopping at the first error.
    ///
    /// Returns the number of coordinates consumed by this call.
    pub fn consume<I>(&mut self, coords: I) -> Result<u64>
    where
        I: IntoIterator<Item = Result<Coordinate>>,
    {
        let mut consumed = 0;
        for coord in coords {
            self.add(coord?);
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Number of distinct coordinates seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total coordinates added.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn count_of(&self, coord: &Coordinate) -> u64 {
        self.counts.get(coord).copied().unwrap_or(0)
    }

    /// Finalize into point counts, in no particular order.
    pub fn finish(self) -> Vec<PointCount> {
        self.counts
            .into_iter()
            .map(|(coordinate, count)| PointCount::new(coordinate, count))
            .collect()
    }
}

impl Extend<Coordinate> for PointAggregator {
    fn extend<T: IntoIterator<Item = Coordinate>>(&mut self, iter: T) {
        for coord in iter {
            self.add(coord);
        }
    }
}

impl FromIterator<Coordinate> for PointAggregator {
    fn from_iter<T: IntoIterator<Item = Coordinate>>(iter: T) -> Self {
        let mut aggregator = Self::new();
        aggregator.extend(iter);
        aggregator
    }
}
