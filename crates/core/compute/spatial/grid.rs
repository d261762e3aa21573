//! Uniform grid spatial index over aggregated points.
//!
//! The grid covers the bounding rectangle of the indexed points with square
//! cells of `cell_degrees` on a side. Entries are stored in one contiguous
//! vector ordered by cell id (`row * cols + col`), with a prefix-sum offset
//! table giving each cell's slice. Because cells of one grid row are adjacent
//! in that order, a query scans a single slice per touched row.
//!
//! A range query:
//! 1. Rejects filters that cannot match (NaN bounds, `min > max`, disjoint
//!    from the data extent)
//! 2. Clamps the filter to the data extent and maps it to a row/column span
//! 3. Applies the exact closed-box predicate to every entry in the span
//!
//! Cell assignment and span computation use the same monotone mapping, so a
//! point on a filter edge always falls inside the scanned span.
//!
//! # Example
//!
//! ```rust
//! use heatmap::compute::spatial::SpatialIndex;
//! use heatmap::{Coordinate, PointCount, QueryFilter};
//!
//! let index = SpatialIndex::build(
//!     vec![
//!         PointCount::new(Coordinate::new(1.0, 38.0), 3),
//!         PointCount::new(Coordinate::new(48.85, 2.35), 1),
//!     ],
//!     1.0,
//! );
//!
//! let hits: Vec<_> = index.query(QueryFilter::new(0.0, 2.0, 37.0, 39.0)).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].count, 3);
//! ```

use crate::config::{Coordinate, IndexStats, PointCount, QueryFilter};

/// Upper bound on the number of grid cells. The cell size doubles until the
/// data extent fits.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Placement of the grid over the data extent.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridGeometry {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
    cell_degrees: f64,
    rows: usize,
    cols: usize,
}

impl GridGeometry {
    fn covering(points: &[PointCount], requested_cell: f64) -> Self {
        let mut min_lat = f64::INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut max_lon = f64::NEG_INFINITY;

        for point in points {
            let lat = point.latitude();
            let lon = point.longitude();
            min_lat = min_lat.min(lat);
            min_lon = min_lon.min(lon);
            max_lat = max_lat.max(lat);
            max_lon = max_lon.max(lon);
        }

        let mut cell_degrees = requested_cell;
        loop {
            let rows = cells_along(max_lat - min_lat, cell_degrees);
            let cols = cells_along(max_lon - min_lon, cell_degrees);
            if rows.saturating_mul(cols) <= MAX_GRID_CELLS {
                if cell_degrees != requested_cell {
                    log::debug!(
                        "Coarsened grid cell from {} to {} degrees ({}x{} cells)",
                        requested_cell,
                        cell_degrees,
                        rows,
                        cols
                    );
                }
                return Self {
                    min_lat,
                    min_lon,
                    max_lat,
                    max_lon,
                    cell_degrees,
                    rows,
                    cols,
                };
            }
            cell_degrees *= 2.0;
        }
    }

    #[inline]
    fn row_of(&self, lat: f64) -> usize {
        axis_cell(lat - self.min_lat, self.cell_degrees, self.rows)
    }

    #[inline]
    fn col_of(&self, lon: f64) -> usize {
        axis_cell(lon - self.min_lon, self.cell_degrees, self.cols)
    }

    #[inline]
    fn cell_of(&self, coord: &Coordinate) -> usize {
        self.row_of(coord.latitude()) * self.cols + self.col_of(coord.longitude())
    }

    fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    fn intersects(&self, filter: &QueryFilter) -> bool {
        !(filter.max_lat < self.min_lat
            || filter.min_lat > self.max_lat
            || filter.max_lon < self.min_lon
            || filter.min_lon > self.max_lon)
    }
}

fn cells_along(extent: f64, cell_degrees: f64) -> usize {
    ((extent / cell_degrees).floor() as usize).saturating_add(1)
}

#[inline]
fn axis_cell(offset: f64, cell_degrees: f64, cells: usize) -> usize {
    // Negative offsets saturate to zero in the cast.
    ((offset / cell_degrees).floor() as usize).min(cells - 1)
}

/// Immutable grid index over a finalized set of point counts.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    geometry: Option<GridGeometry>,
    /// Entries ordered by (cell id, coordinate)
    entries: Vec<PointCount>,
    /// `offsets[c]..offsets[c + 1]` is the slice of cell `c`
    offsets: Vec<usize>,
    requested_cell: f64,
    total_count: u64,
    max_count: u64,
    occupied_cells: usize,
}

impl SpatialIndex {
    /// Build the index in bulk.
    ///
    /// Coordinates are expected to be unique, as produced by the aggregator.
    ///
    /// # Panics
    ///
    /// Panics if `cell_degrees` is not a positive finite number.
    pub fn build(mut points: Vec<PointCount>, cell_degrees: f64) -> Self {
        assert!(
            cell_degrees.is_finite() && cell_degrees > 0.0,
            "Grid cell size must be a positive finite number of degrees"
        );

        if points.is_empty() {
            return Self::empty(cell_degrees);
        }

        let geometry = GridGeometry::covering(&points, cell_degrees);
        points.sort_unstable_by_key(|p| (geometry.cell_of(&p.coordinate), p.coordinate));

        let mut offsets = vec![0usize; geometry.cell_count() + 1];
        let mut total_count = 0u64;
        let mut max_count = 0u64;
        for point in &points {
            offsets[geometry.cell_of(&point.coordinate) + 1] += 1;
            total_count += point.count;
            max_count = max_count.max(point.count);
        }

        let mut occupied_cells = 0;
        for cell in 1..offsets.len() {
            if offsets[cell] > 0 {
                occupied_cells += 1;
            }
            offsets[cell] += offsets[cell - 1];
        }

        Self {
            geometry: Some(geometry),
            entries: points,
            offsets,
            requested_cell: cell_degrees,
            total_count,
            max_count,
            occupied_cells,
        }
    }

    /// An index holding no points.
    pub fn empty(cell_degrees: f64) -> Self {
        Self {
            geometry: None,
            entries: Vec::new(),
            offsets: vec![0],
            requested_cell: cell_degrees,
            total_count: 0,
            max_count: 0,
            occupied_cells: 0,
        }
    }

    /// Iterate the entries inside the closed rectangle `filter`.
    pub fn query(&self, filter: QueryFilter) -> impl Iterator<Item = &PointCount> + '_ {
        self.row_spans(&filter)
            .into_iter()
            .flatten()
            .flat_map(move |range| self.entries[range].iter())
            .filter(move |point| filter.contains(&point.coordinate))
    }

    /// Entry ranges to scan for `filter`, one per touched grid row.
    fn row_spans(&self, filter: &QueryFilter) -> Option<Vec<std::ops::Range<usize>>> {
        let geometry = self.geometry.as_ref()?;
        if filter.is_empty() || !geometry.intersects(filter) {
            return None;
        }

        let row_lo = geometry.row_of(filter.min_lat.max(geometry.min_lat));
        let row_hi = geometry.row_of(filter.max_lat.min(geometry.max_lat));
        let col_lo = geometry.col_of(filter.min_lon.max(geometry.min_lon));
        let col_hi = geometry.col_of(filter.max_lon.min(geometry.max_lon));

        let spans = (row_lo..=row_hi)
            .map(|row| {
                let base = row * geometry.cols;
                self.offsets[base + col_lo]..self.offsets[base + col_hi + 1]
            })
            .filter(|range| !range.is_empty())
            .collect();
        Some(spans)
    }

    /// All entries, in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, PointCount> {
        self.entries.iter()
    }

    /// Number of distinct coordinates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count recorded for `coord`, if it is indexed.
    pub fn count_at(&self, coord: &Coordinate) -> Option<u64> {
        let geometry = self.geometry.as_ref()?;
        let cell = geometry.cell_of(coord);
        let slice = &self.entries[self.offsets[cell]..self.offsets[cell + 1]];
        slice
            .binary_search_by(|p| p.coordinate.cmp(coord))
            .ok()
            .map(|i| slice[i].count)
    }

    pub fn stats(&self) -> IndexStats {
        let (rows, cols, cell_degrees) = match &self.geometry {
            Some(g) => (g.rows, g.cols, g.cell_degrees),
            None => (0, 0, self.requested_cell),
        };

        IndexStats {
            points: self.entries.len(),
            total_count: self.total_count,
            max_count: self.max_count,
            grid_rows: rows,
            grid_cols: cols,
            occupied_cells: self.occupied_cells,
            cell_degrees,
        }
    }
}

impl<'a> IntoIterator for &'a SpatialIndex {
    type Item = &'a PointCount;
    type IntoIter = std::slice::Iter<'a, PointCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
