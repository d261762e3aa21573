//! Bounding-box range queries against the published snapshot.

use crate::compute::spatial::SpatialIndex;
use crate::config::{FilterBound, QueryFilter, QueryResult};
use crate::db::Heatmap;
use crate::error::{HeatmapError, Result};

/// Collect the points of `index` inside `filter` along with their maximum count.
///
/// Inverted filters are passed through as-is and yield an empty result.
pub fn range_query(index: &SpatialIndex, filter: &QueryFilter) -> QueryResult {
    let mut max_count = 0;
    let points = index
        .query(*filter)
        .inspect(|p| max_count = max_count.max(p.count))
        .copied()
        .collect();

    QueryResult { points, max_count }
}

/// Reject filters that cannot describe a box.
///
/// NaN bounds are always rejected. Inverted bounds are rejected only when
/// `strict` is set.
pub fn validate_filter(filter: &QueryFilter, strict: bool) -> Result<()> {
    let bounds = [
        (FilterBound::MinLatitude, filter.min_lat),
        (FilterBound::MaxLatitude, filter.max_lat),
        (FilterBound::MinLongitude, filter.min_lon),
        (FilterBound::MaxLongitude, filter.max_lon),
    ];
    if let Some((bound, value)) = bounds.into_iter().find(|(_, v)| v.is_nan()) {
        return Err(HeatmapError::InvalidFilter {
            bound,
            value: value.to_string(),
        });
    }

    if strict && filter.is_inverted() {
        return Err(HeatmapError::InvertedFilter);
    }

    Ok(())
}

impl Heatmap {
    /// Query the published snapshot for points inside `filter`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use heatmap::{Heatmap, QueryFilter};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let heatmap = Heatmap::new();
    /// let csv = "network,a,b,c,d,e,postal,latitude,longitude,radius\n\
    ///            ::/0,0,0,,0,0,,1.0,38.0,1\n\
    ///            ::/0,0,0,,0,0,,1.0,38.0,1\n\
    ///            ::/0,0,0,,0,0,,45.0,7.0,1\n";
    /// heatmap.load_dataset(csv.as_bytes())?;
    ///
    /// let result = heatmap.query(&QueryFilter::new(0.0, 2.0, 37.0, 39.0))?;
    /// assert_eq!(result.points.len(), 1);
    /// assert_eq!(result.max_count, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn query(&self, filter: &QueryFilter) -> Result<QueryResult> {
        validate_filter(filter, self.config().strict_filters)?;
        let snapshot = self.snapshot()?;
        Ok(range_query(snapshot.index(), filter))
    }

    /// Parse four string bounds and run [`Heatmap::query`].
    pub fn query_str(
        &self,
        min_lat: &str,
        max_lat: &str,
        min_lon: &str,
        max_lon: &str,
    ) -> Result<QueryResult> {
        let filter = QueryFilter::parse_bounds(min_lat, max_lat, min_lon, max_lon)?;
        self.query(&filter)
    }
}
