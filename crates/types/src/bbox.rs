use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// A closed latitude/longitude rectangle used to filter range queries.
///
/// A coordinate matches when
/// `min_lon <= lon <= max_lon && min_lat <= lat <= max_lat`; points lying
/// exactly on an edge are included. Bounds are taken as given: an inverted
/// filter (`min > max`) is not corrected and matches nothing.
///
/// `QueryFilter::default()` is the zero-area box at the origin, which only
/// matches points at exactly (0, 0). Use [`QueryFilter::unbounded`] to match
/// every point.
///
/// # Examples
///
/// ```
/// use heatmap_types::bbox::QueryFilter;
/// use heatmap_types::coord::Coordinate;
///
/// let filter = QueryFilter::new(40.0, 41.0, -75.0, -73.0);
/// assert!(filter.contains(&Coordinate::new(40.0, -73.0)));
/// assert!(!filter.contains(&Coordinate::new(39.9, -74.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryFilter {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl QueryFilter {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// A filter matching every coordinate.
    pub fn unbounded() -> Self {
        Self::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }

    /// Parse the four bounds from their string form.
    ///
    /// Each value must be a floating point literal; surrounding whitespace is
    /// ignored. NaN is rejected since it would never compare inside any box.
    pub fn parse_bounds(
        min_lat: &str,
        max_lat: &str,
        min_lon: &str,
        max_lon: &str,
    ) -> Result<Self, InvalidBound> {
        Ok(Self::new(
            parse_bound(FilterBound::MinLatitude, min_lat)?,
            parse_bound(FilterBound::MaxLatitude, max_lat)?,
            parse_bound(FilterBound::MinLongitude, min_lon)?,
            parse_bound(FilterBound::MaxLongitude, max_lon)?,
        ))
    }

    /// Check whether a coordinate lies inside the closed rectangle.
    #[inline]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        let lat = coord.latitude();
        let lon = coord.longitude();
        self.min_lon <= lon && lon <= self.max_lon && self.min_lat <= lat && lat <= self.max_lat
    }

    /// True when either axis has `min > max`.
    pub fn is_inverted(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lon > self.max_lon
    }

    /// True when any bound is NaN.
    pub fn has_nan(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .any(|v| v.is_nan())
    }

    /// True when no coordinate can satisfy the filter.
    pub fn is_empty(&self) -> bool {
        self.has_nan() || self.is_inverted()
    }
}

/// One of the four filter bounds, named as the query parameters name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterBound {
    MinLatitude,
    MaxLatitude,
    MinLongitude,
    MaxLongitude,
}

impl FilterBound {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MinLatitude => "minLatitude",
            Self::MaxLatitude => "maxLatitude",
            Self::MinLongitude => "minLongitude",
            Self::MaxLongitude => "maxLongitude",
        }
    }
}

impl std::fmt::Display for FilterBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter bound that is not a usable floating point literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBound {
    pub bound: FilterBound,
    pub value: String,
}

impl std::fmt::Display for InvalidBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value {:?}", self.bound, self.value)
    }
}

impl std::error::Error for InvalidBound {}

fn parse_bound(bound: FilterBound, raw: &str) -> Result<f64, InvalidBound> {
    match raw.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(InvalidBound {
            bound,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_inclusive() {
        let filter = QueryFilter::new(-10.0, 10.0, 20.0, 30.0);
        assert!(filter.contains(&Coordinate::new(-10.0, 20.0)));
        assert!(filter.contains(&Coordinate::new(10.0, 30.0)));
        assert!(filter.contains(&Coordinate::new(0.0, 25.0)));
        assert!(!filter.contains(&Coordinate::new(10.000001, 25.0)));
        assert!(!filter.contains(&Coordinate::new(0.0, 19.999999)));
    }

    #[test]
    fn test_default_is_zero_area_origin_box() {
        let filter = QueryFilter::default();
        assert!(filter.contains(&Coordinate::new(0.0, 0.0)));
        assert!(!filter.contains(&Coordinate::new(0.000001, 0.0)));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_unbounded_matches_extremes() {
        let filter = QueryFilter::unbounded();
        assert!(filter.contains(&Coordinate::new(-90.0, -180.0)));
        assert!(filter.contains(&Coordinate::new(90.0, 180.0)));
    }

    #[test]
    fn test_inverted_matches_nothing() {
        let filter = QueryFilter::new(10.0, -10.0, 0.0, 5.0);
        assert!(filter.is_inverted());
        assert!(filter.is_empty());
        assert!(!filter.contains(&Coordinate::new(0.0, 1.0)));
    }

    #[test]
    fn test_parse_bounds() {
        let filter = QueryFilter::parse_bounds("-1.5", " 2 ", "37", "39.25").unwrap();
        assert_eq!(filter, QueryFilter::new(-1.5, 2.0, 37.0, 39.25));
    }

    #[test]
    fn test_parse_bounds_rejects_garbage() {
        let err = QueryFilter::parse_bounds("1", "2", "abc", "4").unwrap_err();
        assert_eq!(err.bound, FilterBound::MinLongitude);
        assert_eq!(err.value, "abc");
        assert_eq!(err.to_string(), "invalid minLongitude value \"abc\"");
    }

    #[test]
    fn test_parse_bounds_rejects_empty_and_nan() {
        let err = QueryFilter::parse_bounds("", "2", "3", "4").unwrap_err();
        assert_eq!(err.bound, FilterBound::MinLatitude);

        let err = QueryFilter::parse_bounds("1", "NaN", "3", "4").unwrap_err();
        assert_eq!(err.bound, FilterBound::MaxLatitude);
    }
}
