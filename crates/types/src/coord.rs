use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal digits kept when a coordinate is used as an aggregation key.
pub const COORDINATE_PRECISION: u32 = 6;

const SCALE: f64 = 1_000_000.0;

/// A latitude/longitude pair rounded to [`COORDINATE_PRECISION`] decimals.
///
/// Values are stored as integer micro-degrees, so two coordinates compare equal
/// (and hash identically) exactly when their rounded values match. Rounding
/// collapses near-duplicate floating point inputs into a single bucket.
///
/// # Examples
///
/// ```
/// use heatmap_types::coord::Coordinate;
///
/// let a = Coordinate::new(1.0, 38.0);
/// let b = Coordinate::new(1.0, 38.000001);
/// assert_ne!(a, b);
/// assert_eq!(b.longitude(), 38.000001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat_e6: i64,
    lon_e6: i64,
}

impl Coordinate {
    /// Round `latitude` and `longitude` to the fixed precision.
    ///
    /// Callers are expected to pass values within the latitude/longitude
    /// ranges. Anything beyond the micro-degree range saturates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_e6: quantize(latitude),
            lon_e6: quantize(longitude),
        }
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.lat_e6 as f64 / SCALE
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.lon_e6 as f64 / SCALE
    }

    pub const fn latitude_micro(&self) -> i64 {
        self.lat_e6
    }

    pub const fn longitude_micro(&self) -> i64 {
        self.lon_e6
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.prec$}, {:.prec$})",
            self.latitude(),
            self.longitude(),
            prec = COORDINATE_PRECISION as usize
        )
    }
}

#[inline]
fn quantize(value: f64) -> i64 {
    (value * SCALE).round() as i64
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl From<RawCoordinate> for Coordinate {
    fn from(raw: RawCoordinate) -> Self {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(coord: Coordinate) -> Self {
        RawCoordinate {
            latitude: coord.latitude(),
            longitude: coord.longitude(),
        }
    }
}

/// A coordinate together with the number of source records that mapped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PointRecord", into = "PointRecord")]
pub struct PointCount {
    pub coordinate: Coordinate,
    pub count: u64,
}

impl PointCount {
    pub fn new(coordinate: Coordinate, count: u64) -> Self {
        Self { coordinate, count }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }
}

/// Flat `{latitude, longitude, count}` wire shape.
#[derive(Serialize, Deserialize)]
struct PointRecord {
    latitude: f64,
    longitude: f64,
    count: u64,
}

impl From<PointRecord> for PointCount {
    fn from(record: PointRecord) -> Self {
        PointCount::new(Coordinate::new(record.latitude, record.longitude), record.count)
    }
}

impl From<PointCount> for PointRecord {
    fn from(point: PointCount) -> Self {
        PointRecord {
            latitude: point.latitude(),
            longitude: point.longitude(),
            count: point.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_collapses_near_duplicates() {
        let a = Coordinate::new(40.7128001, -74.0060004);
        let b = Coordinate::new(40.7127996, -74.0059996);
        assert_eq!(a, b);
        assert_eq!(a.latitude(), 40.7128);
        assert_eq!(a.longitude(), -74.006);
    }

    #[test]
    fn test_sixth_decimal_is_significant() {
        let a = Coordinate::new(1.0, 38.0);
        let b = Coordinate::new(1.0, 38.000001);
        assert_ne!(a, b);
        assert_eq!(b.longitude_micro() - a.longitude_micro(), 1);
    }

    #[test]
    fn test_negative_coordinates_round_symmetrically() {
        let c = Coordinate::new(-33.8688, -151.2093);
        assert_eq!(c.latitude_micro(), -33_868_800);
        assert_eq!(c.longitude_micro(), -151_209_300);
    }

    #[test]
    fn test_display() {
        let c = Coordinate::new(1.5, -2.25);
        assert_eq!(c.to_string(), "(1.500000, -2.250000)");
    }

    #[test]
    fn test_point_count_wire_shape() {
        let point = PointCount::new(Coordinate::new(1.0, 38.0), 3);
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"latitude": 1.0, "longitude": 38.0, "count": 3})
        );

        let back: PointCount = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }
}
