use crate::coord::PointCount;
use serde::{Deserialize, Serialize};

/// Points matched by one range query.
///
/// `max_count` is the largest count among `points` (not across the whole
/// index) and is 0 when nothing matched. Clients use it to normalize heatmap
/// intensity. The order of `points` carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(rename = "results")]
    pub points: Vec<PointCount>,
    pub max_count: u64,
}

impl QueryResult {
    /// Build a result, deriving `max_count` from the points.
    pub fn from_points(points: Vec<PointCount>) -> Self {
        let max_count = points.iter().map(|p| p.count).max().unwrap_or(0);
        Self { points, max_count }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of counts over the matched points.
    pub fn total_count(&self) -> u64 {
        self.points.iter().map(|p| p.count).sum()
    }
}
