use serde::{Deserialize, Serialize};

/// Summary of a built spatial index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Distinct rounded coordinates
    pub points: usize,
    /// Sum of all per-coordinate counts (source records indexed)
    pub total_count: u64,
    /// Largest per-coordinate count in the whole index
    pub max_count: u64,
    pub grid_rows: usize,
    pub grid_cols: usize,
    /// Cells holding at least one point
    pub occupied_cells: usize,
    /// Edge length of one grid cell in degrees
    pub cell_degrees: f64,
}

impl IndexStats {
    pub fn cell_count(&self) -> usize {
        self.grid_rows * self.grid_cols
    }

    /// Mean number of points per occupied cell.
    pub fn mean_cell_occupancy(&self) -> f64 {
        if self.occupied_cells == 0 {
            0.0
        } else {
            self.points as f64 / self.occupied_cells as f64
        }
    }
}
