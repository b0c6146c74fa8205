//! Aggregate lattice statistics.

use crate::cluster::count_clusters;
use crate::{Lattice, Result};

/// Snapshot of the lattice at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Mean interior state, in `[-1, 1]`
    pub avg_state: f64,
    /// Mean interior threshold
    pub avg_threshold: f64,
    /// Clusters of two or more 4-connected active cells
    pub cluster_count: usize,
}

impl Statistics {
    /// Full rescan: interior means over `L * L` cells plus a cluster count.
    pub fn compute(lattice: &Lattice) -> Result<Self> {
        let (state_sum, threshold_sum) = lattice
            .interior()
            .fold((0i64, 0.0f64), |(s, t), cell| {
                (s + i64::from(cell.state), t + cell.threshold)
            });
        let area = lattice.area() as f64;

        Ok(Self {
            avg_state: state_sum as f64 / area,
            avg_threshold: threshold_sum / area,
            cluster_count: count_clusters(lattice)?,
        })
    }

    /// Percentage of interior cells in state `+1`.
    pub fn positive_percent(&self) -> f64 {
        100.0 * (self.avg_state + 1.0) / 2.0
    }

    /// Percentage of interior cells in state `-1`.
    pub fn negative_percent(&self) -> f64 {
        100.0 - self.positive_percent()
    }
}
