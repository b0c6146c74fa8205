//! Neighbor-state sums for the two lattice topologies.
//!
//! Both rules read the bordered grid with the lattice's own row stride
//! (`L + 2`), so every interior cell has a full set of neighbors and border
//! neighbors contribute 0.

use std::fmt;
use std::str::FromStr;

use crate::Lattice;

/// Grid offsets `(d_row, d_col)` of the 4 orthogonal neighbors.
pub const VON_NEUMANN_OFFSETS: [(isize, isize); 4] = [
    (-1, 0), // North
    (1, 0),  // South
    (0, -1), // West
    (0, 1),  // East
];

/// Grid offsets of the 4 diagonal neighbors.
pub const DIAGONAL_OFFSETS: [(isize, isize); 4] = [
    (-1, -1), // Northwest
    (-1, 1),  // Northeast
    (1, -1),  // Southwest
    (1, 1),   // Southeast
];

/// Which cells count as neighbors in the update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Neighborhood {
    /// 4 orthogonal neighbors
    #[default]
    VonNeumann,
    /// 8 neighbors: orthogonal plus diagonal
    Moore,
}

impl Neighborhood {
    /// Number of neighbors consulted.
    pub const fn neighbor_count(&self) -> usize {
        match self {
            Neighborhood::VonNeumann => 4,
            Neighborhood::Moore => 8,
        }
    }

    /// Sum of neighbor states around interior grid position `(row, col)`.
    ///
    /// `row` and `col` must be in `[1, L]`.
    #[inline]
    pub fn sum(&self, lattice: &Lattice, row: usize, col: usize) -> i32 {
        match self {
            Neighborhood::VonNeumann => von_neumann_sum(lattice, row, col),
            Neighborhood::Moore => moore_sum(lattice, row, col),
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Neighborhood::VonNeumann => write!(f, "von-neumann"),
            Neighborhood::Moore => write!(f, "moore"),
        }
    }
}

impl FromStr for Neighborhood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "von-neumann" | "vonneumann" | "von_neumann" | "4" => Ok(Neighborhood::VonNeumann),
            "moore" | "8" => Ok(Neighborhood::Moore),
            other => Err(format!(
                "unknown neighborhood '{}' (expected von-neumann or moore)",
                other
            )),
        }
    }
}

/// Sum over the 4 orthogonal neighbors.
pub fn von_neumann_sum(lattice: &Lattice, row: usize, col: usize) -> i32 {
    offset_sum(lattice, row, col, &VON_NEUMANN_OFFSETS)
}

/// Sum over all 8 surrounding cells.
pub fn moore_sum(lattice: &Lattice, row: usize, col: usize) -> i32 {
    von_neumann_sum(lattice, row, col) + offset_sum(lattice, row, col, &DIAGONAL_OFFSETS)
}

#[inline]
fn offset_sum(lattice: &Lattice, row: usize, col: usize, offsets: &[(isize, isize)]) -> i32 {
    debug_assert!((1..=lattice.size()).contains(&row) && (1..=lattice.size()).contains(&col));
    let cells = lattice.cells();
    let stride = lattice.stride() as isize;
    let center = lattice.index(row, col) as isize;

    offsets
        .iter()
        .map(|&(dr, dc)| i32::from(cells[(center + dr * stride + dc) as usize].state))
        .sum()
}
