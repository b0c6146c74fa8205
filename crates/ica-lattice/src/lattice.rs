//! Bordered square lattice of cells.
//!
//! The grid is stored row-major with `(L + 2) × (L + 2)` cells. The interior
//! `row, col ∈ [1, L]` holds the simulation; the one-cell frame around it is
//! zero-initialized and never written, so edge cells see constant zero
//! neighbors (open boundary).
//!
//! Two coordinate systems are used:
//! - **grid** `(row, col)` in `[0, L + 1]`, used by the rules and the scans
//! - **interior** `(x, y)` in `[0, L)`, used by the public mutators, where
//!   `x` is the column and `y` the row

use rand::Rng;

use crate::{Error, Result, THRESHOLD_RESOLUTION};

/// A single lattice site.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    /// -1 or +1 in the interior, 0 on the border
    pub state: i8,
    /// Activation threshold
    pub threshold: f64,
}

impl Cell {
    /// The permanent border value.
    pub const BORDER: Self = Self { state: 0, threshold: 0.0 };

    /// Create a cell.
    pub const fn new(state: i8, threshold: f64) -> Self {
        Self { state, threshold }
    }

    /// Active cells form clusters.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.state == 1
    }

    /// Negate state and threshold.
    #[inline]
    pub fn invert(&mut self) {
        self.state = -self.state;
        self.threshold = -self.threshold;
    }
}

/// Square lattice with a fixed zero border.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    size: usize,
    threshold_scale: f64,
    cells: Vec<Cell>,
}

impl Lattice {
    /// Allocate a lattice whose every cell, interior included, is zero.
    ///
    /// Storage is reserved fallibly: an allocation failure is reported as
    /// [`Error::Allocation`] instead of aborting.
    pub fn zeroed(size: usize, threshold_scale: f64) -> Result<Self> {
        validate_params(size, threshold_scale)?;
        let total = bordered_len(size)?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(total)
            .map_err(|_| Error::Allocation { what: "lattice", cells: total })?;
        cells.resize(total, Cell::BORDER);

        Ok(Self {
            size,
            threshold_scale,
            cells,
        })
    }

    /// Allocate a lattice with every interior cell set to `state` and a zero
    /// threshold.
    pub fn filled(size: usize, threshold_scale: f64, state: i8) -> Result<Self> {
        if state != 1 && state != -1 {
            return Err(Error::InvalidState(state));
        }
        let mut lattice = Self::zeroed(size, threshold_scale)?;
        for row in 1..=size {
            for col in 1..=size {
                lattice.cell_mut(row, col).state = state;
            }
        }
        Ok(lattice)
    }

    /// Fill every interior cell from `rng`, in row-major order.
    ///
    /// Per cell: the state is a fair draw from {-1, +1}, then the threshold is
    /// `q · (2k / 1000 − 1)` for `k` uniform in `[0, 999]`.
    pub fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let q = self.threshold_scale;
        let resolution = f64::from(THRESHOLD_RESOLUTION);

        for row in 1..=self.size {
            for col in 1..=self.size {
                let state = rng.gen_range(0..2i8) * 2 - 1;
                let k = rng.gen_range(0..THRESHOLD_RESOLUTION);
                let threshold = (f64::from(k) * 2.0 / resolution - 1.0) * q;
                *self.cell_mut(row, col) = Cell::new(state, threshold);
            }
        }
    }

    /// Interior side length `L`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Threshold scale `q`.
    pub fn threshold_scale(&self) -> f64 {
        self.threshold_scale
    }

    /// Row stride of the bordered grid (`L + 2`).
    #[inline]
    pub fn stride(&self) -> usize {
        self.size + 2
    }

    /// Number of interior cells (`L * L`).
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Flat index of grid position `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.stride() + col
    }

    /// Whether grid position `(row, col)` lies in the border frame.
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row == self.size + 1 || col == self.size + 1
    }

    /// Cell at grid position `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the bordered grid.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        let idx = self.index(row, col);
        &mut self.cells[idx]
    }

    /// All cells of the bordered grid, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows of the bordered grid, top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, Cell> {
        self.cells.chunks(self.stride())
    }

    /// Interior cells, row-major.
    pub fn interior(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.rows()
            .skip(1)
            .take(self.size)
            .flat_map(move |row| &row[1..=self.size])
    }

    /// Cell at interior position `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<&Cell> {
        let idx = self.interior_index(x, y)?;
        Ok(&self.cells[idx])
    }

    /// Negate state and threshold of the interior cell `(x, y)`.
    pub fn invert(&mut self, x: usize, y: usize) -> Result<()> {
        let idx = self.interior_index(x, y)?;
        self.cells[idx].invert();
        Ok(())
    }

    /// Overwrite the interior cell `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, state: i8, threshold: f64) -> Result<()> {
        if state != 1 && state != -1 {
            return Err(Error::InvalidState(state));
        }
        let idx = self.interior_index(x, y)?;
        self.cells[idx] = Cell::new(state, threshold);
        Ok(())
    }

    fn interior_index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.size || y >= self.size {
            return Err(Error::CoordinateOutOfRange {
                x,
                y,
                size: self.size,
            });
        }
        Ok(self.index(y + 1, x + 1))
    }
}

/// Reject parameters that cannot describe a lattice.
pub(crate) fn validate_params(size: usize, threshold_scale: f64) -> Result<()> {
    if size == 0 {
        return Err(Error::InvalidSize(size));
    }
    if !threshold_scale.is_finite() || threshold_scale < 0.0 {
        return Err(Error::InvalidThresholdScale(threshold_scale));
    }
    bordered_len(size).map(|_| ())
}

/// `(L + 2)²`, or an error if it does not fit in `usize`.
fn bordered_len(size: usize) -> Result<usize> {
    size.checked_add(2)
        .and_then(|stride| stride.checked_mul(stride))
        .ok_or(Error::InvalidSize(size))
}
