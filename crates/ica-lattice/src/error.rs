//! Error types for ica-lattice.

use thiserror::Error;

/// Result type for lattice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, updating or scanning a lattice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Scratch or grid storage could not be reserved.
    #[error("failed to allocate {what} for {cells} cells")]
    Allocation {
        what: &'static str,
        cells: usize,
    },

    /// Interior side length is zero or the bordered grid size overflows.
    #[error("invalid lattice size: {0}")]
    InvalidSize(usize),

    /// Threshold scale is negative, NaN or infinite.
    #[error("invalid threshold scale: {0}")]
    InvalidThresholdScale(f64),

    /// Interior coordinates outside `[0, size)`.
    #[error("cell ({x}, {y}) is outside the {size}x{size} interior")]
    CoordinateOutOfRange { x: usize, y: usize, size: usize },

    /// Interior cells only ever hold -1 or +1.
    #[error("invalid cell state {0}: interior cells are -1 or +1")]
    InvalidState(i8),

    /// The flood-fill work queue ran out of room.
    #[error("flood-fill queue overflow (capacity {capacity})")]
    QueueOverflow { capacity: usize },

    /// The automaton has no lattice (never created, or destroyed).
    #[error("no lattice: create one first")]
    NoLattice,
}
