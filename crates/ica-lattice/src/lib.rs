//! ICA Lattice
//!
//! A two-dimensional lattice automaton whose cells carry a binary state and
//! an adaptive activation threshold.
//!
//! # Local Rule
//!
//! Cells are updated one at a time, at random (asynchronous Monte Carlo
//! updates). The sum of neighbor states is compared against the cell's
//! threshold:
//!
//! - above it, the cell switches on (`+1`) and its threshold rises
//! - otherwise, the cell switches off (`-1`) and its threshold falls
//!
//! The random step size is proportional to the threshold scale `q`. Active
//! cells raise their own bar and inactive cells lower it, so the mean
//! threshold organizes itself around the level the neighborhood sustains.
//!
//! # Lattice Layout
//!
//! An `L × L` interior inside a fixed one-cell border of zeros, stored
//! row-major with stride `L + 2`. The border gives open boundaries: edge
//! cells simply see fewer non-zero neighbors.
//!
//! # Observables
//!
//! [`Statistics`] holds the mean state, the mean threshold and the number of
//! 4-connected clusters of two or more active cells.
//!
//! ```
//! use ica_lattice::{Automaton, Neighborhood};
//!
//! let mut ica = Automaton::new(7);
//! ica.create(32, 1.0)?;
//! ica.run(Neighborhood::VonNeumann, 10, 0)?;
//!
//! let stats = ica.update_stats()?;
//! assert!(stats.avg_state >= -1.0 && stats.avg_state <= 1.0);
//! # Ok::<(), ica_lattice::Error>(())
//! ```

mod automaton;
mod cluster;
mod dump;
mod error;
mod lattice;
mod neighborhood;
mod stats;
mod updater;

pub use automaton::Automaton;
pub use cluster::{count_clusters, WorkQueue};
pub use dump::{state_pgm, threshold_pgm, write_state_pgm, write_threshold_pgm, state_code, threshold_code};
pub use error::{Error, Result};
pub use lattice::{Cell, Lattice};
pub use neighborhood::{moore_sum, von_neumann_sum, Neighborhood, DIAGONAL_OFFSETS, VON_NEUMANN_OFFSETS};
pub use stats::Statistics;
pub use updater::{run, step, RunSummary};

/// Number of discrete levels in every uniform threshold draw.
pub const THRESHOLD_RESOLUTION: u32 = 1000;
