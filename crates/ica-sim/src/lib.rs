//! ICA Simulation Driver
//!
//! Runs an [`ica_lattice::Automaton`] for a configured number of cycles and
//! records what happens:
//!
//! - a console table of mean state, mean threshold and cluster count
//! - a `.dat` data log with the same columns
//! - an optional gnuplot `.plt` script charting the log
//! - PGM snapshots of the state or threshold grid
//!
//! ```no_run
//! use ica_sim::{Session, SimConfig};
//!
//! let config = SimConfig {
//!     size: 128,
//!     seed: Some(42),
//!     ..SimConfig::default()
//! };
//! let mut session = Session::new(config)?;
//! session.run_configured()?;
//! println!("{}", session.analyse()?);
//! # Ok::<(), ica_sim::Error>(())
//! ```

mod cli;
mod config;
mod error;
mod output;
mod report;
mod session;

pub use cli::{Cli, Command, DumpKind, Overrides, USAGE};
pub use config::SimConfig;
pub use error::{Error, Result};
pub use output::{file_stem, plot_script, DataLog, OutputPaths};
pub use report::{CycleRecord, Report, TITLE};
pub use session::Session;
