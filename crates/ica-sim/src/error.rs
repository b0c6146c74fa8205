//! Error types for ica-sim.

use thiserror::Error;

/// Result type for simulation driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// The lattice engine rejected an operation.
    #[error("lattice error: {0}")]
    Lattice(#[from] ica_lattice::Error),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad command-line usage.
    #[error("usage error: {0}")]
    Usage(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
