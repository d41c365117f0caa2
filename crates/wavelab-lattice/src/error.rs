//! Error types for the lattice wave solver.

use thiserror::Error;

/// Result type for lattice operations.
pub type Result<T> = std::result::Result<T, LatticeError>;

/// Errors that can occur in the lattice wave solver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// Invalid construction parameters (fatal, raised before any simulation runs).
    #[error("invalid construction: {0}")]
    Construction(String),

    /// A cell index outside the grid was read or written.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column index of the offending access.
        x: usize,
        /// Row index of the offending access.
        y: usize,
        /// Grid width at the time of the access.
        width: usize,
        /// Grid height at the time of the access.
        height: usize,
    },
}

impl LatticeError {
    /// Create a construction error.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}
