//! Error types for the diffraction engine.

use thiserror::Error;

/// Result type for diffraction operations.
pub type Result<T> = std::result::Result<T, DiffractionError>;

/// Errors that can occur while building diffraction patterns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffractionError {
    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DiffractionError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
