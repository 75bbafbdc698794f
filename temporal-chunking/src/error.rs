//! Error types for temporal chunking.

use thiserror::Error;

/// Result type for temporal chunking operations.
pub type Result<T> = std::result::Result<T, TemporalError>;

/// Errors that can occur in working memory and masking field processing.
#[derive(Error, Debug, Clone)]
pub enum TemporalError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {reason} (value: {value})")]
    InvalidParameter {
        parameter: String,
        value: f64,
        reason: String,
    },

    /// Pattern dimension mismatch
    #[error("Pattern dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Propagated error from shunting-core
    #[error("Dynamics error: {0}")]
    DynamicsError(String),
}

impl From<shunting_core::DynamicsError> for TemporalError {
    fn from(err: shunting_core::DynamicsError) -> Self {
        TemporalError::DynamicsError(err.to_string())
    }
}
