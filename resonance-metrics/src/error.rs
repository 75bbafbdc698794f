//! Error types for oscillation and resonance analysis.

use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during spectral and resonance analysis.
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {reason} (value: {value})")]
    InvalidParameter {
        parameter: String,
        value: f64,
        reason: String,
    },

    /// Not enough samples buffered for spectral estimation
    #[error("Insufficient samples: need at least {needed}, have {available}")]
    InsufficientSamples { needed: usize, available: usize },
}
