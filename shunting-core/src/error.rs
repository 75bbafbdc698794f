//! Error types for shunting field dynamics.

use thiserror::Error;

/// Result type for shunting dynamics operations.
pub type Result<T> = std::result::Result<T, DynamicsError>;

/// Errors that can occur in shunting and transmitter dynamics.
#[derive(Error, Debug, Clone)]
pub enum DynamicsError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {reason} (value: {value})")]
    InvalidParameter {
        parameter: String,
        value: f64,
        reason: String,
    },

    /// Field size mismatch
    #[error("Field size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Invalid unit index
    #[error("Invalid unit index {index} (max: {max})")]
    InvalidUnitIndex { index: usize, max: usize },

    /// Empty field
    #[error("Field has no units")]
    EmptyField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DynamicsError::InvalidParameter {
            parameter: "ceiling".to_string(),
            value: -1.0,
            reason: "must exceed floor".to_string(),
        };
        assert!(err.to_string().contains("Invalid parameter"));
        assert!(err.to_string().contains("ceiling"));
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = DynamicsError::SizeMismatch {
            expected: 10,
            actual: 7,
        };
        assert!(err.to_string().contains("expected 10"));
    }
}
