//! Error types for gated plasticity.

use thiserror::Error;

/// Result type for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

/// Errors that can occur in weight handling and plasticity.
#[derive(Error, Debug, Clone)]
pub enum LearningError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {reason} (value: {value})")]
    InvalidParameter {
        parameter: String,
        value: f64,
        reason: String,
    },

    /// Weight matrix shape does not fit the activation vectors
    #[error("Shape mismatch: weights are {rows}x{cols}, activations are post={post}, pre={pre}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        post: usize,
        pre: usize,
    },

    /// Entry index out of range
    #[error("Invalid weight index ({row}, {col}) for {rows}x{cols} matrix")]
    InvalidIndex {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LearningError::ShapeMismatch {
            rows: 10,
            cols: 10,
            post: 5,
            pre: 10,
        };
        assert!(err.to_string().contains("10x10"));
    }
}
