//! Error types for the laminar circuit.

use thiserror::Error;

/// Result type for circuit operations.
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Errors that can occur in circuit construction and processing.
#[derive(Error, Debug, Clone)]
pub enum CircuitError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {reason} (value: {value})")]
    InvalidParameter {
        parameter: String,
        value: f64,
        reason: String,
    },

    /// The circuit has been closed
    #[error("Circuit is closed")]
    Closed,

    /// A learning operation was requested before enabling learning
    #[error("Learning is not enabled on this circuit")]
    LearningNotEnabled,

    /// Propagated error from shunting-core
    #[error("Dynamics error: {0}")]
    DynamicsError(String),

    /// Propagated error from temporal-chunking
    #[error("Temporal error: {0}")]
    TemporalError(String),

    /// Propagated error from gated-learning
    #[error("Learning error: {0}")]
    LearningError(String),

    /// Propagated error from resonance-metrics
    #[error("Analysis error: {0}")]
    AnalysisError(String),
}

impl From<shunting_core::DynamicsError> for CircuitError {
    fn from(err: shunting_core::DynamicsError) -> Self {
        CircuitError::DynamicsError(err.to_string())
    }
}

impl From<temporal_chunking::TemporalError> for CircuitError {
    fn from(err: temporal_chunking::TemporalError) -> Self {
        CircuitError::TemporalError(err.to_string())
    }
}

impl From<gated_learning::LearningError> for CircuitError {
    fn from(err: gated_learning::LearningError) -> Self {
        CircuitError::LearningError(err.to_string())
    }
}

impl From<resonance_metrics::AnalysisError> for CircuitError {
    fn from(err: resonance_metrics::AnalysisError) -> Self {
        CircuitError::AnalysisError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CircuitError::InvalidParameter {
            parameter: "time_constant".to_string(),
            value: 5.0,
            reason: "must lie in [10, 50] ms".to_string(),
        };
        assert!(err.to_string().contains("time_constant"));
    }

    #[test]
    fn test_error_conversions() {
        let inner = shunting_core::DynamicsError::EmptyField;
        let err: CircuitError = inner.into();
        assert!(matches!(err, CircuitError::DynamicsError(_)));

        let inner = temporal_chunking::TemporalError::DimensionMismatch {
            expected: 10,
            actual: 2,
        };
        let err: CircuitError = inner.into();
        assert!(matches!(err, CircuitError::TemporalError(_)));
    }
}
