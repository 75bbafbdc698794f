//! Configuration records for working memory and the masking field.
//!
//! Every range and sign constraint is checked at construction; the
//! processing paths never re-validate.

use crate::error::{Result, TemporalError};
use serde::{Deserialize, Serialize};

fn invalid(parameter: &str, value: f64, reason: &str) -> TemporalError {
    TemporalError::InvalidParameter {
        parameter: parameter.to_string(),
        value,
        reason: reason.to_string(),
    }
}

/// Working memory (STORE-2 primacy-gradient encoder) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemoryConfig {
    /// Maximum number of stored items.
    pub capacity: usize,

    /// Dimension of each stored pattern.
    pub item_dimension: usize,

    /// Passive decay rate of item activations (1/s).
    pub decay_rate: f64,

    /// Activation ceiling; also the position-0 initial activation.
    pub max_activation: f64,

    /// Base exponent of the primacy gradient.
    pub primacy_decay_rate: f64,

    /// Self-excitation sustaining stored activations.
    pub self_excitation: f64,

    /// Lateral inhibition strength between positions.
    pub lateral_inhibition: f64,

    /// Shunting integration step (s).
    pub time_step: f64,

    /// Transmitter recovery rate.
    pub transmitter_recovery: f64,

    /// Linear transmitter depletion coefficient.
    pub transmitter_depletion_linear: f64,

    /// Quadratic transmitter depletion coefficient.
    pub transmitter_depletion_quadratic: f64,

    /// Floor on position-dependent initial activation.
    pub retrieval_threshold: f64,

    /// Reset the field instead of dropping items on overflow.
    pub overflow_reset_enabled: bool,

    /// Weight readout by recency in addition to the primacy gradient.
    pub recency_gradient: bool,
}

impl Default for WorkingMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 7,
            item_dimension: 10,
            decay_rate: 0.1,
            max_activation: 1.0,
            primacy_decay_rate: 0.2,
            self_excitation: 0.2,
            lateral_inhibition: 0.1,
            time_step: 0.001,
            transmitter_recovery: 0.1,
            transmitter_depletion_linear: 0.5,
            transmitter_depletion_quadratic: 0.3,
            retrieval_threshold: 0.05,
            overflow_reset_enabled: true,
            recency_gradient: false,
        }
    }
}

impl WorkingMemoryConfig {
    /// Default configuration for the given capacity and item dimension.
    pub fn new(capacity: usize, item_dimension: usize) -> Result<Self> {
        let config = Self {
            capacity,
            item_dimension,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all range and sign constraints.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(invalid("capacity", 0.0, "must be at least 1"));
        }
        if self.item_dimension == 0 {
            return Err(invalid("item_dimension", 0.0, "must be at least 1"));
        }
        if !self.decay_rate.is_finite() || self.decay_rate <= 0.0 {
            return Err(invalid(
                "decay_rate",
                self.decay_rate,
                "must be positive and finite",
            ));
        }
        if !self.max_activation.is_finite() || self.max_activation <= 0.0 {
            return Err(invalid(
                "max_activation",
                self.max_activation,
                "must be positive and finite",
            ));
        }
        if self.primacy_decay_rate < 0.0 {
            return Err(invalid(
                "primacy_decay_rate",
                self.primacy_decay_rate,
                "must be non-negative",
            ));
        }
        if self.self_excitation < 0.0 {
            return Err(invalid(
                "self_excitation",
                self.self_excitation,
                "must be non-negative",
            ));
        }
        if self.lateral_inhibition < 0.0 {
            return Err(invalid(
                "lateral_inhibition",
                self.lateral_inhibition,
                "must be non-negative",
            ));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(invalid(
                "time_step",
                self.time_step,
                "must be positive and finite",
            ));
        }
        if self.transmitter_recovery < 0.0
            || self.transmitter_depletion_linear < 0.0
            || self.transmitter_depletion_quadratic < 0.0
        {
            return Err(invalid(
                "transmitter_rates",
                self.transmitter_recovery
                    .min(self.transmitter_depletion_linear)
                    .min(self.transmitter_depletion_quadratic),
                "must be non-negative",
            ));
        }
        if self.retrieval_threshold < 0.0 || self.retrieval_threshold >= self.max_activation {
            return Err(invalid(
                "retrieval_threshold",
                self.retrieval_threshold,
                "must lie in [0, max_activation)",
            ));
        }
        Ok(())
    }
}

/// Masking field (item-node competition and list chunking) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingFieldConfig {
    /// Item-node capacity.
    pub max_item_nodes: usize,

    /// List-chunk capacity.
    pub max_chunks: usize,

    /// Minimum winner-set size for chunk formation (saturates at the
    /// live node count).
    pub min_chunk_size: usize,

    /// Maximum number of members committed into one chunk.
    pub max_chunk_size: usize,

    /// Fuzzy-match acceptance threshold in [0, 1].
    pub matching_threshold: f64,

    /// Strength increment applied to a matched node.
    pub learning_rate: f64,

    /// Activation increment applied to a matched node.
    pub activation_boost: f64,

    /// Activation assigned to a newly created node.
    pub initial_activation: f64,

    /// Activation a node must exceed to join the winner set.
    pub winner_threshold: f64,

    /// Minimum time between chunk commits (s).
    pub min_chunk_interval: f64,

    /// Largest allowed positional gap between consecutive winners.
    pub max_temporal_gap: usize,

    /// Exponential decay rate of chunk activations (1/s).
    pub chunk_decay_rate: f64,

    /// Reactivation drive applied to the active chunk (1/s).
    pub active_chunk_boost: f64,

    /// Factor applied to all item activations after a chunk commits.
    pub reset_decay_factor: f64,

    /// Whether to apply `reset_decay_factor` and clear winners after a
    /// chunk commits.
    pub reset_after_chunk: bool,

    /// Divisive normalization of item activations after competition.
    pub normalization_enabled: bool,

    /// Strength of the Mexican-hat competition kernel.
    pub competition_strength: f64,

    /// On-center excitation radius of the kernel.
    pub excitation_range: usize,

    /// Off-surround inhibition radius of the kernel.
    pub inhibition_range: usize,

    /// Self-excitation of item nodes.
    pub self_excitation: f64,

    /// Passive decay rate of item activations (1/s).
    pub item_decay_rate: f64,

    /// Competition integration step (s).
    pub integration_time_step: f64,
}

impl Default for MaskingFieldConfig {
    fn default() -> Self {
        Self {
            max_item_nodes: 20,
            max_chunks: 10,
            min_chunk_size: 2,
            max_chunk_size: 5,
            matching_threshold: 0.7,
            learning_rate: 0.1,
            activation_boost: 0.15,
            initial_activation: 0.6,
            winner_threshold: 0.5,
            min_chunk_interval: 0.05,
            max_temporal_gap: 2,
            chunk_decay_rate: 0.1,
            active_chunk_boost: 0.05,
            reset_decay_factor: 0.1,
            reset_after_chunk: true,
            normalization_enabled: false,
            competition_strength: 1.0,
            excitation_range: 1,
            inhibition_range: 3,
            self_excitation: 0.1,
            item_decay_rate: 0.5,
            integration_time_step: 0.01,
        }
    }
}

impl MaskingFieldConfig {
    /// Default configuration for the given node capacity.
    pub fn new(max_item_nodes: usize) -> Result<Self> {
        let config = Self {
            max_item_nodes,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all range and sign constraints.
    pub fn validate(&self) -> Result<()> {
        if self.max_item_nodes == 0 {
            return Err(invalid("max_item_nodes", 0.0, "must be at least 1"));
        }
        if self.max_chunks == 0 {
            return Err(invalid("max_chunks", 0.0, "must be at least 1"));
        }
        if self.min_chunk_size == 0 {
            return Err(invalid("min_chunk_size", 0.0, "must be at least 1"));
        }
        if self.max_chunk_size < self.min_chunk_size {
            return Err(invalid(
                "max_chunk_size",
                self.max_chunk_size as f64,
                "must be at least min_chunk_size",
            ));
        }
        if !(0.0..=1.0).contains(&self.matching_threshold) {
            return Err(invalid(
                "matching_threshold",
                self.matching_threshold,
                "must lie in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(invalid(
                "learning_rate",
                self.learning_rate,
                "must lie in [0, 1]",
            ));
        }
        if self.activation_boost < 0.0 || self.initial_activation < 0.0 {
            return Err(invalid(
                "activation",
                self.activation_boost.min(self.initial_activation),
                "activation terms must be non-negative",
            ));
        }
        if self.winner_threshold <= 0.0 {
            return Err(invalid(
                "winner_threshold",
                self.winner_threshold,
                "must be positive",
            ));
        }
        if self.min_chunk_interval < 0.0 {
            return Err(invalid(
                "min_chunk_interval",
                self.min_chunk_interval,
                "must be non-negative",
            ));
        }
        if self.chunk_decay_rate < 0.0 || self.active_chunk_boost < 0.0 {
            return Err(invalid(
                "chunk_rates",
                self.chunk_decay_rate.min(self.active_chunk_boost),
                "must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.reset_decay_factor) {
            return Err(invalid(
                "reset_decay_factor",
                self.reset_decay_factor,
                "must lie in [0, 1]",
            ));
        }
        if self.competition_strength < 0.0 || self.self_excitation < 0.0 {
            return Err(invalid(
                "competition",
                self.competition_strength.min(self.self_excitation),
                "must be non-negative",
            ));
        }
        if !self.item_decay_rate.is_finite() || self.item_decay_rate <= 0.0 {
            return Err(invalid(
                "item_decay_rate",
                self.item_decay_rate,
                "must be positive and finite",
            ));
        }
        if !self.integration_time_step.is_finite() || self.integration_time_step <= 0.0 {
            return Err(invalid(
                "integration_time_step",
                self.integration_time_step,
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(WorkingMemoryConfig::default().validate().is_ok());
        assert!(MaskingFieldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(WorkingMemoryConfig::new(0, 10).is_err());
        assert!(MaskingFieldConfig::new(0).is_err());
    }

    #[test]
    fn test_retrieval_threshold_bounds() {
        let mut config = WorkingMemoryConfig::default();
        config.retrieval_threshold = 1.5;
        assert!(config.validate().is_err());
        config.retrieval_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chunk_size_ordering() {
        let mut config = MaskingFieldConfig::default();
        config.min_chunk_size = 6;
        config.max_chunk_size = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_matching_threshold_range() {
        let mut config = MaskingFieldConfig::default();
        config.matching_threshold = 1.2;
        assert!(config.validate().is_err());
    }
}
