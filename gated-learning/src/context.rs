//! Per-tick learning context.

use crate::error::{LearningError, Result};
use resonance_metrics::ResonanceState;

/// Everything a plasticity step needs to know about one tick. Created
/// per tick from borrowed activations and never stored.
#[derive(Debug, Clone)]
pub struct LearningContext<'a> {
    /// Pre-synaptic activation vector.
    pub pre: &'a [f64],
    /// Post-synaptic activation vector.
    pub post: &'a [f64],
    /// Resonance state, when a detector is attached to the circuit.
    pub resonance: Option<&'a ResonanceState>,
    /// Exogenous attention strength in [0, 1].
    pub attention: f64,
    /// Simulation time of the tick (s).
    pub timestamp: f64,
}

impl<'a> LearningContext<'a> {
    /// Build a context, rejecting attention outside [0, 1].
    pub fn new(
        pre: &'a [f64],
        post: &'a [f64],
        resonance: Option<&'a ResonanceState>,
        attention: f64,
        timestamp: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&attention) {
            return Err(LearningError::InvalidParameter {
                parameter: "attention".to_string(),
                value: attention,
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        Ok(Self {
            pre,
            post,
            resonance,
            attention,
            timestamp,
        })
    }

    /// Consciousness likelihood, when a resonance state is available.
    pub fn consciousness(&self) -> Option<f64> {
        self.resonance.map(|r| r.consciousness_likelihood)
    }

    /// Gating predicate: attention clears its threshold AND either no
    /// resonance detector is attached or consciousness clears its
    /// threshold.
    pub fn should_learn(&self, resonance_threshold: f64, attention_threshold: f64) -> bool {
        if self.attention < attention_threshold {
            return false;
        }
        match self.consciousness() {
            Some(likelihood) => likelihood >= resonance_threshold,
            None => true,
        }
    }

    /// Effective rate: `base * consciousness * attention`, with each
    /// modulatory factor defaulting to 1 when unavailable.
    pub fn effective_rate(&self, base_rate: f64) -> f64 {
        base_rate * self.consciousness().unwrap_or(1.0) * self.attention
    }
}
