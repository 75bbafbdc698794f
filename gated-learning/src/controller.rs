//! Gated plasticity controller.
//!
//! The controller owns the active rule, per-layer base rates and the
//! two gate thresholds. Gating is evaluated once per tick (attention
//! and resonance are tick-global signals), then the surviving rule is
//! applied to each layer's weight matrix at its effective rate.

use crate::context::LearningContext;
use crate::error::{LearningError, Result};
use crate::rules::LearningRule;
use crate::weights::WeightMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters for one layer's plasticity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerLearningStats {
    pub attempted: u64,
    pub applied: u64,
    pub resonance_gated: u64,
    pub attention_gated: u64,
}

/// Circuit-level statistics: per-layer counters plus a tick-level
/// aggregate where each processed tick counts exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningStatistics {
    pub ticks: u64,
    pub attempted: u64,
    pub applied: u64,
    pub resonance_gated: u64,
    pub attention_gated: u64,
    pub per_layer: BTreeMap<String, LayerLearningStats>,
}

/// Outcome of the tick-level gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Both gates cleared; layer updates may proceed.
    Learn,
    /// Attention fell below its threshold.
    AttentionGated,
    /// Consciousness likelihood fell below its threshold.
    ResonanceGated,
    /// Learning is disabled.
    Disabled,
}

/// Summary of one layer's update within a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerUpdateSummary {
    pub layer: String,
    pub applied: bool,
    pub effective_rate: f64,
}

/// Resonance- and attention-gated plasticity across named layers.
pub struct LearningController {
    rule: LearningRule,
    default_rate: f64,
    layer_rates: BTreeMap<String, f64>,
    resonance_threshold: f64,
    attention_threshold: f64,
    enabled: bool,
    stats: LearningStatistics,
}

fn check_unit_interval(parameter: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(LearningError::InvalidParameter {
            parameter: parameter.to_string(),
            value,
            reason: "must lie in [0, 1]".to_string(),
        });
    }
    Ok(())
}

impl LearningController {
    /// Create a controller with the given rule and default base rate.
    pub fn new(rule: LearningRule, default_rate: f64) -> Result<Self> {
        check_unit_interval("default_rate", default_rate)?;
        Ok(Self {
            rule,
            default_rate,
            layer_rates: BTreeMap::new(),
            resonance_threshold: 0.5,
            attention_threshold: 0.1,
            enabled: true,
            stats: LearningStatistics::default(),
        })
    }

    /// Override the base rate for one layer.
    pub fn set_layer_rate(&mut self, layer: &str, rate: f64) -> Result<()> {
        check_unit_interval("rate", rate)?;
        self.layer_rates.insert(layer.to_string(), rate);
        Ok(())
    }

    /// Replace the active rule.
    pub fn set_rule(&mut self, rule: LearningRule) {
        self.rule = rule;
    }

    /// Enable plasticity.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable plasticity; `step_layer` becomes a no-op.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether plasticity is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the consciousness-likelihood threshold.
    pub fn set_resonance_threshold(&mut self, threshold: f64) -> Result<()> {
        check_unit_interval("resonance_threshold", threshold)?;
        self.resonance_threshold = threshold;
        Ok(())
    }

    /// Set the attention threshold.
    pub fn set_attention_threshold(&mut self, threshold: f64) -> Result<()> {
        check_unit_interval("attention_threshold", threshold)?;
        self.attention_threshold = threshold;
        Ok(())
    }

    /// Current thresholds `(resonance, attention)`.
    pub fn thresholds(&self) -> (f64, f64) {
        (self.resonance_threshold, self.attention_threshold)
    }

    /// Evaluate the tick-level gate and advance the aggregate
    /// counters. Call exactly once per circuit tick, before any
    /// `step_layer` calls of that tick.
    pub fn begin_tick(&mut self, ctx: &LearningContext<'_>) -> GateDecision {
        if !self.enabled {
            return GateDecision::Disabled;
        }
        self.stats.ticks += 1;
        self.stats.attempted += 1;

        if ctx.attention < self.attention_threshold {
            self.stats.attention_gated += 1;
            return GateDecision::AttentionGated;
        }
        if let Some(likelihood) = ctx.consciousness() {
            if likelihood < self.resonance_threshold {
                self.stats.resonance_gated += 1;
                return GateDecision::ResonanceGated;
            }
        }
        self.stats.applied += 1;
        GateDecision::Learn
    }

    /// Apply the rule to one layer's weights at its effective rate.
    ///
    /// The caller is expected to have received [`GateDecision::Learn`]
    /// from `begin_tick` this tick; calling it after a gated decision
    /// records the gating in the layer's counters without touching the
    /// weights.
    pub fn step_layer(
        &mut self,
        layer: &str,
        decision: GateDecision,
        ctx: &LearningContext<'_>,
        weights: &mut WeightMatrix,
    ) -> Result<LayerUpdateSummary> {
        let layer_stats = self.stats.per_layer.entry(layer.to_string()).or_default();
        layer_stats.attempted += 1;

        match decision {
            GateDecision::Disabled => {
                return Ok(LayerUpdateSummary {
                    layer: layer.to_string(),
                    applied: false,
                    effective_rate: 0.0,
                });
            }
            GateDecision::AttentionGated => {
                layer_stats.attention_gated += 1;
                return Ok(LayerUpdateSummary {
                    layer: layer.to_string(),
                    applied: false,
                    effective_rate: 0.0,
                });
            }
            GateDecision::ResonanceGated => {
                layer_stats.resonance_gated += 1;
                return Ok(LayerUpdateSummary {
                    layer: layer.to_string(),
                    applied: false,
                    effective_rate: 0.0,
                });
            }
            GateDecision::Learn => {}
        }

        let base = self
            .layer_rates
            .get(layer)
            .copied()
            .unwrap_or(self.default_rate);
        let rate = ctx.effective_rate(base).clamp(0.0, 1.0);

        // A zero effective rate cannot change any weight; skip the
        // rule so the matrices stay bitwise untouched
        let applied = if rate > 0.0 {
            self.rule
                .update(ctx.pre, ctx.post, weights, rate, ctx.consciousness())?
        } else {
            false
        };

        if applied {
            layer_stats.applied += 1;
        } else if matches!(self.rule, LearningRule::ResonanceGated { .. }) && rate > 0.0 {
            layer_stats.resonance_gated += 1;
        }

        Ok(LayerUpdateSummary {
            layer: layer.to_string(),
            applied,
            effective_rate: rate,
        })
    }

    /// Current statistics (defensive copy).
    pub fn statistics(&self) -> LearningStatistics {
        self.stats.clone()
    }

    /// Zero all counters.
    pub fn reset_statistics(&mut self) {
        self.stats = LearningStatistics::default();
    }
}
