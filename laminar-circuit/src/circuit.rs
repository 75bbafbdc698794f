//! The laminar cortical circuit.
//!
//! One tick follows a fixed schedule (the apparent L6 -> L2/3 -> L4 ->
//! L6 loop is only cyclic across ticks; within a tick it is a DAG):
//!
//! 1. temporal: working memory -> masking field -> combined pattern
//! 2. bottom-up: L4 -> L2/3 -> L1
//! 3. top-down: L6 fires from L2/3; its expectation folds back into
//!    L2/3 and its feedback into L4
//! 4. priming: L1 modulates L2/3
//! 5. output: L5 amplifies the primed L2/3 activation
//! 6. resonance: the detector folds coherence, match and amplitude
//!    into a consciousness likelihood
//!
//! Learning, when enabled, runs strictly after the pathway has
//! finished writing activations and is gated per tick by attention and
//! resonance.

use crate::error::{CircuitError, Result};
use crate::layers::{CorticalLayer, Layer1, Layer23, Layer4, Layer5, Layer6, LayerId};
use crate::params::{Layer1Params, Layer23Params, Layer4Params, Layer5Params, Layer6Params};
use gated_learning::{
    LearningContext, LearningController, LearningRule, LearningStatistics, LayerUpdateSummary,
};
use resonance_metrics::{pattern_match, phase_coherence, ResonanceDetector, ResonanceState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use temporal_chunking::{
    MaskingFieldConfig, TemporalProcessor, TemporalResult, WorkingMemoryConfig,
};

/// Default deterministic seed for weight initialization.
pub const DEFAULT_SEED: u64 = 42;

/// Integration step of one circuit tick (s).
pub const TICK_DT: f64 = 0.001;

/// Default working-memory encoding time per tick (s).
pub const DEFAULT_ITEM_DURATION: f64 = 0.05;

/// Every intermediate of one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedOutput {
    pub temporal_pattern: Vec<f64>,
    pub l4_output: Vec<f64>,
    pub l23_output: Vec<f64>,
    pub l1_output: Vec<f64>,
    pub l6_output: Vec<f64>,
    pub l5_output: Vec<f64>,
    pub l23_top_down: Vec<f64>,
    pub l4_top_down: Vec<f64>,
    pub l23_with_priming: Vec<f64>,
    pub temporal_result: TemporalResult,
    pub resonance: Option<ResonanceState>,
    pub learning: Option<Vec<LayerUpdateSummary>>,
}

/// Aggregate circuit statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitStatistics {
    pub ticks: u64,
    pub degraded_ticks: u64,
    pub per_layer_degraded: BTreeMap<String, u64>,
    pub resonance_enabled: bool,
    pub learning: Option<LearningStatistics>,
}

impl CircuitStatistics {
    /// Serialize the statistics record to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Shared implementation of the sequential and optimized circuits.
pub(crate) struct CircuitState {
    size: usize,
    dt: f64,
    pub(crate) l1: Layer1,
    pub(crate) l23: Layer23,
    pub(crate) l4: Layer4,
    pub(crate) l5: Layer5,
    pub(crate) l6: Layer6,
    temporal: TemporalProcessor,
    detector: Option<ResonanceDetector>,
    controller: Option<LearningController>,
    attention: f64,
    ticks: u64,
    closed: bool,
}

impl CircuitState {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        size: usize,
        l1_params: Layer1Params,
        l23_params: Layer23Params,
        l4_params: Layer4Params,
        l5_params: Layer5Params,
        l6_params: Layer6Params,
        temporal: TemporalProcessor,
        seed: u64,
    ) -> Result<Self> {
        if size == 0 {
            return Err(CircuitError::InvalidParameter {
                parameter: "size".to_string(),
                value: 0.0,
                reason: "circuit must have at least one unit".to_string(),
            });
        }
        Ok(Self {
            size,
            dt: TICK_DT,
            l1: Layer1::new(size, l1_params, seed.wrapping_add(1))?,
            l23: Layer23::new(size, l23_params, seed.wrapping_add(2))?,
            l4: Layer4::new(size, l4_params, seed.wrapping_add(3))?,
            l5: Layer5::new(size, l5_params, seed.wrapping_add(4))?,
            l6: Layer6::new(size, l6_params, seed.wrapping_add(5))?,
            temporal,
            detector: None,
            controller: None,
            attention: 1.0,
            ticks: 0,
            closed: false,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Right-pad short inputs with zeros; truncate long ones.
    fn fit(&self, input: &[f64]) -> Vec<f64> {
        let mut padded = input.to_vec();
        padded.resize(self.size, 0.0);
        padded
    }

    /// One full tick of the pathway schedule. With `parallel`, the
    /// independent arms (L1 priming vs. L6 feedback; the two top-down
    /// applications) run under the installed rayon pool.
    pub(crate) fn tick(&mut self, input: &[f64], parallel: bool) -> Result<DetailedOutput> {
        if self.closed {
            return Err(CircuitError::Closed);
        }
        let dt = self.dt;
        let padded = self.fit(input);

        // 1. Temporal pipeline
        let temporal_result = self.temporal.process(&padded)?;
        let temporal_pattern = temporal_result.combined_pattern.clone();

        // 2. Bottom-up spine
        let l4_output = self.l4.process_bottom_up(&temporal_pattern, dt)?;
        let l23_output = self.l23.process_bottom_up(&l4_output, dt)?;

        // 3. Independent arms from the L2/3 activation
        let (l1_output, l6_output) = if parallel {
            let (l1, l6) = (&mut self.l1, &mut self.l6);
            let (a, b) = rayon::join(
                || l1.process_top_down(&l23_output, dt),
                || l6.process_bottom_up(&l23_output, dt),
            );
            (a?, b?)
        } else {
            (
                self.l1.process_top_down(&l23_output, dt)?,
                self.l6.process_bottom_up(&l23_output, dt)?,
            )
        };

        // 4. Top-down applications
        let l4_top_down = self.l6.generate_feedback_to_l4(&l6_output);
        let l23_top_down = if parallel {
            let (l23, l4) = (&mut self.l23, &mut self.l4);
            let (a, b) = rayon::join(
                || l23.apply_top_down(&l6_output, dt),
                || l4.apply_top_down(&l4_top_down, dt),
            );
            b?;
            a?
        } else {
            let a = self.l23.apply_top_down(&l6_output, dt)?;
            self.l4.apply_top_down(&l4_top_down, dt)?;
            a
        };

        // 5. Priming and output
        let l23_with_priming = self.l23.apply_priming(&l1_output, dt)?;
        let l5_output = self.l5.process_bottom_up(&l23_with_priming, dt)?;

        self.ticks += 1;

        // 6. Resonance
        let resonance = self.detect_resonance(&l4_output, &l6_output, &l5_output);

        Ok(DetailedOutput {
            temporal_pattern,
            l4_output,
            l23_output,
            l1_output,
            l6_output,
            l5_output,
            l23_top_down,
            l4_top_down,
            l23_with_priming,
            temporal_result,
            resonance,
            learning: None,
        })
    }

    fn detect_resonance(
        &mut self,
        l4_output: &[f64],
        l6_output: &[f64],
        l5_output: &[f64],
    ) -> Option<ResonanceState> {
        let detector = self.detector.as_ref()?;

        let phases: Vec<f64> = [
            self.l4.oscillation_metrics(),
            self.l23.oscillation_metrics(),
            self.l5.oscillation_metrics(),
            self.l6.oscillation_metrics(),
        ]
        .into_iter()
        .flatten()
        .map(|m| m.phase)
        .collect();
        let coherence = phase_coherence(&phases);

        let expected = self
            .l6
            .expectation()
            .unwrap_or_else(|| l6_output.to_vec());
        let match_score = pattern_match(&expected, l4_output);
        let amplitude = l5_output.iter().cloned().fold(0.0f64, f64::max);

        let timestamp = self.ticks as f64 * self.dt;
        Some(detector.evaluate(coherence, match_score, amplitude, timestamp))
    }

    /// Gated plasticity over all five layers, run strictly after the
    /// pathway of `detailed` finished.
    pub(crate) fn learn(&mut self, detailed: &DetailedOutput) -> Result<Vec<LayerUpdateSummary>> {
        let timestamp = self.ticks as f64 * self.dt;
        let attention = self.attention;
        let resonance = detailed.resonance.as_ref();

        let controller = self
            .controller
            .as_mut()
            .ok_or(CircuitError::LearningNotEnabled)?;

        let gate_ctx = LearningContext::new(
            &detailed.temporal_pattern,
            &detailed.l4_output,
            resonance,
            attention,
            timestamp,
        )?;
        let decision = controller.begin_tick(&gate_ctx);

        let pairs: [(LayerId, &[f64], &[f64]); 5] = [
            (LayerId::L4, &detailed.temporal_pattern, &detailed.l4_output),
            (LayerId::L23, &detailed.l4_output, &detailed.l23_with_priming),
            (LayerId::L1, &detailed.l23_output, &detailed.l1_output),
            (LayerId::L5, &detailed.l23_with_priming, &detailed.l5_output),
            (LayerId::L6, &detailed.l23_output, &detailed.l6_output),
        ];

        let mut summaries = Vec::with_capacity(pairs.len());
        for (id, pre, post) in pairs {
            let ctx = LearningContext::new(pre, post, resonance, attention, timestamp)?;
            let weights = match id {
                LayerId::L1 => self.l1.weights_mut(),
                LayerId::L23 => self.l23.weights_mut(),
                LayerId::L4 => self.l4.weights_mut(),
                LayerId::L5 => self.l5.weights_mut(),
                LayerId::L6 => self.l6.weights_mut(),
            };
            summaries.push(controller.step_layer(id.as_str(), decision, &ctx, weights)?);
        }
        Ok(summaries)
    }

    pub(crate) fn enable_resonance_detection(
        &mut self,
        threshold: f64,
        sample_rate: f64,
        history_size: usize,
    ) -> Result<()> {
        let detector = ResonanceDetector::new(threshold, sample_rate, history_size)?;
        self.l1.enable_oscillation_tracking(sample_rate, history_size)?;
        self.l23.enable_oscillation_tracking(sample_rate, history_size)?;
        self.l4.enable_oscillation_tracking(sample_rate, history_size)?;
        self.l5.enable_oscillation_tracking(sample_rate, history_size)?;
        self.l6.enable_oscillation_tracking(sample_rate, history_size)?;
        self.detector = Some(detector);
        Ok(())
    }

    pub(crate) fn enable_learning(&mut self, rule: LearningRule, default_rate: f64) -> Result<()> {
        match self.controller.as_mut() {
            Some(controller) => {
                controller.set_rule(rule);
                controller.enable();
            }
            None => {
                self.controller = Some(LearningController::new(rule, default_rate)?);
            }
        }
        Ok(())
    }

    pub(crate) fn disable_learning(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.disable();
        }
    }

    pub(crate) fn set_layer_learning_rate(&mut self, layer: LayerId, rate: f64) -> Result<()> {
        let controller = self
            .controller
            .as_mut()
            .ok_or(CircuitError::LearningNotEnabled)?;
        controller.set_layer_rate(layer.as_str(), rate)?;
        Ok(())
    }

    pub(crate) fn set_resonance_learning_threshold(&mut self, threshold: f64) -> Result<()> {
        let controller = self
            .controller
            .as_mut()
            .ok_or(CircuitError::LearningNotEnabled)?;
        controller.set_resonance_threshold(threshold)?;
        Ok(())
    }

    pub(crate) fn set_attention_learning_threshold(&mut self, threshold: f64) -> Result<()> {
        let controller = self
            .controller
            .as_mut()
            .ok_or(CircuitError::LearningNotEnabled)?;
        controller.set_attention_threshold(threshold)?;
        Ok(())
    }

    pub(crate) fn set_attention(&mut self, attention: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&attention) {
            return Err(CircuitError::InvalidParameter {
                parameter: "attention".to_string(),
                value: attention,
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        self.attention = attention;
        Ok(())
    }

    pub(crate) fn set_top_down_expectation(&mut self, pattern: &[f64]) -> Result<()> {
        let padded = self.fit(pattern);
        self.l6.set_top_down_expectation(&padded)
    }

    pub(crate) fn learning_statistics(&self) -> Option<LearningStatistics> {
        self.controller.as_ref().map(|c| c.statistics())
    }

    pub(crate) fn statistics(&self) -> CircuitStatistics {
        let mut per_layer_degraded = BTreeMap::new();
        per_layer_degraded.insert(LayerId::L1.as_str().to_string(), self.l1.degraded_ticks());
        per_layer_degraded.insert(LayerId::L23.as_str().to_string(), self.l23.degraded_ticks());
        per_layer_degraded.insert(LayerId::L4.as_str().to_string(), self.l4.degraded_ticks());
        per_layer_degraded.insert(LayerId::L5.as_str().to_string(), self.l5.degraded_ticks());
        per_layer_degraded.insert(LayerId::L6.as_str().to_string(), self.l6.degraded_ticks());
        CircuitStatistics {
            ticks: self.ticks,
            degraded_ticks: per_layer_degraded.values().sum(),
            per_layer_degraded,
            resonance_enabled: self.detector.is_some(),
            learning: self.learning_statistics(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.l1.reset();
        self.l23.reset();
        self.l4.reset();
        self.l5.reset();
        self.l6.reset();
        self.temporal.reset();
        self.ticks = 0;
    }

    pub(crate) fn close(&mut self) {
        self.l1.disable_oscillation_tracking();
        self.l23.disable_oscillation_tracking();
        self.l4.disable_oscillation_tracking();
        self.l5.disable_oscillation_tracking();
        self.l6.disable_oscillation_tracking();
        self.detector = None;
        self.closed = true;
    }

    pub(crate) fn temporal_processor(&self) -> &TemporalProcessor {
        &self.temporal
    }
}

/// The sequential five-layer cortical circuit.
pub struct CorticalCircuit {
    pub(crate) state: CircuitState,
}

impl CorticalCircuit {
    /// Compose the circuit from per-layer parameter blocks and a
    /// temporal processor, using the default deterministic seed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        size: usize,
        l1_params: Layer1Params,
        l23_params: Layer23Params,
        l4_params: Layer4Params,
        l5_params: Layer5Params,
        l6_params: Layer6Params,
        temporal: TemporalProcessor,
    ) -> Result<Self> {
        Self::with_seed(
            size, l1_params, l23_params, l4_params, l5_params, l6_params, temporal, DEFAULT_SEED,
        )
    }

    /// As [`CorticalCircuit::new`], with an explicit weight seed.
    #[allow(clippy::too_many_arguments)]
    pub fn with_seed(
        size: usize,
        l1_params: Layer1Params,
        l23_params: Layer23Params,
        l4_params: Layer4Params,
        l5_params: Layer5Params,
        l6_params: Layer6Params,
        temporal: TemporalProcessor,
        seed: u64,
    ) -> Result<Self> {
        Ok(Self {
            state: CircuitState::new(
                size, l1_params, l23_params, l4_params, l5_params, l6_params, temporal, seed,
            )?,
        })
    }

    /// A circuit of `size` units with every parameter at its
    /// documented default.
    pub fn with_defaults(size: usize) -> Result<Self> {
        let temporal = TemporalProcessor::new(
            WorkingMemoryConfig::new(7, size)?,
            MaskingFieldConfig::default(),
            DEFAULT_ITEM_DURATION,
        )?;
        Self::new(
            size,
            Layer1Params::default(),
            Layer23Params::default(),
            Layer4Params::default(),
            Layer5Params::default(),
            Layer6Params::default(),
            temporal,
        )
    }

    /// Number of units per layer.
    pub fn size(&self) -> usize {
        self.state.size()
    }

    /// One tick; returns the L5 output.
    pub fn process(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.state.tick(input, false)?.l5_output)
    }

    /// One tick with every intermediate exposed.
    pub fn process_detailed(&mut self, input: &[f64]) -> Result<DetailedOutput> {
        self.state.tick(input, false)
    }

    /// One tick followed by a gated learning step.
    pub fn process_and_learn(&mut self, input: &[f64]) -> Result<DetailedOutput> {
        let mut detailed = self.state.tick(input, false)?;
        let summaries = self.state.learn(&detailed)?;
        detailed.learning = Some(summaries);
        Ok(detailed)
    }

    /// Attach a resonance detector and per-layer oscillation trackers.
    pub fn enable_resonance_detection(
        &mut self,
        threshold: f64,
        sample_rate: f64,
        history_size: usize,
    ) -> Result<()> {
        self.state
            .enable_resonance_detection(threshold, sample_rate, history_size)
    }

    /// Enable plasticity under the given rule and default base rate.
    pub fn enable_learning(&mut self, rule: LearningRule, default_rate: f64) -> Result<()> {
        self.state.enable_learning(rule, default_rate)
    }

    /// Suspend plasticity; statistics are preserved.
    pub fn disable_learning(&mut self) {
        self.state.disable_learning()
    }

    /// Override the base learning rate of one layer.
    pub fn set_layer_learning_rate(&mut self, layer: LayerId, rate: f64) -> Result<()> {
        self.state.set_layer_learning_rate(layer, rate)
    }

    /// Set the consciousness-likelihood gate threshold.
    pub fn set_resonance_learning_threshold(&mut self, threshold: f64) -> Result<()> {
        self.state.set_resonance_learning_threshold(threshold)
    }

    /// Set the attention gate threshold.
    pub fn set_attention_learning_threshold(&mut self, threshold: f64) -> Result<()> {
        self.state.set_attention_learning_threshold(threshold)
    }

    /// Set the exogenous attention strength used by the learning gate.
    pub fn set_attention(&mut self, attention: f64) -> Result<()> {
        self.state.set_attention(attention)
    }

    /// Install a top-down expectation on L6 (padded/truncated to the
    /// circuit size).
    pub fn set_top_down_expectation(&mut self, pattern: &[f64]) -> Result<()> {
        self.state.set_top_down_expectation(pattern)
    }

    /// Learning statistics, when learning has been enabled.
    pub fn get_circuit_learning_statistics(&self) -> Option<LearningStatistics> {
        self.state.learning_statistics()
    }

    /// Aggregate circuit statistics.
    pub fn statistics(&self) -> CircuitStatistics {
        self.state.statistics()
    }

    /// The temporal processor.
    pub fn temporal_processor(&self) -> &TemporalProcessor {
        self.state.temporal_processor()
    }

    /// Layer accessors.
    pub fn layer1(&self) -> &Layer1 {
        &self.state.l1
    }

    pub fn layer23(&self) -> &Layer23 {
        &self.state.l23
    }

    pub fn layer4(&self) -> &Layer4 {
        &self.state.l4
    }

    pub fn layer5(&self) -> &Layer5 {
        &self.state.l5
    }

    pub fn layer6(&self) -> &Layer6 {
        &self.state.l6
    }

    /// Return every layer and the temporal pipeline to rest. Weights
    /// and statistics are preserved.
    pub fn reset(&mut self) {
        self.state.reset()
    }

    /// Tear down trackers and refuse further processing.
    pub fn close(&mut self) {
        self.state.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit() -> CorticalCircuit {
        CorticalCircuit::with_defaults(10).unwrap()
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(CorticalCircuit::with_defaults(0).is_err());
    }

    #[test]
    fn test_output_dimension_matches_size() {
        let mut c = circuit();
        let out = c.process(&vec![0.5; 10]).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn test_input_padding_and_truncation() {
        let mut c = circuit();
        // Short input is right-padded
        let out = c.process(&[0.5, 0.5]).unwrap();
        assert_eq!(out.len(), 10);

        c.reset();
        // Long input is truncated
        let out = c.process(&vec![0.5; 25]).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn test_outputs_bounded() {
        let mut c = circuit();
        for _ in 0..50 {
            let out = c.process(&vec![1.0; 10]).unwrap();
            assert!(out.iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn test_process_detailed_exposes_all_stages() {
        let mut c = circuit();
        let detailed = c.process_detailed(&vec![0.8; 10]).unwrap();
        assert_eq!(detailed.temporal_pattern.len(), 10);
        assert_eq!(detailed.l4_output.len(), 10);
        assert_eq!(detailed.l23_output.len(), 10);
        assert_eq!(detailed.l1_output.len(), 10);
        assert_eq!(detailed.l6_output.len(), 10);
        assert_eq!(detailed.l5_output.len(), 10);
        assert!(detailed.resonance.is_none());
        assert!(detailed.learning.is_none());
    }

    #[test]
    fn test_closed_circuit_rejects_processing() {
        let mut c = circuit();
        c.close();
        assert!(matches!(
            c.process(&vec![0.0; 10]),
            Err(CircuitError::Closed)
        ));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut c = circuit();
        for _ in 0..5 {
            c.process(&vec![0.7; 10]).unwrap();
        }
        c.reset();
        let once = c.layer23().activation();
        c.reset();
        let twice = c.layer23().activation();
        assert_eq!(once, twice);
        assert!(once.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_learning_setters_require_enable() {
        let mut c = circuit();
        assert!(matches!(
            c.set_resonance_learning_threshold(0.5),
            Err(CircuitError::LearningNotEnabled)
        ));
        assert!(matches!(
            c.set_layer_learning_rate(LayerId::L4, 0.1),
            Err(CircuitError::LearningNotEnabled)
        ));

        c.enable_learning(LearningRule::hebbian(), 0.01).unwrap();
        assert!(c.set_resonance_learning_threshold(0.5).is_ok());
        assert!(c.set_layer_learning_rate(LayerId::L4, 0.1).is_ok());
    }

    #[test]
    fn test_statistics_serialize() {
        let mut c = circuit();
        c.process(&vec![0.5; 10]).unwrap();
        let stats = c.statistics();
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.degraded_ticks, 0);

        let json = stats.to_json().unwrap();
        assert!(json.contains("\"ticks\": 1"));
    }

    #[test]
    fn test_attention_range_checked() {
        let mut c = circuit();
        assert!(c.set_attention(1.5).is_err());
        assert!(c.set_attention(0.3).is_ok());
    }
}
