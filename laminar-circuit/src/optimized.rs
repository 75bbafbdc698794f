//! Parallel-pathway circuit variant.
//!
//! Same contract as [`CorticalCircuit`], with the independent arms of
//! each tick executed on a bounded rayon pool sized at construction.
//! When the pool cannot be built or has been torn down, every tick
//! falls back to the sequential path and the fallback is counted.

use crate::circuit::{CircuitState, CircuitStatistics, DetailedOutput, DEFAULT_SEED};
use crate::error::Result;
use crate::layers::{Layer1, Layer23, Layer4, Layer5, Layer6, LayerId};
use crate::params::{Layer1Params, Layer23Params, Layer4Params, Layer5Params, Layer6Params};
use gated_learning::{LearningRule, LearningStatistics};
use rayon::{ThreadPool, ThreadPoolBuilder};
use temporal_chunking::TemporalProcessor;

/// Optimized circuit with a bounded worker pool.
pub struct CorticalCircuitOptimized {
    state: CircuitState,
    pool: Option<ThreadPool>,
    worker_count: usize,
    pool_fallbacks: u64,
}

impl CorticalCircuitOptimized {
    /// Compose the optimized circuit. `worker_count` defaults to the
    /// available parallelism; pool construction failure degrades the
    /// instance to the sequential path.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        size: usize,
        l1_params: Layer1Params,
        l23_params: Layer23Params,
        l4_params: Layer4Params,
        l5_params: Layer5Params,
        l6_params: Layer6Params,
        temporal: TemporalProcessor,
        worker_count: Option<usize>,
    ) -> Result<Self> {
        let state = CircuitState::new(
            size, l1_params, l23_params, l4_params, l5_params, l6_params, temporal, DEFAULT_SEED,
        )?;
        let workers = worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                tracing::warn!(%err, "worker pool unavailable, running sequentially");
                None
            }
        };
        Ok(Self {
            state,
            pool,
            worker_count: workers,
            pool_fallbacks: 0,
        })
    }

    /// Optimized circuit of `size` units with default parameters.
    pub fn with_defaults(size: usize, worker_count: Option<usize>) -> Result<Self> {
        use crate::circuit::DEFAULT_ITEM_DURATION;
        use temporal_chunking::{MaskingFieldConfig, WorkingMemoryConfig};

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
            worker_count,
        )
    }

    /// Number of units per layer.
    pub fn size(&self) -> usize {
        self.state.size()
    }

    /// Configured worker count.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Ticks that ran sequentially because no pool was available.
    pub fn pool_fallbacks(&self) -> u64 {
        self.pool_fallbacks
    }

    /// One tick; returns the L5 output.
    pub fn process(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.process_detailed(input)?.l5_output)
    }

    /// One tick with every intermediate exposed. The independent arms
    /// run on the pool; the pool is released on every exit path.
    pub fn process_detailed(&mut self, input: &[f64]) -> Result<DetailedOutput> {
        match self.pool.take() {
            Some(pool) => {
                let result = pool.install(|| self.state.tick(input, true));
                self.pool = Some(pool);
                result
            }
            None => {
                self.pool_fallbacks += 1;
                self.state.tick(input, false)
            }
        }
    }

    /// One tick followed by a gated learning step.
    pub fn process_and_learn(&mut self, input: &[f64]) -> Result<DetailedOutput> {
        let mut detailed = self.process_detailed(input)?;
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

    /// Install a top-down expectation on L6.
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

    /// Return every layer and the temporal pipeline to rest.
    pub fn reset(&mut self) {
        self.state.reset()
    }

    /// Tear down the worker pool and trackers; further processing is
    /// rejected.
    pub fn close(&mut self) {
        self.pool = None;
        self.state.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CorticalCircuit;

    /// Agreement bound with the sequential circuit.
    const TOLERANCE: f64 = 1e-5;

    #[test]
    fn test_defaults_and_worker_count() {
        let c = CorticalCircuitOptimized::with_defaults(10, Some(2)).unwrap();
        assert_eq!(c.size(), 10);
        assert_eq!(c.worker_count(), 2);
        assert_eq!(c.pool_fallbacks(), 0);
    }

    #[test]
    fn test_matches_sequential_circuit() {
        let mut sequential = CorticalCircuit::with_defaults(10).unwrap();
        let mut optimized = CorticalCircuitOptimized::with_defaults(10, Some(2)).unwrap();

        let inputs: Vec<Vec<f64>> = (0..8)
            .map(|k| (0..10).map(|i| ((i + k) % 4) as f64 * 0.25).collect())
            .collect();

        for input in &inputs {
            let a = sequential.process_detailed(input).unwrap();
            let b = optimized.process_detailed(input).unwrap();
            for (x, y) in a.l5_output.iter().zip(&b.l5_output) {
                assert!((x - y).abs() <= TOLERANCE, "{x} vs {y}");
            }
            for (x, y) in a.l6_output.iter().zip(&b.l6_output) {
                assert!((x - y).abs() <= TOLERANCE);
            }
            for (x, y) in a.l23_with_priming.iter().zip(&b.l23_with_priming) {
                assert!((x - y).abs() <= TOLERANCE);
            }
        }
    }

    #[test]
    fn test_matches_after_reset() {
        let mut optimized = CorticalCircuitOptimized::with_defaults(6, Some(2)).unwrap();
        let input = vec![0.6; 6];

        let first = optimized.process(&input).unwrap();
        optimized.reset();
        let second = optimized.process(&input).unwrap();
        for (x, y) in first.iter().zip(&second) {
            approx::assert_relative_eq!(x, y, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn test_close_tears_down_pool() {
        let mut c = CorticalCircuitOptimized::with_defaults(4, Some(2)).unwrap();
        c.process(&vec![0.5; 4]).unwrap();
        c.close();
        assert!(c.process(&vec![0.5; 4]).is_err());
    }

    #[test]
    fn test_learning_through_optimized_path() {
        let mut c = CorticalCircuitOptimized::with_defaults(6, Some(2)).unwrap();
        c.enable_learning(LearningRule::hebbian(), 0.01).unwrap();

        for _ in 0..5 {
            c.process_and_learn(&vec![0.8; 6]).unwrap();
        }

        let stats = c.get_circuit_learning_statistics().unwrap();
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.applied, 5);
    }
}
