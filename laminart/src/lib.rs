//! # LAMINART Framework
//!
//! A biologically motivated cortical simulation engine that classifies
//! temporally ordered input patterns, groups them into hierarchical
//! list chunks, and learns synaptic weights online under attention-
//! and resonance-gating.
//!
//! ## Overview
//!
//! This meta-crate re-exports five specialized libraries:
//!
//! - **[shunting_core]** - Bounded shunting field dynamics and
//!   habituative transmitter gates
//! - **[temporal_chunking]** - Primacy-gradient working memory and
//!   masking-field list chunking
//! - **[gated_learning]** - Hebbian / instar / outstar plasticity
//!   gated by consciousness and attention
//! - **[resonance_metrics]** - Rolling-spectrum oscillation analysis
//!   and resonance detection
//! - **[laminar_circuit]** - The five-layer cortical circuit composing
//!   all of the above, with a parallel-pathway variant
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    LAMINART Framework                    │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  input ──► temporal chunking ──► laminar circuit         │
//! │             (WM ─► masking        (L4 L2/3 L1 L5 L6)     │
//! │              field ─► chunks)          │                 │
//! │                                        ▼                 │
//! │              resonance metrics ◄── activations           │
//! │                     │                                    │
//! │                     ▼                                    │
//! │              gated learning ──► weight matrices          │
//! │                                                          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ### Run the full circuit
//!
//! ```rust
//! use laminart::laminar_circuit::CorticalCircuit;
//!
//! let mut circuit = CorticalCircuit::with_defaults(10).unwrap();
//! let output = circuit.process(&vec![0.8; 10]).unwrap();
//! assert_eq!(output.len(), 10);
//! ```
//!
//! ### Learn under resonance gating
//!
//! ```rust
//! use laminart::gated_learning::LearningRule;
//! use laminart::laminar_circuit::CorticalCircuit;
//!
//! let mut circuit = CorticalCircuit::with_defaults(10).unwrap();
//! circuit.enable_resonance_detection(0.7, 1000.0, 64).unwrap();
//! circuit.enable_learning(LearningRule::hebbian(), 0.01).unwrap();
//!
//! for _ in 0..10 {
//!     circuit.process_and_learn(&vec![0.8; 10]).unwrap();
//! }
//! let stats = circuit.get_circuit_learning_statistics().unwrap();
//! assert_eq!(stats.ticks, 10);
//! ```
//!
//! ### Chunk a sequence without the circuit
//!
//! ```rust
//! use laminart::temporal_chunking::{
//!     MaskingFieldConfig, TemporalProcessor, WorkingMemoryConfig,
//! };
//!
//! let mut processor = TemporalProcessor::new(
//!     WorkingMemoryConfig::new(5, 10).unwrap(),
//!     MaskingFieldConfig::default(),
//!     0.05,
//! )
//! .unwrap();
//!
//! for i in 0..5 {
//!     let mut pattern = vec![0.0; 10];
//!     pattern[i] = 1.0;
//!     processor.process(&pattern).unwrap();
//! }
//! assert!(processor.memory().primacy_gradient_strength() > 0.0);
//! ```
//!
//! ## Project Structure
//!
//! ```text
//! laminart/
//! ├── shunting-core/      # Shunting + transmitter dynamics
//! ├── temporal-chunking/  # Working memory + masking field
//! ├── gated-learning/     # Plasticity rules + controller
//! ├── resonance-metrics/  # Oscillation + resonance analysis
//! ├── laminar-circuit/    # Five-layer circuit + optimized variant
//! └── laminart/           # This meta-crate
//! ```

pub use gated_learning;
pub use laminar_circuit;
pub use resonance_metrics;
pub use shunting_core;
pub use temporal_chunking;

/// Framework version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let params = shunting_core::ShuntingParams::new(1.0, 1.0, 0.0).unwrap();
        let field = shunting_core::ShuntingDynamics::new(4, params).unwrap();
        assert_eq!(field.size(), 4);

        let detector = resonance_metrics::ResonanceDetector::new(0.7, 1000.0, 64).unwrap();
        let state = detector.evaluate(0.5, 0.9, 0.2, 0.0);
        assert!(state.art_resonance);
        approx::assert_relative_eq!(state.consciousness_likelihood, 0.64, epsilon = 1e-12);
    }

    #[test]
    fn test_full_stack_smoke() {
        let mut circuit = laminar_circuit::CorticalCircuitOptimized::with_defaults(8, Some(2))
            .unwrap();
        circuit
            .enable_learning(gated_learning::LearningRule::Instar, 0.05)
            .unwrap();

        for _ in 0..5 {
            let detailed = circuit.process_and_learn(&vec![0.9; 8]).unwrap();
            assert_eq!(detailed.l5_output.len(), 8);
        }
        assert_eq!(circuit.statistics().ticks, 5);
    }
}
