//! # Laminar Circuit Library
//!
//! A five-layer laminar cortical circuit that classifies temporally
//! ordered input patterns, forms list chunks over them, and learns
//! synaptic weights online under attention- and resonance-gating.
//!
//! ## Overview
//!
//! The circuit composes:
//!
//! - **L4** (fast driving input), **L2/3** (integration under lateral
//!   competition), **L1** (slow priming), **L5** (output/category with
//!   burst amplification) and **L6** (modulatory feedback obeying the
//!   ART matching rule)
//! - a **temporal processor** (primacy-gradient working memory feeding
//!   a masking field) in front of L4
//! - an optional **resonance detector** deriving a consciousness
//!   likelihood from phase coherence, expectation match and output
//!   amplitude
//! - an optional **learning controller** applying gated Hebbian /
//!   instar / outstar plasticity to the per-layer weight matrices
//!
//! ## Data flow per tick
//!
//! ```text
//! input -> temporal (WM -> masking field) -> L4 -> L2/3 -> L1
//!                                             \     |
//!                                  L6 <- L2/3  \    v
//!                                   |            priming
//!                  feedback to L4 <-+-> expectation to L2/3
//!                                             |
//!                                             v
//!                                        L5 output
//! ```
//!
//! The loop through L6 is only cyclic across ticks; within one tick
//! the schedule is a fixed DAG.
//!
//! ## Quick Start
//!
//! ```rust
//! use laminar_circuit::CorticalCircuit;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut circuit = CorticalCircuit::with_defaults(10)?;
//!
//! let input = vec![0.8; 10];
//! let output = circuit.process(&input)?;
//! assert_eq!(output.len(), 10);
//!
//! let detailed = circuit.process_detailed(&input)?;
//! assert_eq!(detailed.l6_output.len(), 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - Outputs are clamped to `[0, ceiling]` and match the circuit size;
//!   short inputs are right-padded, long ones truncated.
//! - Zero input yields exactly zero L5 and L6 output: the modulatory
//!   L6 layer can never fire without bottom-up support.
//! - Two circuits constructed with identical parameters produce
//!   identical outputs for identical `reset()` + `process()`
//!   sequences; the optimized variant agrees within 1e-5 per
//!   component.
//! - With learning disabled, `process` leaves every weight matrix
//!   bitwise unchanged.
//! - Non-finite activations are recovered by resetting the affected
//!   layer; the tick is counted as degraded and processing continues.
//!
//! ## References
//!
//! - Grossberg (2013). Adaptive resonance theory: how a brain learns
//!   to consciously attend, learn, and recognize a changing world.
//! - Raizada & Grossberg (2003). Towards a theory of the laminar
//!   architecture of cerebral cortex.

pub mod circuit;
pub mod error;
pub mod layers;
pub mod optimized;
pub mod params;

// Re-export commonly used types
pub use circuit::{
    CircuitStatistics, CorticalCircuit, DetailedOutput, DEFAULT_ITEM_DURATION, DEFAULT_SEED,
    TICK_DT,
};
pub use error::{CircuitError, Result};
pub use layers::{CorticalLayer, Layer1, Layer23, Layer4, Layer5, Layer6, LayerId};
pub use optimized::CorticalCircuitOptimized;
pub use params::{Layer1Params, Layer23Params, Layer4Params, Layer5Params, Layer6Params};

// Re-export the collaborating crates
pub use gated_learning;
pub use resonance_metrics;
pub use shunting_core;
pub use temporal_chunking;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
