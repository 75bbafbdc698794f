//! # Gated Learning Library
//!
//! Online synaptic plasticity for laminar cortical circuits, gated by
//! consciousness (resonance) and attention signals.
//!
//! ## Overview
//!
//! - **Weight matrices**: rectangular tables with a frozen shape and
//!   hard `[w_min, w_max]` bounds enforced on every write; seedable
//!   random initialization for deterministic experiments
//! - **Rules**: bounded Hebbian, instar, outstar, bidirectional, and a
//!   resonance-gated wrapper that turns any rule into a no-op below a
//!   consciousness threshold
//! - **Controller**: per-layer base rates, tick-level attention and
//!   resonance gates, and counters for every attempted, applied and
//!   gated update
//!
//! ## Quick Start
//!
//! ```rust
//! use gated_learning::{
//!     GateDecision, LearningContext, LearningController, LearningRule, WeightMatrix,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = LearningController::new(LearningRule::hebbian(), 0.01)?;
//! let mut weights = WeightMatrix::new(4, 4, 0.0, 1.0)?;
//!
//! let pre = vec![1.0, 0.0, 0.0, 0.0];
//! let post = vec![0.0, 1.0, 0.0, 0.0];
//! let ctx = LearningContext::new(&pre, &post, None, 1.0, 0.0)?;
//!
//! let decision = controller.begin_tick(&ctx);
//! assert_eq!(decision, GateDecision::Learn);
//! controller.step_layer("L23", decision, &ctx, &mut weights)?;
//!
//! assert!(weights.get(1, 0)? > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Gating model
//!
//! Plasticity proceeds on a tick iff
//!
//! ```text
//! attention >= attention_threshold
//! AND (no resonance detector OR consciousness >= resonance_threshold)
//! ```
//!
//! and the effective per-layer rate is
//!
//! ```text
//! rate = base_rate_layer * consciousness * attention
//! ```
//!
//! with each modulatory factor defaulting to 1 when unavailable. A
//! zero effective rate leaves the weight matrices bitwise untouched.
//!
//! ## Rules
//!
//! ```text
//! Hebbian:  dw_ij = rate * post_i * pre_j - decay * w_ij
//! Instar:   dw_ij = rate * post_i * (pre_j - w_ij)
//! Outstar:  dw_ij = rate * pre_i  * (post_j - w_ij)
//! ```
//!
//! All deltas clamp into `[w_min, w_max]`.
//!
//! ## References
//!
//! - Grossberg (1976). Adaptive pattern classification and universal
//!   recoding: parallel development and coding of neural feature
//!   detectors.
//! - Carpenter & Grossberg (1987). A massively parallel architecture
//!   for a self-organizing neural pattern recognition machine.

pub mod context;
pub mod controller;
pub mod error;
pub mod rules;
pub mod weights;

// Re-export commonly used types
pub use context::LearningContext;
pub use controller::{
    GateDecision, LayerLearningStats, LayerUpdateSummary, LearningController,
    LearningStatistics,
};
pub use error::{LearningError, Result};
pub use rules::LearningRule;
pub use weights::WeightMatrix;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
