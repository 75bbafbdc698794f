//! # Temporal Chunking Library
//!
//! Multi-scale temporal sequence encoding for laminar cortical
//! simulation: a primacy-gradient working memory feeds a competitive
//! masking field that groups item nodes into list chunks.
//!
//! ## Overview
//!
//! - **Working memory** (STORE-2): stores an ordered sequence of input
//!   patterns with position-dependent initial activations, so earlier
//!   items are encoded more strongly. Shunting dynamics with lateral
//!   inhibition evolve the activations while habituative transmitter
//!   gates deplete under storage; readout weights each pattern by its
//!   gated activation.
//! - **Masking field**: recruits item nodes through fuzzy prototype
//!   matching, runs Mexican-hat competition over their activations and
//!   commits coherent winner sets as immutable list chunks.
//! - **Temporal processor**: the thin pipeline wiring one into the
//!   other, with a batch API for whole sequences.
//!
//! ## Quick Start
//!
//! ```rust
//! use temporal_chunking::{
//!     MaskingFieldConfig, TemporalProcessor, WorkingMemoryConfig,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut processor = TemporalProcessor::new(
//!     WorkingMemoryConfig::new(5, 10)?,
//!     MaskingFieldConfig::default(),
//!     0.05,
//! )?;
//!
//! // Feed a short sequence of one-hot patterns
//! for i in 0..5 {
//!     let mut pattern = vec![0.0; 10];
//!     pattern[i] = 1.0;
//!     let result = processor.process(&pattern)?;
//!     assert_eq!(result.combined_pattern.len(), 10);
//! }
//!
//! // Earlier items are encoded more strongly
//! assert!(processor.memory().primacy_gradient_strength() > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Serial order by primacy gradient
//!
//! The position-dependent initial activation
//!
//! ```text
//! a_init(p) = max(retrieval_floor, A_max * exp(-lambda(p) * p))
//! lambda(p) = primacy_decay * (1 + 0.1 * p)
//! ```
//!
//! is monotonically non-increasing over positions, so the stored
//! activation profile itself encodes serial order. The gradient
//! strength measure is the normalized difference between early-half
//! and late-half gated activations.
//!
//! ## Chunk formation
//!
//! A winner set commits as a chunk when it is large enough (the floor
//! saturates at the live node count), its positions are coherent under
//! the installed [`CoherencePolicy`], and the inter-chunk interval has
//! elapsed. Committed chunks are immutable; they decay exponentially
//! and the most recent chunk receives a reactivation drive.
//!
//! ## References
//!
//! - Grossberg (1978). A theory of human memory: self-organization and
//!   performance of sensory-motor codes, maps, and plans.
//! - Cohen & Grossberg (1987). Masking fields: a massively parallel
//!   neural architecture for learning, recognizing, and predicting
//!   multiple groupings of patterned data.

pub mod coherence;
pub mod config;
pub mod error;
pub mod masking_field;
pub mod temporal_processor;
pub mod working_memory;

// Re-export commonly used types
pub use coherence::{CoherencePolicy, PositionalGapPolicy};
pub use config::{MaskingFieldConfig, WorkingMemoryConfig};
pub use error::{Result, TemporalError};
pub use masking_field::{
    ItemNode, ListChunk, MaskingField, MaskingFieldState, MaskingFieldStats,
};
pub use temporal_processor::{TemporalProcessor, TemporalResult};
pub use working_memory::{
    MemoryItem, StoreOutcome, WorkingMemory, WorkingMemorySnapshot, WorkingMemoryStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
