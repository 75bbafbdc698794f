//! # Shunting Core Library
//!
//! Bounded neural field dynamics for laminar cortical simulation.
//!
//! ## Overview
//!
//! This library provides the two continuous-dynamics primitives that
//! every layer of the cortical circuit is built from:
//!
//! - **Shunting fields**: Grossberg's membrane equation with
//!   multiplicative excitation/inhibition gates, lateral Gaussian
//!   kernels and self-excitation
//! - **Transmitter gates**: habituative modulators that deplete under
//!   signal and recover toward baseline on a ~10x slower time scale
//!
//! ## Quick Start
//!
//! ### Drive a small field and read its equilibrium
//!
//! ```rust
//! use shunting_core::{ShuntingDynamics, ShuntingParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = ShuntingParams::new(1.0, 1.0, 0.0)?;
//! let mut field = ShuntingDynamics::new(5, params)?;
//!
//! field.set_excitatory(&[1.0, 0.0, 0.0, 0.0, 0.0])?;
//! for _ in 0..3000 {
//!     field.update(0.001);
//! }
//!
//! // dx = -x + (1 - x) settles at 0.5
//! assert!((field.activations()[0] - 0.5).abs() < 1e-2);
//! # Ok(())
//! # }
//! ```
//!
//! ### Habituate a transmitter gate
//!
//! ```rust
//! use shunting_core::{TransmitterDynamics, TransmitterParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut gates = TransmitterDynamics::new(3, TransmitterParams::default())?;
//! gates.set_signal(&[1.0, 0.0, 0.0])?;
//!
//! for _ in 0..100 {
//!     gates.update(0.01);
//! }
//!
//! assert!(gates.gate_at(0)? < gates.gate_at(1)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Mathematical Models
//!
//! ### Shunting equation
//!
//! ```text
//! dx_i/dt = -A * x_i + (B - x_i) * E+_i - (x_i - floor) * E-_i
//! ```
//!
//! The multiplicative terms bound the trajectory: excitation saturates
//! at the ceiling `B`, inhibition at the floor. `E+` and `E-` combine
//! external drive, lateral Gaussian kernel contributions and
//! self-excitation.
//!
//! ### Transmitter gate
//!
//! ```text
//! dz_i/dt = alpha * (Z - z_i) - (beta * s_i + gamma * s_i^2) * z_i
//! ```
//!
//! Output gating is multiplicative (`y = z .* x`), producing
//! habituation: sustained signals weaken their own transmission.
//!
//! ## Integration scheme
//!
//! Both equations use explicit forward-Euler with exactly one step per
//! `update` call. The caller is responsible for the stability
//! constraint `dt * (A + E+ + E-) < 1`; under it, the post-step clamp
//! never activates on finite trajectories. An optional convex damping
//! blend (`damping` parameter) suppresses step-to-step oscillation
//! under strong lateral competition.
//!
//! ## References
//!
//! - Grossberg (1973). Contour enhancement, short term memory, and
//!   constancies in reverberating neural networks.
//! - Grossberg (1980). How does a brain build a cognitive code?

pub mod error;
pub mod kernel;
pub mod params;
pub mod shunting;
pub mod transmitter;

// Re-export commonly used types
pub use error::{DynamicsError, Result};
pub use kernel::LateralKernel;
pub use params::{ShuntingParams, TransmitterParams};
pub use shunting::ShuntingDynamics;
pub use transmitter::TransmitterDynamics;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
