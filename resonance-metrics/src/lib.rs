//! # Resonance Metrics Library
//!
//! Oscillation analysis and resonance detection for laminar cortical
//! circuits.
//!
//! ## Overview
//!
//! - **Oscillation analysis**: per-signal rolling buffers with
//!   Hann-windowed FFT estimation of the dominant frequency, phase and
//!   amplitude, plus gamma-band (30-80 Hz) classification
//! - **Resonance detection**: cross-layer phase coherence (Kuramoto
//!   order parameter), expectation/drive pattern matching, and a
//!   consciousness-likelihood scalar that gates plasticity upstream
//!
//! ## Quick Start
//!
//! ```rust
//! use resonance_metrics::{OscillationAnalyzer, ResonanceDetector};
//! use std::f64::consts::PI;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Track a 40 Hz rhythm sampled at 1 kHz
//! let mut analyzer = OscillationAnalyzer::new(1000.0, 256)?;
//! for k in 0..256 {
//!     let t = k as f64 / 1000.0;
//!     analyzer.push((2.0 * PI * 40.0 * t).sin());
//! }
//! let metrics = analyzer.metrics()?;
//! assert!(metrics.is_gamma);
//!
//! // Fold observables into a resonance state
//! let detector = ResonanceDetector::new(0.7, 1000.0, 256)?;
//! let state = detector.evaluate(0.9, 0.8, 0.4, 0.256);
//! assert!(state.art_resonance);
//! # Ok(())
//! # }
//! ```
//!
//! ## Consciousness likelihood
//!
//! ```text
//! L = clamp(0.5 * match + 0.3 * coherence + 0.2 * amplitude, 0, 1)
//! ```
//!
//! The mixing weights are fixed constants, so `L` is monotone
//! non-decreasing in the match component; the ART resonance flag
//! asserts when `match >= vigilance` regardless of the other terms.
//!
//! ## References
//!
//! - Grossberg (1999). The link between brain learning, attention, and
//!   consciousness.
//! - Kuramoto (1984). Chemical Oscillations, Waves, and Turbulence.

pub mod error;
pub mod oscillation;
pub mod resonance;

// Re-export commonly used types
pub use error::{AnalysisError, Result};
pub use oscillation::{OscillationAnalyzer, OscillationMetrics};
pub use resonance::{pattern_match, phase_coherence, ResonanceDetector, ResonanceState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::f64::consts::PI;

    /// Two in-phase gamma signals and one drifting signal: coherence
    /// stays high and the detector reports resonance when the match
    /// component agrees.
    #[test]
    fn test_layer_phase_pipeline() {
        let mut analyzers: Vec<OscillationAnalyzer> = (0..3)
            .map(|_| OscillationAnalyzer::new(1000.0, 256).unwrap())
            .collect();

        for k in 0..256 {
            let t = k as f64 / 1000.0;
            analyzers[0].push((2.0 * PI * 40.0 * t).sin());
            analyzers[1].push((2.0 * PI * 40.0 * t).sin());
            analyzers[2].push((2.0 * PI * 40.0 * t + 0.2).sin());
        }

        let phases: Vec<f64> = analyzers
            .iter_mut()
            .map(|a| a.metrics().unwrap().phase)
            .collect();
        let coherence = phase_coherence(&phases);
        assert!(coherence > 0.9, "got {coherence}");

        let detector = ResonanceDetector::new(0.7, 1000.0, 256).unwrap();
        let state = detector.evaluate(coherence, 0.95, 0.5, 0.256);
        assert!(state.art_resonance);
        assert!(state.consciousness_likelihood > 0.7);
    }
}
