//! Resonance detection and the consciousness-likelihood signal.
//!
//! Resonance is sustained agreement between bottom-up drive and
//! top-down expectation. The detector folds three observables into a
//! scalar likelihood: cross-layer phase coherence, the expectation
//! match score and output amplitude. The ART resonance flag asserts
//! when the match component alone clears the vigilance threshold.

use crate::error::{AnalysisError, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Fixed mixing weights of the likelihood function. Keeping them
/// constant makes the likelihood monotone in each component.
const MATCH_WEIGHT: f64 = 0.5;
const COHERENCE_WEIGHT: f64 = 0.3;
const AMPLITUDE_WEIGHT: f64 = 0.2;

/// Snapshot of the circuit's resonance condition at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceState {
    /// Scalar consciousness likelihood in [0, 1].
    pub consciousness_likelihood: f64,
    /// Whether the expectation match cleared the vigilance threshold.
    pub art_resonance: bool,
    /// Simulation time of the evaluation (s).
    pub timestamp: f64,
}

/// Phase coherence across signals: `R = |1/N * sum_j exp(i*theta_j)|`.
///
/// Returns a value in [0, 1]; 1 means all phases aligned.
pub fn phase_coherence(phases: &[f64]) -> f64 {
    if phases.is_empty() {
        return 0.0;
    }
    let n = phases.len() as f64;
    let sum: Complex64 = phases
        .iter()
        .map(|&theta| Complex64::new(0.0, theta).exp())
        .sum();
    (sum / n).norm()
}

/// Normalized overlap of two non-negative patterns; 1.0 when the
/// rectified directions coincide, 0.0 when they are disjoint.
pub fn pattern_match(expected: &[f64], actual: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (&e, &a) in expected.iter().zip(actual) {
        let e = e.max(0.0);
        let a = a.max(0.0);
        dot += e * a;
        norm_a += e * e;
        norm_b += a * a;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Circuit-level resonance detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResonanceDetector {
    vigilance: f64,
    sample_rate: f64,
    history_size: usize,
}

impl ResonanceDetector {
    /// Create a detector with the given vigilance threshold. The
    /// sample rate and history size configure the per-layer trackers
    /// the owning circuit attaches.
    pub fn new(vigilance: f64, sample_rate: f64, history_size: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&vigilance) {
            return Err(AnalysisError::InvalidParameter {
                parameter: "vigilance".to_string(),
                value: vigilance,
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::InvalidParameter {
                parameter: "sample_rate".to_string(),
                value: sample_rate,
                reason: "must be positive and finite".to_string(),
            });
        }
        Ok(Self {
            vigilance,
            sample_rate,
            history_size,
        })
    }

    /// Vigilance threshold.
    pub fn vigilance(&self) -> f64 {
        self.vigilance
    }

    /// Sample rate for layer trackers (Hz).
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// History window for layer trackers.
    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Fold the three observables into a resonance state.
    ///
    /// Inputs are clamped to [0, 1]; the likelihood is a fixed convex
    /// combination and is therefore monotone non-decreasing in the
    /// match component.
    pub fn evaluate(
        &self,
        coherence: f64,
        match_score: f64,
        amplitude: f64,
        timestamp: f64,
    ) -> ResonanceState {
        let coherence = coherence.clamp(0.0, 1.0);
        let match_score = match_score.clamp(0.0, 1.0);
        let amplitude = amplitude.clamp(0.0, 1.0);

        let likelihood = (MATCH_WEIGHT * match_score
            + COHERENCE_WEIGHT * coherence
            + AMPLITUDE_WEIGHT * amplitude)
            .clamp(0.0, 1.0);

        ResonanceState {
            consciousness_likelihood: likelihood,
            art_resonance: match_score >= self.vigilance,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_phase_coherence_aligned() {
        let phases = vec![0.3; 8];
        assert_relative_eq!(phase_coherence(&phases), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phase_coherence_uniform_spread() {
        let phases: Vec<f64> = (0..10).map(|i| 2.0 * PI * i as f64 / 10.0).collect();
        assert!(phase_coherence(&phases) < 0.1);
    }

    #[test]
    fn test_phase_coherence_empty() {
        assert_eq!(phase_coherence(&[]), 0.0);
    }

    #[test]
    fn test_pattern_match_identical() {
        let p = vec![0.2, 0.8, 0.0, 0.5];
        assert_relative_eq!(pattern_match(&p, &p), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pattern_match_disjoint() {
        assert_eq!(pattern_match(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_pattern_match_zero_vector() {
        assert_eq!(pattern_match(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_detector_vigilance_bounds() {
        assert!(ResonanceDetector::new(1.5, 1000.0, 128).is_err());
        assert!(ResonanceDetector::new(-0.1, 1000.0, 128).is_err());
        assert!(ResonanceDetector::new(0.7, 0.0, 128).is_err());
    }

    #[test]
    fn test_art_flag_follows_vigilance() {
        let detector = ResonanceDetector::new(0.7, 1000.0, 128).unwrap();

        let below = detector.evaluate(1.0, 0.6, 1.0, 0.0);
        assert!(!below.art_resonance);

        let above = detector.evaluate(0.0, 0.8, 0.0, 0.0);
        assert!(above.art_resonance);
    }

    #[test]
    fn test_likelihood_monotone_in_match() {
        let detector = ResonanceDetector::new(0.7, 1000.0, 128).unwrap();
        let mut prev = -1.0;
        for step in 0..=10 {
            let m = step as f64 / 10.0;
            let state = detector.evaluate(0.5, m, 0.5, 0.0);
            assert!(state.consciousness_likelihood >= prev);
            prev = state.consciousness_likelihood;
        }
    }

    #[test]
    fn test_likelihood_bounded() {
        let detector = ResonanceDetector::new(0.7, 1000.0, 128).unwrap();
        let state = detector.evaluate(5.0, 5.0, 5.0, 0.0);
        assert_relative_eq!(state.consciousness_likelihood, 1.0);

        let zero = detector.evaluate(-1.0, -1.0, -1.0, 0.0);
        assert_eq!(zero.consciousness_likelihood, 0.0);
    }
}
