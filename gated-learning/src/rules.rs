//! Plasticity rules.
//!
//! Rules are a tagged variant sharing one capability:
//! `update(pre, post, weights, rate)`. The resonance-gated wrapper
//! turns any rule into a no-op below its consciousness threshold.

use crate::error::{LearningError, Result};
use crate::weights::WeightMatrix;
use serde::{Deserialize, Serialize};

/// A synaptic learning rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LearningRule {
    /// Bounded Hebbian: `dw_ij = rate * post_i * pre_j - decay * w_ij`.
    Hebbian { decay: f64 },

    /// Instar: `dw_ij = rate * post_i * (pre_j - w_ij)`. Each active
    /// row converges toward the input pattern.
    Instar,

    /// Outstar: `dw_ij = rate * pre_i * (post_j - w_ij)`. Each active
    /// source's fan-out converges toward the output pattern.
    Outstar,

    /// Instar followed by outstar over the same tick.
    Bidirectional,

    /// Wrap any rule so updates are suppressed below a consciousness
    /// threshold.
    ResonanceGated {
        inner: Box<LearningRule>,
        threshold: f64,
    },
}

impl LearningRule {
    /// Hebbian rule with the conventional weight decay.
    pub fn hebbian() -> Self {
        LearningRule::Hebbian { decay: 0.001 }
    }

    /// Wrap this rule with a resonance gate.
    pub fn resonance_gated(self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LearningError::InvalidParameter {
                parameter: "threshold".to_string(),
                value: threshold,
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        Ok(LearningRule::ResonanceGated {
            inner: Box::new(self),
            threshold,
        })
    }

    /// Apply the rule once.
    ///
    /// Returns `true` if the weights were updated, `false` if a
    /// resonance gate suppressed the step. `consciousness` is the
    /// current likelihood when a detector is attached; gated wrappers
    /// treat `None` as fully conscious.
    pub fn update(
        &self,
        pre: &[f64],
        post: &[f64],
        weights: &mut WeightMatrix,
        rate: f64,
        consciousness: Option<f64>,
    ) -> Result<bool> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(LearningError::InvalidParameter {
                parameter: "rate".to_string(),
                value: rate,
                reason: "must lie in [0, 1]".to_string(),
            });
        }

        match self {
            LearningRule::Hebbian { decay } => {
                check_post_pre(weights, post, pre)?;
                weights.update_entries(|i, j, w| w + rate * post[i] * pre[j] - decay * w);
                Ok(true)
            }
            LearningRule::Instar => {
                check_post_pre(weights, post, pre)?;
                weights.update_entries(|i, j, w| w + rate * post[i] * (pre[j] - w));
                Ok(true)
            }
            LearningRule::Outstar => {
                check_pre_post(weights, pre, post)?;
                weights.update_entries(|i, j, w| w + rate * pre[i] * (post[j] - w));
                Ok(true)
            }
            LearningRule::Bidirectional => {
                check_post_pre(weights, post, pre)?;
                check_pre_post(weights, pre, post)?;
                weights.update_entries(|i, j, w| w + rate * post[i] * (pre[j] - w));
                weights.update_entries(|i, j, w| w + rate * pre[i] * (post[j] - w));
                Ok(true)
            }
            LearningRule::ResonanceGated { inner, threshold } => {
                if consciousness.unwrap_or(1.0) < *threshold {
                    return Ok(false);
                }
                inner.update(pre, post, weights, rate, consciousness)
            }
        }
    }
}

fn check_post_pre(weights: &WeightMatrix, post: &[f64], pre: &[f64]) -> Result<()> {
    if weights.rows() != post.len() || weights.cols() != pre.len() {
        return Err(LearningError::ShapeMismatch {
            rows: weights.rows(),
            cols: weights.cols(),
            post: post.len(),
            pre: pre.len(),
        });
    }
    Ok(())
}

fn check_pre_post(weights: &WeightMatrix, pre: &[f64], post: &[f64]) -> Result<()> {
    if weights.rows() != pre.len() || weights.cols() != post.len() {
        return Err(LearningError::ShapeMismatch {
            rows: weights.rows(),
            cols: weights.cols(),
            post: post.len(),
            pre: pre.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(n: usize) -> WeightMatrix {
        WeightMatrix::new(n, n, 0.0, 1.0).unwrap()
    }

    #[test]
    fn test_hebbian_strengthens_coactive_pairs() {
        let mut w = square(2);
        let rule = LearningRule::hebbian();

        rule.update(&[1.0, 0.0], &[1.0, 0.0], &mut w, 0.5, None)
            .unwrap();
        assert!(w.get(0, 0).unwrap() > 0.0);
        assert_eq!(w.get(0, 1).unwrap(), 0.0);
        assert_eq!(w.get(1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_hebbian_decay_erodes_weights() {
        let mut w = square(2);
        w.set(0, 0, 0.8).unwrap();
        let rule = LearningRule::Hebbian { decay: 0.1 };

        rule.update(&[0.0, 0.0], &[0.0, 0.0], &mut w, 0.5, None)
            .unwrap();
        assert_relative_eq!(w.get(0, 0).unwrap(), 0.72, epsilon = 1e-12);
    }

    #[test]
    fn test_hebbian_respects_bounds() {
        let mut w = square(1);
        let rule = LearningRule::Hebbian { decay: 0.0 };
        for _ in 0..1000 {
            rule.update(&[1.0], &[1.0], &mut w, 1.0, None).unwrap();
        }
        assert_eq!(w.get(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_instar_converges_to_input() {
        let mut w = square(3);
        let pre = [0.8, 0.2, 0.0];
        let post = [1.0, 0.0, 0.0];
        let rule = LearningRule::Instar;

        for _ in 0..400 {
            rule.update(&pre, &post, &mut w, 0.05, None).unwrap();
        }

        // The active category's row matches the input pattern
        let row = w.row(0).unwrap();
        assert_relative_eq!(row[0], 0.8, epsilon = 1e-3);
        assert_relative_eq!(row[1], 0.2, epsilon = 1e-3);
        assert_relative_eq!(row[2], 0.0, epsilon = 1e-3);
        // Inactive rows stay untouched
        assert_eq!(w.row(1).unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_outstar_converges_to_output() {
        let mut w = square(3);
        let pre = [1.0, 0.0, 0.0];
        let post = [0.1, 0.6, 0.3];
        let rule = LearningRule::Outstar;

        for _ in 0..400 {
            rule.update(&pre, &post, &mut w, 0.05, None).unwrap();
        }

        // The active source's fan-out matches the output pattern
        let row = w.row(0).unwrap();
        assert_relative_eq!(row[0], 0.1, epsilon = 1e-3);
        assert_relative_eq!(row[1], 0.6, epsilon = 1e-3);
        assert_relative_eq!(row[2], 0.3, epsilon = 1e-3);
    }

    #[test]
    fn test_bidirectional_applies_both_phases() {
        let mut w = square(2);
        let rule = LearningRule::Bidirectional;
        rule.update(&[1.0, 0.0], &[0.0, 1.0], &mut w, 0.5, None)
            .unwrap();

        // Instar writes (post=1, pre=0) at (1, 0); outstar then pulls
        // (pre=1) fan-out toward post at (0, 1)
        assert!(w.get(1, 0).unwrap() > 0.0);
        assert!(w.get(0, 1).unwrap() > 0.0);
    }

    #[test]
    fn test_resonance_gate_suppresses_update() {
        let mut w = square(1);
        let rule = LearningRule::hebbian().resonance_gated(0.7).unwrap();

        let applied = rule
            .update(&[1.0], &[1.0], &mut w, 0.5, Some(0.3))
            .unwrap();
        assert!(!applied);
        assert_eq!(w.get(0, 0).unwrap(), 0.0);

        let applied = rule
            .update(&[1.0], &[1.0], &mut w, 0.5, Some(0.9))
            .unwrap();
        assert!(applied);
        assert!(w.get(0, 0).unwrap() > 0.0);
    }

    #[test]
    fn test_resonance_gate_defaults_open_without_detector() {
        let mut w = square(1);
        let rule = LearningRule::hebbian().resonance_gated(0.7).unwrap();
        let applied = rule.update(&[1.0], &[1.0], &mut w, 0.5, None).unwrap();
        assert!(applied);
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let mut w = square(1);
        let rule = LearningRule::hebbian();
        assert!(rule.update(&[1.0], &[1.0], &mut w, 1.5, None).is_err());
        assert!(rule.update(&[1.0], &[1.0], &mut w, -0.1, None).is_err());
        // State unchanged on rejection
        assert_eq!(w.get(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut w = WeightMatrix::new(2, 3, 0.0, 1.0).unwrap();
        let rule = LearningRule::Instar;
        assert!(rule
            .update(&[1.0, 0.0], &[1.0, 0.0], &mut w, 0.1, None)
            .is_err());
    }

    #[test]
    fn test_invalid_gate_threshold() {
        assert!(LearningRule::hebbian().resonance_gated(1.5).is_err());
    }

    #[test]
    fn test_zero_rate_is_identity_for_instar() {
        let mut w = square(2);
        w.set(0, 0, 0.4).unwrap();
        let before = w.snapshot();
        LearningRule::Instar
            .update(&[1.0, 1.0], &[1.0, 1.0], &mut w, 0.0, None)
            .unwrap();
        assert_eq!(w.snapshot(), before);
    }
}
