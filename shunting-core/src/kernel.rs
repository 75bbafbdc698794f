//! Lateral interaction kernels.
//!
//! Each unit of a shunting field excites nearby units and inhibits a
//! broader neighbourhood. The weights follow a Gaussian falloff of the
//! positional distance, precomputed once at construction so the update
//! loop only walks the offsets.

use serde::{Deserialize, Serialize};

/// Precomputed Gaussian excitation/inhibition profile over unit distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateralKernel {
    /// Excitatory weight at distance d+1, for d in 0..excitatory_range.
    excitatory: Vec<f64>,
    /// Inhibitory weight at distance d+1, for d in 0..inhibitory_range.
    inhibitory: Vec<f64>,
}

/// Gaussian falloff over 1..=range, scaled to `strength` at distance 1.
fn gaussian_profile(range: usize, strength: f64) -> Vec<f64> {
    if range == 0 || strength == 0.0 {
        return Vec::new();
    }
    let sigma = (range as f64 / 2.0).max(0.5);
    (1..=range)
        .map(|d| {
            let x = d as f64;
            strength * (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect()
}

impl LateralKernel {
    /// Build a kernel from separate excitation and inhibition profiles.
    pub fn new(
        excitatory_range: usize,
        excitatory_strength: f64,
        inhibitory_range: usize,
        inhibitory_strength: f64,
    ) -> Self {
        Self {
            excitatory: gaussian_profile(excitatory_range, excitatory_strength),
            inhibitory: gaussian_profile(inhibitory_range, inhibitory_strength),
        }
    }

    /// Mexican-hat profile: narrow on-center excitation, broad
    /// off-surround inhibition.
    pub fn mexican_hat(
        excitation_range: usize,
        excitation_strength: f64,
        inhibition_range: usize,
        inhibition_strength: f64,
    ) -> Self {
        Self::new(
            excitation_range,
            excitation_strength,
            inhibition_range,
            inhibition_strength,
        )
    }

    /// Kernel with no lateral interaction.
    pub fn none() -> Self {
        Self {
            excitatory: Vec::new(),
            inhibitory: Vec::new(),
        }
    }

    /// Whether this kernel contributes anything.
    pub fn is_empty(&self) -> bool {
        self.excitatory.is_empty() && self.inhibitory.is_empty()
    }

    /// Accumulate the lateral drive each unit receives from its
    /// neighbours' rectified activations.
    ///
    /// Returns `(excitation, inhibition)` vectors of the field size.
    pub fn apply(&self, activations: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let n = activations.len();
        let mut excitation = vec![0.0; n];
        let mut inhibition = vec![0.0; n];

        if self.is_empty() {
            return (excitation, inhibition);
        }

        for j in 0..n {
            let source = activations[j].max(0.0);
            if source == 0.0 {
                continue;
            }
            for (d, &w) in self.excitatory.iter().enumerate() {
                let dist = d + 1;
                if j >= dist {
                    excitation[j - dist] += w * source;
                }
                if j + dist < n {
                    excitation[j + dist] += w * source;
                }
            }
            for (d, &w) in self.inhibitory.iter().enumerate() {
                let dist = d + 1;
                if j >= dist {
                    inhibition[j - dist] += w * source;
                }
                if j + dist < n {
                    inhibition[j + dist] += w * source;
                }
            }
        }

        (excitation, inhibition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_kernel() {
        let kernel = LateralKernel::none();
        assert!(kernel.is_empty());

        let (exc, inh) = kernel.apply(&[1.0, 1.0, 1.0]);
        assert_eq!(exc, vec![0.0; 3]);
        assert_eq!(inh, vec![0.0; 3]);
    }

    #[test]
    fn test_profile_monotone_decrease() {
        let profile = gaussian_profile(4, 1.0);
        assert_eq!(profile.len(), 4);
        for pair in profile.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_single_source_spreads_symmetrically() {
        let kernel = LateralKernel::new(2, 0.5, 0, 0.0);
        let mut field = vec![0.0; 5];
        field[2] = 1.0;

        let (exc, _) = kernel.apply(&field);
        assert_relative_eq!(exc[1], exc[3], epsilon = 1e-12);
        assert_relative_eq!(exc[0], exc[4], epsilon = 1e-12);
        assert!(exc[1] > exc[0]);
        // No self-contribution through the kernel
        assert_eq!(exc[2], 0.0);
    }

    #[test]
    fn test_negative_activation_does_not_propagate() {
        let kernel = LateralKernel::new(1, 1.0, 1, 1.0);
        let (exc, inh) = kernel.apply(&[-0.5, 0.0, -0.5]);
        assert_eq!(exc, vec![0.0; 3]);
        assert_eq!(inh, vec![0.0; 3]);
    }

    #[test]
    fn test_mexican_hat_shape() {
        let kernel = LateralKernel::mexican_hat(1, 1.0, 3, 0.4);
        let mut field = vec![0.0; 7];
        field[3] = 1.0;

        let (exc, inh) = kernel.apply(&field);
        // Excitation confined to immediate neighbours
        assert!(exc[2] > 0.0 && exc[4] > 0.0);
        assert_eq!(exc[1], 0.0);
        // Inhibition reaches further out
        assert!(inh[0] > 0.0 && inh[6] > 0.0);
    }
}
