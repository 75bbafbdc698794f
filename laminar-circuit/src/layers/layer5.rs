//! Layer 5: output/category layer.
//!
//! L5 amplifies the integrated L2/3 activation, lets strongly driven
//! units burst, and emits a softly normalized output. A category is
//! declared formed when any output unit clears the category threshold.

use crate::error::Result;
use crate::layers::{LayerCore, LayerId};
use crate::params::Layer5Params;
use shunting_core::ShuntingParams;

pub struct Layer5 {
    params: Layer5Params,
    pub(crate) core: LayerCore,
    category_formed: bool,
}

impl Layer5 {
    pub fn new(size: usize, params: Layer5Params, seed: u64) -> Result<Self> {
        params.validate()?;
        let field = ShuntingParams::new(1000.0 / params.time_constant, 1.0, 0.0)?;
        let core = LayerCore::new(LayerId::L5, size, field, false, seed)?;
        Ok(Self {
            params,
            core,
            category_formed: false,
        })
    }

    /// Layer parameters.
    pub fn params(&self) -> &Layer5Params {
        &self.params
    }

    /// Whether the last processed output cleared the category
    /// threshold on any unit.
    pub fn category_formed(&self) -> bool {
        self.category_formed
    }

    /// Amplify, burst, integrate and emit the normalized output.
    pub fn process_bottom_up(&mut self, input: &[f64], dt: f64) -> Result<Vec<f64>> {
        let amplified: Vec<f64> = input
            .iter()
            .map(|&v| {
                let a = v * self.params.amplification_gain;
                if a > self.params.burst_threshold {
                    a * self.params.burst_amplification
                } else {
                    a
                }
            })
            .collect();

        let activation = self.core.step(&amplified, None, dt, true)?;

        let mut output: Vec<f64> = activation
            .iter()
            .map(|&x| x * self.params.output_gain)
            .collect();
        let max = output.iter().cloned().fold(0.0f64, f64::max);
        if self.params.output_normalization > 0.0 && max > 0.0 {
            let denom = 1.0 + self.params.output_normalization * max;
            for v in output.iter_mut() {
                *v /= denom;
            }
        }
        for v in output.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }

        self.category_formed = output.iter().any(|&v| v > self.params.category_threshold);
        Ok(output)
    }

    pub(crate) fn reset_layer(&mut self) {
        self.core.reset();
        self.category_formed = false;
    }
}

crate::layers::impl_cortical_layer!(Layer5);

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(size: usize) -> Layer5 {
        Layer5::new(size, Layer5Params::default(), 1).unwrap()
    }

    #[test]
    fn test_zero_input_zero_output() {
        let mut l5 = layer(6);
        for _ in 0..50 {
            let out = l5.process_bottom_up(&vec![0.0; 6], 0.001).unwrap();
            assert!(out.iter().all(|&x| x == 0.0));
        }
        assert!(!l5.category_formed());
    }

    #[test]
    fn test_burst_amplifies_strong_units() {
        // One unit above the burst threshold, one just below
        let mut l5 = layer(2);
        let input = vec![0.6, 0.4]; // amplified: 0.9 (bursts), 0.6

        let mut out = Vec::new();
        for _ in 0..2000 {
            out = l5.process_bottom_up(&input, 0.001).unwrap();
        }
        // Bursting more than doubles the drive ratio
        assert!(out[0] > out[1] * 1.5);
    }

    #[test]
    fn test_output_bounded_by_ceiling() {
        let mut l5 = layer(4);
        let mut out = Vec::new();
        for _ in 0..5000 {
            out = l5.process_bottom_up(&vec![10.0; 4], 0.001).unwrap();
        }
        assert!(out.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn test_category_formation() {
        let mut params = Layer5Params::default();
        params.category_threshold = 0.2;
        params.output_normalization = 0.0;
        let mut l5 = Layer5::new(3, params, 1).unwrap();

        assert!(!l5.category_formed());
        for _ in 0..3000 {
            l5.process_bottom_up(&[1.0, 0.0, 0.0], 0.001).unwrap();
        }
        assert!(l5.category_formed());
    }

    #[test]
    fn test_normalization_compresses_output() {
        let mut normalized = layer(2);
        let mut params = Layer5Params::default();
        params.output_normalization = 0.0;
        let mut raw = Layer5::new(2, params, 1).unwrap();

        let input = vec![0.5; 2];
        let mut n_out = Vec::new();
        let mut r_out = Vec::new();
        for _ in 0..1000 {
            n_out = normalized.process_bottom_up(&input, 0.001).unwrap();
            r_out = raw.process_bottom_up(&input, 0.001).unwrap();
        }
        assert!(n_out[0] < r_out[0]);
    }
}
