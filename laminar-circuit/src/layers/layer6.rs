//! Layer 6: modulatory feedback layer.
//!
//! L6 carries the top-down expectation and implements the ART matching
//! rule: expectation alone can never drive the layer. Every output
//! unit is hard-gated by its own bottom-up support, so with zero
//! bottom-up the output is exactly zero no matter what expectation is
//! installed. Where support and expectation coincide the unit is
//! enhanced (on-center); units adjacent to expected ones are
//! suppressed (off-surround).

use crate::error::Result;
use crate::layers::{LayerCore, LayerId};
use crate::params::Layer6Params;
use shunting_core::ShuntingParams;

pub struct Layer6 {
    params: Layer6Params,
    pub(crate) core: LayerCore,
    expectation: Option<Vec<f64>>,
    last_output: Vec<f64>,
}

impl Layer6 {
    pub fn new(size: usize, params: Layer6Params, seed: u64) -> Result<Self> {
        params.validate()?;
        let field =
            ShuntingParams::new(1000.0 / params.time_constant, params.ceiling, 0.0)?;
        let core = LayerCore::new(LayerId::L6, size, field, false, seed)?;
        Ok(Self {
            params,
            core,
            expectation: None,
            last_output: vec![0.0; size],
        })
    }

    /// Layer parameters.
    pub fn params(&self) -> &Layer6Params {
        &self.params
    }

    /// Install a top-down expectation pattern (defensively copied).
    pub fn set_top_down_expectation(&mut self, pattern: &[f64]) -> Result<()> {
        if pattern.len() != self.core.size() {
            return Err(shunting_core::DynamicsError::SizeMismatch {
                expected: self.core.size(),
                actual: pattern.len(),
            }
            .into());
        }
        self.expectation = Some(pattern.to_vec());
        Ok(())
    }

    /// Remove the installed expectation.
    pub fn clear_expectation(&mut self) {
        self.expectation = None;
    }

    /// The installed expectation, if any (defensive copy).
    pub fn expectation(&self) -> Option<Vec<f64>> {
        self.expectation.clone()
    }

    /// Process the bottom-up signal under the matching rule and return
    /// the modulatory output.
    pub fn process_bottom_up(&mut self, bottom_up: &[f64], dt: f64) -> Result<Vec<f64>> {
        if bottom_up.len() != self.core.size() {
            return Err(shunting_core::DynamicsError::SizeMismatch {
                expected: self.core.size(),
                actual: bottom_up.len(),
            }
            .into());
        }

        let n = self.core.size();
        let threshold = self.params.modulation_threshold;
        let mut excitatory = vec![0.0; n];
        let mut inhibitory = vec![0.0; n];

        for i in 0..n {
            let supported = bottom_up[i] > threshold;
            if supported {
                let center = match &self.expectation {
                    Some(exp) => {
                        1.0 + self.params.on_center_weight
                            * self.params.attentional_gain
                            * exp[i].max(0.0)
                    }
                    None => 1.0,
                };
                excitatory[i] = bottom_up[i] * center;
            }
            if let Some(exp) = &self.expectation {
                // Off-surround: expected units suppress their neighbours
                let mut surround = 0.0;
                if i > 0 {
                    surround += exp[i - 1].max(0.0);
                }
                if i + 1 < n {
                    surround += exp[i + 1].max(0.0);
                }
                inhibitory[i] = self.params.off_surround_strength * surround;
            }
        }

        let activation = self.core.step(&excitatory, Some(&inhibitory), dt, true)?;

        // ART matching rule: no output without bottom-up support
        let output: Vec<f64> = activation
            .iter()
            .zip(bottom_up)
            .map(|(&x, &bu)| {
                if bu > threshold {
                    x.clamp(0.0, self.params.ceiling)
                } else {
                    0.0
                }
            })
            .collect();

        self.last_output = output.clone();
        Ok(output)
    }

    /// Attentional feedback returned to L4: the last output scaled by
    /// the attentional gain.
    pub fn generate_feedback_to_l4(&self, output: &[f64]) -> Vec<f64> {
        output
            .iter()
            .map(|&v| (v * self.params.attentional_gain).clamp(0.0, self.params.ceiling))
            .collect()
    }

    /// The most recent modulatory output (defensive copy).
    pub fn last_output(&self) -> Vec<f64> {
        self.last_output.clone()
    }

    pub(crate) fn reset_layer(&mut self) {
        self.core.reset();
        self.expectation = None;
        self.last_output = vec![0.0; self.core.size()];
    }
}

crate::layers::impl_cortical_layer!(Layer6);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::CorticalLayer;

    fn layer(size: usize) -> Layer6 {
        Layer6::new(size, Layer6Params::default(), 1).unwrap()
    }

    #[test]
    fn test_expectation_alone_never_fires() {
        let mut l6 = layer(10);
        let mut expectation = vec![0.0; 10];
        expectation[0] = 1.0;
        expectation[1] = 1.0;
        expectation[2] = 1.0;
        l6.set_top_down_expectation(&expectation).unwrap();

        for _ in 0..1000 {
            let out = l6.process_bottom_up(&vec![0.0; 10], 0.001).unwrap();
            assert!(out.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_on_center_enhancement() {
        let mut expected = layer(4);
        let mut plain = layer(4);
        expected
            .set_top_down_expectation(&[1.0, 0.0, 0.0, 0.0])
            .unwrap();

        let bu = vec![0.5, 0.0, 0.0, 0.0];
        let mut with_exp = Vec::new();
        let mut without_exp = Vec::new();
        for _ in 0..1000 {
            with_exp = expected.process_bottom_up(&bu, 0.001).unwrap();
            without_exp = plain.process_bottom_up(&bu, 0.001).unwrap();
        }
        assert!(with_exp[0] > without_exp[0]);
    }

    #[test]
    fn test_off_surround_suppression() {
        let mut expected = layer(5);
        let mut plain = layer(5);
        // Expect unit 2; units 1 and 3 are its surround
        expected
            .set_top_down_expectation(&[0.0, 0.0, 1.0, 0.0, 0.0])
            .unwrap();

        let bu = vec![0.5; 5];
        let mut with_exp = Vec::new();
        let mut without_exp = Vec::new();
        for _ in 0..1000 {
            with_exp = expected.process_bottom_up(&bu, 0.001).unwrap();
            without_exp = plain.process_bottom_up(&bu, 0.001).unwrap();
        }
        assert!(with_exp[1] < without_exp[1]);
        assert!(with_exp[3] < without_exp[3]);
        assert!(with_exp[2] > with_exp[1]);
    }

    #[test]
    fn test_support_gate_is_per_unit() {
        let mut l6 = layer(4);
        l6.set_top_down_expectation(&[1.0, 1.0, 1.0, 1.0]).unwrap();

        let bu = vec![0.5, 0.0, 0.5, 0.0];
        let mut out = Vec::new();
        for _ in 0..500 {
            out = l6.process_bottom_up(&bu, 0.001).unwrap();
        }
        assert!(out[0] > 0.0);
        assert_eq!(out[1], 0.0);
        assert!(out[2] > 0.0);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_feedback_scaled_by_attentional_gain() {
        let l6 = layer(3);
        let feedback = l6.generate_feedback_to_l4(&[0.4, 0.0, 0.8]);
        let gain = l6.params().attentional_gain;
        assert!((feedback[0] - 0.4 * gain).abs() < 1e-12);
        assert_eq!(feedback[1], 0.0);
    }

    #[test]
    fn test_reset_clears_expectation() {
        let mut l6 = layer(3);
        l6.set_top_down_expectation(&[1.0, 1.0, 1.0]).unwrap();
        l6.reset();
        assert!(l6.expectation().is_none());
        assert!(l6.last_output().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_expectation_size_mismatch() {
        let mut l6 = layer(4);
        assert!(l6.set_top_down_expectation(&[1.0, 1.0]).is_err());
    }
}
