//! Layer 1: slow priming/context layer.
//!
//! L1 integrates top-down context on the slowest time scale of the
//! circuit and emits a modulatory priming signal for L2/3.

use crate::error::Result;
use crate::layers::{split_drive, LayerCore, LayerId};
use crate::params::Layer1Params;
use shunting_core::ShuntingParams;

pub struct Layer1 {
    params: Layer1Params,
    pub(crate) core: LayerCore,
}

impl Layer1 {
    pub fn new(size: usize, params: Layer1Params, seed: u64) -> Result<Self> {
        params.validate()?;
        let field = ShuntingParams::new(1000.0 / params.time_constant, 1.0, 0.0)?;
        let core = LayerCore::new(LayerId::L1, size, field, false, seed)?;
        Ok(Self { params, core })
    }

    /// Layer parameters.
    pub fn params(&self) -> &Layer1Params {
        &self.params
    }

    /// Integrate top-down context for one step and return the priming
    /// signal (activation scaled by `priming_strength`).
    pub fn process_top_down(&mut self, context: &[f64], dt: f64) -> Result<Vec<f64>> {
        let (excitatory, inhibitory) = split_drive(context);
        let activation = self.core.step(&excitatory, Some(&inhibitory), dt, true)?;
        Ok(activation
            .iter()
            .map(|&x| x * self.params.priming_strength)
            .collect())
    }

    pub(crate) fn reset_layer(&mut self) {
        self.core.reset();
    }
}

crate::layers::impl_cortical_layer!(Layer1);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::CorticalLayer;

    #[test]
    fn test_priming_scaled_by_strength() {
        let mut full = Layer1::new(4, Layer1Params::new(500.0, 1.0).unwrap(), 1).unwrap();
        let mut half = Layer1::new(4, Layer1Params::new(500.0, 0.5).unwrap(), 1).unwrap();

        let context = vec![1.0; 4];
        let mut full_out = Vec::new();
        let mut half_out = Vec::new();
        for _ in 0..500 {
            full_out = full.process_top_down(&context, 0.001).unwrap();
            half_out = half.process_top_down(&context, 0.001).unwrap();
        }

        assert!(full_out[0] > 0.0);
        assert!((half_out[0] - full_out[0] * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_slow_integration() {
        // L1 (tau 500 ms) accumulates far slower than a fast layer would
        let mut l1 = Layer1::new(2, Layer1Params::default(), 1).unwrap();
        l1.process_top_down(&[1.0, 1.0], 0.001).unwrap();
        let early = l1.activation();
        assert!(early[0] < 0.01);

        for _ in 0..3000 {
            l1.process_top_down(&[1.0, 1.0], 0.001).unwrap();
        }
        assert!(l1.activation()[0] > 0.2);
    }

    #[test]
    fn test_zero_context_zero_priming() {
        let mut l1 = Layer1::new(3, Layer1Params::default(), 1).unwrap();
        let out = l1.process_top_down(&[0.0, 0.0, 0.0], 0.001).unwrap();
        assert!(out.iter().all(|&x| x == 0.0));
    }
}
