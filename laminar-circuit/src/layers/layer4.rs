//! Layer 4: fast driving-input layer.
//!
//! L4 relays external drive into the circuit on the fastest time
//! scale, with strong self-excitation and a habituative transmitter
//! gate on its output. The fast membrane keeps the layer's rhythm
//! locked to its drive: under pure sinusoidal input the dominant
//! spectral peak of the activation tracks the drive frequency.

use crate::error::Result;
use crate::layers::{split_drive, LayerCore, LayerId};
use crate::params::Layer4Params;
use shunting_core::ShuntingParams;

/// Shunting steps per transmitter step.
const TRANSMITTER_CADENCE: u64 = 10;

/// Self-excitation gain; strong, to sustain transient drive.
const SELF_EXCITATION: f64 = 0.5;

pub struct Layer4 {
    params: Layer4Params,
    pub(crate) core: LayerCore,
    steps: u64,
}

impl Layer4 {
    pub fn new(size: usize, params: Layer4Params, seed: u64) -> Result<Self> {
        params.validate()?;
        let field = ShuntingParams::new(1000.0 / params.time_constant, 1.0, 0.0)?
            .with_self_excitation(SELF_EXCITATION)?;
        let core = LayerCore::new(LayerId::L4, size, field, true, seed)?;
        Ok(Self {
            params,
            core,
            steps: 0,
        })
    }

    /// Layer parameters.
    pub fn params(&self) -> &Layer4Params {
        &self.params
    }

    /// Drive the layer with an external pattern for one step. Negative
    /// drive components act inhibitorily. Returns the gated activation.
    pub fn process_bottom_up(&mut self, input: &[f64], dt: f64) -> Result<Vec<f64>> {
        let drive: Vec<f64> = input.iter().map(|&v| v * self.params.driving_strength).collect();
        let (excitatory, inhibitory) = split_drive(&drive);

        let activation = self.core.step(&excitatory, Some(&inhibitory), dt, true)?;

        self.steps += 1;
        let gated = if let Some(gates) = self.core.gates() {
            gates.set_signal(&excitatory)?;
            if self.steps % TRANSMITTER_CADENCE == 0 {
                gates.update(dt * TRANSMITTER_CADENCE as f64);
            }
            gates.gate(&activation)?
        } else {
            activation
        };
        Ok(gated)
    }

    /// Fold L6 feedback back into the layer state.
    pub fn apply_top_down(&mut self, feedback: &[f64], dt: f64) -> Result<Vec<f64>> {
        let (excitatory, inhibitory) = split_drive(feedback);
        self.core.step(&excitatory, Some(&inhibitory), dt, false)
    }

    pub(crate) fn reset_layer(&mut self) {
        self.core.reset();
        self.steps = 0;
    }
}

crate::layers::impl_cortical_layer!(Layer4);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::CorticalLayer;
    use std::f64::consts::PI;

    fn layer(size: usize) -> Layer4 {
        Layer4::new(size, Layer4Params::default(), 1).unwrap()
    }

    #[test]
    fn test_zero_input_zero_output() {
        let mut l4 = layer(10);
        for _ in 0..100 {
            let out = l4.process_bottom_up(&vec![0.0; 10], 0.001).unwrap();
            assert!(out.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_driving_strength_scales_response() {
        let mut weak = Layer4::new(4, Layer4Params::new(25.0, 0.5).unwrap(), 1).unwrap();
        let mut strong = Layer4::new(4, Layer4Params::new(25.0, 3.0).unwrap(), 1).unwrap();

        let input = vec![0.5; 4];
        let mut weak_out = Vec::new();
        let mut strong_out = Vec::new();
        for _ in 0..200 {
            weak_out = weak.process_bottom_up(&input, 0.001).unwrap();
            strong_out = strong.process_bottom_up(&input, 0.001).unwrap();
        }
        assert!(strong_out[0] > weak_out[0]);
    }

    #[test]
    fn test_gamma_passthrough() {
        let mut l4 = layer(10);
        l4.enable_oscillation_tracking(1000.0, 256).unwrap();

        for k in 0..256 {
            let t = k as f64 / 1000.0;
            let sample = (2.0 * PI * 40.0 * t).sin();
            l4.process_bottom_up(&vec![sample; 10], 0.001).unwrap();
        }

        let metrics = l4.oscillation_metrics().unwrap();
        assert!(
            (35.0..=45.0).contains(&metrics.dominant_frequency),
            "dominant frequency {} outside gamma window",
            metrics.dominant_frequency
        );
        assert!(metrics.is_gamma);
    }

    #[test]
    fn test_sustained_drive_habituates_output() {
        let mut l4 = layer(4);
        let input = vec![1.0; 4];

        let mut early = Vec::new();
        let mut late = Vec::new();
        for step in 0..20000 {
            let out = l4.process_bottom_up(&input, 0.001).unwrap();
            if step == 500 {
                early = out;
            } else if step == 19999 {
                late = out;
            }
        }
        assert!(late[0] < early[0]);
    }

    #[test]
    fn test_reset_restores_rest() {
        let mut l4 = layer(4);
        for _ in 0..50 {
            l4.process_bottom_up(&vec![1.0; 4], 0.001).unwrap();
        }
        l4.reset();
        assert!(l4.activation().iter().all(|&x| x == 0.0));
        assert_eq!(l4.degraded_ticks(), 0);
    }

    #[test]
    fn test_input_size_mismatch() {
        let mut l4 = layer(4);
        assert!(l4.process_bottom_up(&[1.0, 2.0], 0.001).is_err());
    }
}
