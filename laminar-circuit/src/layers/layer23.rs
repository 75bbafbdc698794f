//! Layer 2/3: integration layer.
//!
//! L2/3 combines the L4 bottom-up drive, the L6 top-down expectation
//! and the L1 priming signal as a weighted sum, integrated under
//! shunting dynamics with lateral competition. The three pathway
//! applications happen as separate steps within one circuit tick, in
//! the fixed schedule order.

use crate::error::Result;
use crate::layers::{split_drive, LayerCore, LayerId};
use crate::params::Layer23Params;
use shunting_core::ShuntingParams;

/// Lateral competition profile.
const LATERAL_EXC_RANGE: usize = 1;
const LATERAL_EXC_STRENGTH: f64 = 0.2;
const LATERAL_INH_RANGE: usize = 3;
const LATERAL_INH_STRENGTH: f64 = 0.4;
const SELF_EXCITATION: f64 = 0.2;

pub struct Layer23 {
    params: Layer23Params,
    pub(crate) core: LayerCore,
    /// Weighted drive accumulated over the tick's pathway steps.
    drive: Vec<f64>,
}

impl Layer23 {
    pub fn new(size: usize, params: Layer23Params, seed: u64) -> Result<Self> {
        params.validate()?;
        let field = ShuntingParams::new(1000.0 / params.time_constant, 1.0, 0.0)?
            .with_self_excitation(SELF_EXCITATION)?
            .with_lateral(
                LATERAL_EXC_RANGE,
                LATERAL_EXC_STRENGTH,
                LATERAL_INH_RANGE,
                LATERAL_INH_STRENGTH,
            )?;
        let core = LayerCore::new(LayerId::L23, size, field, false, seed)?;
        Ok(Self {
            params,
            core,
            drive: vec![0.0; size],
        })
    }

    /// Layer parameters.
    pub fn params(&self) -> &Layer23Params {
        &self.params
    }

    /// Integrate the L4 bottom-up drive (weighted by
    /// `bottom_up_weight`). Starts a fresh tick's drive accumulator.
    pub fn process_bottom_up(&mut self, bottom_up: &[f64], dt: f64) -> Result<Vec<f64>> {
        if bottom_up.len() != self.core.size() {
            return Err(shunting_core::DynamicsError::SizeMismatch {
                expected: self.core.size(),
                actual: bottom_up.len(),
            }
            .into());
        }
        self.drive = bottom_up
            .iter()
            .map(|&v| v * self.params.bottom_up_weight)
            .collect();
        let (excitatory, inhibitory) = split_drive(&self.drive);
        self.core.step(&excitatory, Some(&inhibitory), dt, true)
    }

    /// Fold the L6 expectation into the accumulated drive (weighted by
    /// `top_down_weight`) and integrate one step.
    pub fn apply_top_down(&mut self, top_down: &[f64], dt: f64) -> Result<Vec<f64>> {
        if top_down.len() != self.core.size() {
            return Err(shunting_core::DynamicsError::SizeMismatch {
                expected: self.core.size(),
                actual: top_down.len(),
            }
            .into());
        }
        for (acc, &td) in self.drive.iter_mut().zip(top_down) {
            *acc += td * self.params.top_down_weight;
        }
        let (excitatory, inhibitory) = split_drive(&self.drive);
        self.core.step(&excitatory, Some(&inhibitory), dt, false)
    }

    /// Add the L1 priming signal on top of the accumulated drive and
    /// integrate one step. The priming is not folded into the
    /// accumulator; it modulates this step only.
    pub fn apply_priming(&mut self, priming: &[f64], dt: f64) -> Result<Vec<f64>> {
        if priming.len() != self.core.size() {
            return Err(shunting_core::DynamicsError::SizeMismatch {
                expected: self.core.size(),
                actual: priming.len(),
            }
            .into());
        }
        let combined: Vec<f64> = self
            .drive
            .iter()
            .zip(priming)
            .map(|(&d, &p)| d + p)
            .collect();
        let (excitatory, inhibitory) = split_drive(&combined);
        self.core.step(&excitatory, Some(&inhibitory), dt, false)
    }

    pub(crate) fn reset_layer(&mut self) {
        self.core.reset();
        self.drive.fill(0.0);
    }
}

crate::layers::impl_cortical_layer!(Layer23);

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(size: usize) -> Layer23 {
        Layer23::new(size, Layer23Params::default(), 1).unwrap()
    }

    #[test]
    fn test_bottom_up_drives_activation() {
        let mut l23 = layer(5);
        let mut out = Vec::new();
        for _ in 0..500 {
            out = l23
                .process_bottom_up(&[1.0, 0.0, 0.0, 0.0, 0.0], 0.001)
                .unwrap();
        }
        assert!(out[0] > 0.0);
        assert!(out[0] > out[4]);
    }

    #[test]
    fn test_top_down_adds_to_bottom_up() {
        let mut with_td = layer(4);
        let mut without_td = layer(4);

        let bu = vec![0.4; 4];
        let td = vec![0.8; 4];
        let zeros = vec![0.0; 4];
        let mut combined = Vec::new();
        let mut plain = Vec::new();
        for _ in 0..500 {
            with_td.process_bottom_up(&bu, 0.001).unwrap();
            combined = with_td.apply_top_down(&td, 0.001).unwrap();
            without_td.process_bottom_up(&bu, 0.001).unwrap();
            plain = without_td.apply_top_down(&zeros, 0.001).unwrap();
        }
        assert!(combined[0] > plain[0]);
    }

    #[test]
    fn test_priming_boosts_but_does_not_accumulate() {
        let mut primed = layer(4);
        let mut plain = layer(4);
        let bu = vec![0.5; 4];

        let mut primed_out = Vec::new();
        let mut plain_out = Vec::new();
        for _ in 0..200 {
            primed.process_bottom_up(&bu, 0.001).unwrap();
            primed_out = primed.apply_priming(&[0.5; 4], 0.001).unwrap();
            plain.process_bottom_up(&bu, 0.001).unwrap();
            plain_out = plain.apply_priming(&[0.0; 4], 0.001).unwrap();
        }
        assert!(primed_out[0] > plain_out[0]);

        // The drive accumulator holds only the weighted bottom-up term
        assert!((primed.drive[0] - 0.5 * primed.params.bottom_up_weight).abs() < 1e-12);
    }

    #[test]
    fn test_lateral_competition_sharpens_contrast() {
        let mut l23 = layer(7);
        let mut drive = vec![0.3; 7];
        drive[3] = 1.0;

        let mut out = Vec::new();
        for _ in 0..2000 {
            out = l23.process_bottom_up(&drive, 0.001).unwrap();
        }
        // The strongly driven unit dominates its surround
        assert!(out[3] > out[1] * 2.0);
    }

    #[test]
    fn test_zero_drive_exactly_zero() {
        let mut l23 = layer(4);
        let zeros = vec![0.0; 4];
        for _ in 0..10 {
            l23.process_bottom_up(&zeros, 0.001).unwrap();
            l23.apply_top_down(&zeros, 0.001).unwrap();
            let out = l23.apply_priming(&zeros, 0.001).unwrap();
            assert!(out.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut l23 = layer(4);
        assert!(l23.process_bottom_up(&[1.0], 0.001).is_err());
        assert!(l23.apply_top_down(&[1.0], 0.001).is_err());
        assert!(l23.apply_priming(&[1.0], 0.001).is_err());
    }
}
