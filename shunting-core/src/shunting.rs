//! Shunting on-center off-surround field dynamics.
//!
//! Implements the bounded membrane equation
//!
//! ```text
//! dx_i/dt = -A * x_i + (B - x_i) * E+_i - (x_i - floor) * E-_i
//! ```
//!
//! integrated with a single explicit forward-Euler step per call. The
//! multiplicative gating terms keep every activation inside
//! `[floor, B]` provided the caller respects the stability constraint
//! `dt * (A + E+ + E-) < 1`; a post-step clamp enforces the bounds
//! against drive spikes and surfaces non-finite values for recovery.

use crate::error::{DynamicsError, Result};
use crate::kernel::LateralKernel;
use crate::params::ShuntingParams;
use nalgebra::DVector;

/// A field of shunting units with lateral interactions.
#[derive(Debug, Clone)]
pub struct ShuntingDynamics {
    size: usize,
    params: ShuntingParams,
    kernel: LateralKernel,
    activations: DVector<f64>,
    excitatory: DVector<f64>,
    inhibitory: DVector<f64>,
}

impl ShuntingDynamics {
    /// Create a field of `size` units at rest.
    ///
    /// # Examples
    ///
    /// ```
    /// use shunting_core::{ShuntingDynamics, ShuntingParams};
    ///
    /// let params = ShuntingParams::new(1.0, 1.0, 0.0).unwrap();
    /// let field = ShuntingDynamics::new(10, params).unwrap();
    /// assert_eq!(field.size(), 10);
    /// assert!(field.activations().iter().all(|&x| x == 0.0));
    /// ```
    pub fn new(size: usize, params: ShuntingParams) -> Result<Self> {
        if size == 0 {
            return Err(DynamicsError::EmptyField);
        }
        let kernel = LateralKernel::new(
            params.excitatory_range,
            params.excitatory_strength,
            params.inhibitory_range,
            params.inhibitory_strength,
        );
        Ok(Self {
            size,
            params,
            kernel,
            activations: DVector::zeros(size),
            excitatory: DVector::zeros(size),
            inhibitory: DVector::zeros(size),
        })
    }

    /// Number of units in the field.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Field parameters.
    pub fn params(&self) -> &ShuntingParams {
        &self.params
    }

    /// Set the external excitatory drive.
    pub fn set_excitatory(&mut self, drive: &[f64]) -> Result<()> {
        self.check_len(drive)?;
        self.excitatory.copy_from_slice(drive);
        Ok(())
    }

    /// Set the external inhibitory drive.
    pub fn set_inhibitory(&mut self, drive: &[f64]) -> Result<()> {
        self.check_len(drive)?;
        self.inhibitory.copy_from_slice(drive);
        Ok(())
    }

    /// Set the excitatory drive of a single unit, clearing the rest.
    pub fn set_excitatory_at(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= self.size {
            return Err(DynamicsError::InvalidUnitIndex {
                index,
                max: self.size - 1,
            });
        }
        self.excitatory.fill(0.0);
        self.excitatory[index] = value;
        Ok(())
    }

    /// Overwrite the field state with externally gated activations.
    ///
    /// Values are clamped to `[floor, ceiling]` on entry.
    pub fn load_state(&mut self, state: &[f64]) -> Result<()> {
        self.check_len(state)?;
        for (dst, &src) in self.activations.iter_mut().zip(state) {
            *dst = src.clamp(self.params.floor, self.params.ceiling);
        }
        Ok(())
    }

    /// Advance the field by one forward-Euler step of length `dt` seconds.
    ///
    /// The caller-supplied drive is combined with the lateral kernel
    /// contribution computed from the current activations before
    /// integration; after the step every activation is clamped to
    /// `[floor, ceiling]`.
    pub fn update(&mut self, dt: f64) -> Vec<f64> {
        let (lateral_exc, lateral_inh) = self.kernel.apply(self.activations.as_slice());

        let a = self.params.decay_rate;
        let b = self.params.ceiling;
        let floor = self.params.floor;
        let s = self.params.self_excitation;
        let damping = self.params.damping;

        for i in 0..self.size {
            let x = self.activations[i];
            let e_plus = self.excitatory[i] + lateral_exc[i] + s * x.max(0.0);
            let e_minus = self.inhibitory[i] + lateral_inh[i];

            let dx = -a * x + (b - x) * e_plus - (x - floor) * e_minus;
            let stepped = x + dt * dx;
            let blended = damping * stepped + (1.0 - damping) * x;
            self.activations[i] = blended.clamp(floor, b);
        }

        self.activations.as_slice().to_vec()
    }

    /// Current activation vector (defensive copy).
    pub fn activations(&self) -> Vec<f64> {
        self.activations.as_slice().to_vec()
    }

    /// Activation of a single unit.
    pub fn activation_at(&self, index: usize) -> Result<f64> {
        if index >= self.size {
            return Err(DynamicsError::InvalidUnitIndex {
                index,
                max: self.size - 1,
            });
        }
        Ok(self.activations[index])
    }

    /// Mean activation over the field.
    pub fn mean_activation(&self) -> f64 {
        self.activations.sum() / self.size as f64
    }

    /// Whether any activation is NaN or infinite after the last step.
    ///
    /// The clamp preserves non-finite values, so owners can detect an
    /// unstable parameter combination here and reset the field.
    pub fn has_non_finite(&self) -> bool {
        self.activations.iter().any(|x| !x.is_finite())
    }

    /// Return the field to rest and clear all drive.
    pub fn reset(&mut self) {
        self.activations.fill(0.0);
        self.excitatory.fill(0.0);
        self.inhibitory.fill(0.0);
    }

    fn check_len(&self, v: &[f64]) -> Result<()> {
        if v.len() != self.size {
            return Err(DynamicsError::SizeMismatch {
                expected: self.size,
                actual: v.len(),
            });
        }
        Ok(())
    }
}
