//! Habituative transmitter gates.
//!
//! Each unit carries a slowly recovering transmitter level that is
//! depleted by its signal and multiplies the unit's output:
//!
//! ```text
//! dz_i/dt = alpha * (Z - z_i) - (beta * s_i + gamma * s_i^2) * z_i
//! y_i     = z_i * x_i
//! ```
//!
//! Transmitters evolve on a time scale roughly ten times slower than
//! the shunting field; owners integrate the field N times per
//! transmitter step (N = 10 by convention).

use crate::error::{DynamicsError, Result};
use crate::params::TransmitterParams;
use nalgebra::DVector;

/// A field of habituative transmitter gates.
#[derive(Debug, Clone)]
pub struct TransmitterDynamics {
    size: usize,
    params: TransmitterParams,
    gates: DVector<f64>,
    signal: DVector<f64>,
}

impl TransmitterDynamics {
    /// Create `size` gates at the rest baseline.
    pub fn new(size: usize, params: TransmitterParams) -> Result<Self> {
        if size == 0 {
            return Err(DynamicsError::EmptyField);
        }
        let baseline = params.baseline;
        Ok(Self {
            size,
            params,
            gates: DVector::from_element(size, baseline),
            signal: DVector::zeros(size),
        })
    }

    /// Number of gates.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Set the depleting signal for every gate.
    pub fn set_signal(&mut self, signal: &[f64]) -> Result<()> {
        if signal.len() != self.size {
            return Err(DynamicsError::SizeMismatch {
                expected: self.size,
                actual: signal.len(),
            });
        }
        self.signal.copy_from_slice(signal);
        Ok(())
    }

    /// Set the signal of a single gate, clearing the rest.
    pub fn set_signal_at(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= self.size {
            return Err(DynamicsError::InvalidUnitIndex {
                index,
                max: self.size - 1,
            });
        }
        self.signal.fill(0.0);
        self.signal[index] = value;
        Ok(())
    }

    /// Clear all signals; gates recover toward baseline.
    pub fn clear_signal(&mut self) {
        self.signal.fill(0.0);
    }

    /// Advance the gates by one forward-Euler step of `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let alpha = self.params.recovery_rate;
        let z_rest = self.params.baseline;
        let beta = self.params.depletion_linear;
        let gamma = self.params.depletion_quadratic;
        let floor = self.params.floor;

        for i in 0..self.size {
            let z = self.gates[i];
            let s = self.signal[i];
            let dz = alpha * (z_rest - z) - (beta * s + gamma * s * s) * z;
            self.gates[i] = (z + dt * dz).clamp(floor, z_rest);
        }
    }

    /// Multiplicative output gating: `y = z .* x`.
    pub fn gate(&self, activations: &[f64]) -> Result<Vec<f64>> {
        if activations.len() != self.size {
            return Err(DynamicsError::SizeMismatch {
                expected: self.size,
                actual: activations.len(),
            });
        }
        Ok(activations
            .iter()
            .zip(self.gates.iter())
            .map(|(&x, &z)| x * z)
            .collect())
    }

    /// Current gate levels (defensive copy).
    pub fn gates(&self) -> Vec<f64> {
        self.gates.as_slice().to_vec()
    }

    /// Gate level of a single unit.
    pub fn gate_at(&self, index: usize) -> Result<f64> {
        if index >= self.size {
            return Err(DynamicsError::InvalidUnitIndex {
                index,
                max: self.size - 1,
            });
        }
        Ok(self.gates[index])
    }

    /// Mean gate level; owners use this for should-reset decisions.
    pub fn mean_level(&self) -> f64 {
        self.gates.sum() / self.size as f64
    }

    /// Return all gates to baseline and clear signals.
    pub fn reset(&mut self) {
        self.gates.fill(self.params.baseline);
        self.signal.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gates(size: usize) -> TransmitterDynamics {
        TransmitterDynamics::new(size, TransmitterParams::default()).unwrap()
    }

    #[test]
    fn test_starts_at_baseline() {
        let t = gates(4);
        assert!(t.gates().iter().all(|&z| z == 1.0));
        assert_relative_eq!(t.mean_level(), 1.0);
    }

    #[test]
    fn test_signal_depletes_gate() {
        let mut t = gates(3);
        t.set_signal_at(1, 1.0).unwrap();

        for _ in 0..100 {
            t.update(0.01);
        }

        let z = t.gates();
        assert!(z[1] < 1.0);
        assert_eq!(z[0], 1.0);
        assert!(z[1] > 0.0);
    }

    #[test]
    fn test_recovery_toward_baseline() {
        let mut t = gates(1);
        t.set_signal(&[2.0]).unwrap();
        for _ in 0..500 {
            t.update(0.01);
        }
        let depleted = t.gate_at(0).unwrap();
        assert!(depleted < 0.5);

        t.clear_signal();
        for _ in 0..20000 {
            t.update(0.01);
        }
        assert_relative_eq!(t.gate_at(0).unwrap(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_gate_stays_strictly_positive() {
        let mut t = gates(1);
        t.set_signal(&[100.0]).unwrap();
        for _ in 0..10000 {
            t.update(0.01);
        }
        assert!(t.gate_at(0).unwrap() > 0.0);
    }

    #[test]
    fn test_multiplicative_gating() {
        let mut t = gates(2);
        t.set_signal(&[3.0, 0.0]).unwrap();
        for _ in 0..200 {
            t.update(0.01);
        }

        let gated = t.gate(&[0.8, 0.8]).unwrap();
        assert!(gated[0] < gated[1]);
        assert_relative_eq!(gated[1], 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_gate_size_mismatch() {
        let t = gates(3);
        assert!(t.gate(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut t = gates(2);
        t.set_signal(&[5.0, 5.0]).unwrap();
        for _ in 0..100 {
            t.update(0.01);
        }
        t.reset();
        assert!(t.gates().iter().all(|&z| z == 1.0));
        assert_relative_eq!(t.mean_level(), 1.0);
    }
}
