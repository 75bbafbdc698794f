//! Parameter records for shunting and transmitter dynamics.
//!
//! All range and sign constraints are enforced at construction time;
//! the update loops assume validated parameters and never re-check.

use crate::error::{DynamicsError, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the shunting membrane equation
///
/// ```text
/// dx_i/dt = -A * x_i + (B - x_i) * E+_i - (x_i - floor) * E-_i
/// ```
///
/// where `B` is the ceiling, `A` the passive decay rate and `E+`/`E-`
/// the total excitatory/inhibitory drive including lateral kernel
/// contributions and self-excitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuntingParams {
    /// Passive decay rate A (1/s).
    pub decay_rate: f64,

    /// Upper saturation bound B.
    pub ceiling: f64,

    /// Lower saturation bound (non-positive).
    pub floor: f64,

    /// Self-excitation gain applied to the unit's own activation.
    pub self_excitation: f64,

    /// Lateral excitation radius in units (0 disables).
    pub excitatory_range: usize,

    /// Peak lateral excitation strength.
    pub excitatory_strength: f64,

    /// Lateral inhibition radius in units (0 disables).
    pub inhibitory_range: usize,

    /// Peak lateral inhibition strength.
    pub inhibitory_strength: f64,

    /// Convex blend weight on the newly integrated value, in (0, 1].
    /// Values below 1 damp step-to-step oscillation.
    pub damping: f64,
}

impl Default for ShuntingParams {
    fn default() -> Self {
        Self {
            decay_rate: 1.0,
            ceiling: 1.0,
            floor: 0.0,
            self_excitation: 0.0,
            excitatory_range: 0,
            excitatory_strength: 0.0,
            inhibitory_range: 0,
            inhibitory_strength: 0.0,
            damping: 0.85,
        }
    }
}

impl ShuntingParams {
    /// Create validated parameters with the given decay, ceiling and floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use shunting_core::ShuntingParams;
    ///
    /// let params = ShuntingParams::new(1.0, 1.0, -0.2).unwrap();
    /// assert_eq!(params.ceiling, 1.0);
    ///
    /// // Ceiling must exceed floor
    /// assert!(ShuntingParams::new(1.0, -0.5, 0.0).is_err());
    /// ```
    pub fn new(decay_rate: f64, ceiling: f64, floor: f64) -> Result<Self> {
        let params = Self {
            decay_rate,
            ceiling,
            floor,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Attach a lateral kernel profile.
    pub fn with_lateral(
        mut self,
        excitatory_range: usize,
        excitatory_strength: f64,
        inhibitory_range: usize,
        inhibitory_strength: f64,
    ) -> Result<Self> {
        self.excitatory_range = excitatory_range;
        self.excitatory_strength = excitatory_strength;
        self.inhibitory_range = inhibitory_range;
        self.inhibitory_strength = inhibitory_strength;
        self.validate()?;
        Ok(self)
    }

    /// Set the self-excitation gain.
    pub fn with_self_excitation(mut self, gain: f64) -> Result<Self> {
        self.self_excitation = gain;
        self.validate()?;
        Ok(self)
    }

    /// Set the damping blend weight.
    pub fn with_damping(mut self, damping: f64) -> Result<Self> {
        self.damping = damping;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !self.decay_rate.is_finite() || self.decay_rate <= 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "decay_rate".to_string(),
                value: self.decay_rate,
                reason: "must be positive and finite".to_string(),
            });
        }
        if !self.ceiling.is_finite() || self.ceiling <= self.floor {
            return Err(DynamicsError::InvalidParameter {
                parameter: "ceiling".to_string(),
                value: self.ceiling,
                reason: "must be finite and exceed floor".to_string(),
            });
        }
        if self.floor > 0.0 || self.ceiling < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "floor".to_string(),
                value: self.floor,
                reason: "resting level 0 must lie in [floor, ceiling]".to_string(),
            });
        }
        if self.self_excitation < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "self_excitation".to_string(),
                value: self.self_excitation,
                reason: "must be non-negative".to_string(),
            });
        }
        if self.excitatory_strength < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "excitatory_strength".to_string(),
                value: self.excitatory_strength,
                reason: "must be non-negative".to_string(),
            });
        }
        if self.inhibitory_strength < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "inhibitory_strength".to_string(),
                value: self.inhibitory_strength,
                reason: "must be non-negative".to_string(),
            });
        }
        if self.damping <= 0.0 || self.damping > 1.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "damping".to_string(),
                value: self.damping,
                reason: "must lie in (0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// Parameters of the habituative transmitter gate
///
/// ```text
/// dz_i/dt = alpha * (Z - z_i) - (beta * s_i + gamma * s_i^2) * z_i
/// ```
///
/// where `Z` is the rest baseline, `alpha` the recovery rate and
/// `beta`/`gamma` the linear/quadratic depletion terms driven by the
/// signal `s_i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmitterParams {
    /// Recovery rate alpha (1/s).
    pub recovery_rate: f64,

    /// Rest baseline Z.
    pub baseline: f64,

    /// Linear depletion coefficient beta.
    pub depletion_linear: f64,

    /// Quadratic depletion coefficient gamma.
    pub depletion_quadratic: f64,

    /// Strict positivity floor for the gate level.
    pub floor: f64,
}

impl Default for TransmitterParams {
    fn default() -> Self {
        Self {
            recovery_rate: 0.1,
            baseline: 1.0,
            depletion_linear: 0.5,
            depletion_quadratic: 0.3,
            floor: 1e-6,
        }
    }
}

impl TransmitterParams {
    /// Create validated transmitter parameters.
    pub fn new(
        recovery_rate: f64,
        baseline: f64,
        depletion_linear: f64,
        depletion_quadratic: f64,
    ) -> Result<Self> {
        let params = Self {
            recovery_rate,
            baseline,
            depletion_linear,
            depletion_quadratic,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if !self.recovery_rate.is_finite() || self.recovery_rate < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "recovery_rate".to_string(),
                value: self.recovery_rate,
                reason: "must be non-negative and finite".to_string(),
            });
        }
        if !self.baseline.is_finite() || self.baseline <= 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "baseline".to_string(),
                value: self.baseline,
                reason: "must be positive and finite".to_string(),
            });
        }
        if self.depletion_linear < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "depletion_linear".to_string(),
                value: self.depletion_linear,
                reason: "must be non-negative".to_string(),
            });
        }
        if self.depletion_quadratic < 0.0 {
            return Err(DynamicsError::InvalidParameter {
                parameter: "depletion_quadratic".to_string(),
                value: self.depletion_quadratic,
                reason: "must be non-negative".to_string(),
            });
        }
        if self.floor <= 0.0 || self.floor >= self.baseline {
            return Err(DynamicsError::InvalidParameter {
                parameter: "floor".to_string(),
                value: self.floor,
                reason: "must lie strictly between 0 and baseline".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shunting_params_valid() {
        assert!(ShuntingParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_ceiling() {
        assert!(ShuntingParams::new(1.0, -1.0, 0.0).is_err());
        assert!(ShuntingParams::new(1.0, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_floor_must_be_non_positive() {
        assert!(ShuntingParams::new(1.0, 2.0, 0.5).is_err());
        assert!(ShuntingParams::new(1.0, 2.0, -0.5).is_ok());
    }

    #[test]
    fn test_invalid_decay() {
        assert!(ShuntingParams::new(0.0, 1.0, 0.0).is_err());
        assert!(ShuntingParams::new(-1.0, 1.0, 0.0).is_err());
        assert!(ShuntingParams::new(f64::NAN, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_negative_lateral_strength_rejected() {
        let result = ShuntingParams::new(1.0, 1.0, 0.0)
            .unwrap()
            .with_lateral(2, -0.5, 4, 0.3);
        assert!(result.is_err());
    }

    #[test]
    fn test_damping_bounds() {
        let base = ShuntingParams::new(1.0, 1.0, 0.0).unwrap();
        assert!(base.clone().with_damping(0.0).is_err());
        assert!(base.clone().with_damping(1.1).is_err());
        assert!(base.with_damping(1.0).is_ok());
    }

    #[test]
    fn test_transmitter_params() {
        assert!(TransmitterParams::new(0.1, 1.0, 0.5, 0.3).is_ok());
        assert!(TransmitterParams::new(-0.1, 1.0, 0.5, 0.3).is_err());
        assert!(TransmitterParams::new(0.1, 0.0, 0.5, 0.3).is_err());
        assert!(TransmitterParams::new(0.1, 1.0, -0.5, 0.3).is_err());
    }
}
