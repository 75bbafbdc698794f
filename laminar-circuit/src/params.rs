//! Layer parameter blocks.
//!
//! Each laminar layer has its own value record with layer-specific
//! time-constant bounds. Violations surface as configuration errors at
//! construction, never at processing time. Time constants are in
//! milliseconds; the shunting decay rate of a layer is `1000 / tau`.

use crate::error::{CircuitError, Result};
use serde::{Deserialize, Serialize};

fn invalid(parameter: &str, value: f64, reason: &str) -> CircuitError {
    CircuitError::InvalidParameter {
        parameter: parameter.to_string(),
        value,
        reason: reason.to_string(),
    }
}

fn check_time_constant(value: f64, low: f64, high: f64) -> Result<()> {
    if !value.is_finite() || value < low || value > high {
        return Err(invalid(
            "time_constant",
            value,
            &format!("must lie in [{low}, {high}] ms"),
        ));
    }
    Ok(())
}

fn check_non_negative(parameter: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(parameter, value, "must be non-negative and finite"));
    }
    Ok(())
}

fn check_unit_interval(parameter: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(parameter, value, "must lie in [0, 1]"));
    }
    Ok(())
}

/// Layer 1: slow priming/context layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer1Params {
    /// Membrane time constant (ms), in [300, 700].
    pub time_constant: f64,
    /// Scale of the modulatory priming passed to L2/3, in [0, 1].
    pub priming_strength: f64,
}

impl Default for Layer1Params {
    fn default() -> Self {
        Self {
            time_constant: 500.0,
            priming_strength: 0.3,
        }
    }
}

impl Layer1Params {
    pub fn new(time_constant: f64, priming_strength: f64) -> Result<Self> {
        let params = Self {
            time_constant,
            priming_strength,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_time_constant(self.time_constant, 300.0, 700.0)?;
        check_unit_interval("priming_strength", self.priming_strength)?;
        Ok(())
    }
}

/// Layer 2/3: integration layer combining bottom-up, top-down and
/// priming inputs under lateral competition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer23Params {
    /// Membrane time constant (ms), in [50, 100].
    pub time_constant: f64,
    /// Weight on the L6 top-down expectation.
    pub top_down_weight: f64,
    /// Weight on the L4 bottom-up drive.
    pub bottom_up_weight: f64,
}

impl Default for Layer23Params {
    fn default() -> Self {
        Self {
            time_constant: 75.0,
            top_down_weight: 0.5,
            bottom_up_weight: 1.0,
        }
    }
}

impl Layer23Params {
    pub fn new(time_constant: f64, bottom_up_weight: f64, top_down_weight: f64) -> Result<Self> {
        let params = Self {
            time_constant,
            top_down_weight,
            bottom_up_weight,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_time_constant(self.time_constant, 50.0, 100.0)?;
        check_non_negative("top_down_weight", self.top_down_weight)?;
        check_non_negative("bottom_up_weight", self.bottom_up_weight)?;
        Ok(())
    }
}

/// Layer 4: fast driving-input layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer4Params {
    /// Membrane time constant (ms), in [10, 50].
    pub time_constant: f64,
    /// Gain applied to the external drive.
    pub driving_strength: f64,
}

impl Default for Layer4Params {
    fn default() -> Self {
        Self {
            time_constant: 25.0,
            driving_strength: 1.5,
        }
    }
}

impl Layer4Params {
    pub fn new(time_constant: f64, driving_strength: f64) -> Result<Self> {
        let params = Self {
            time_constant,
            driving_strength,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_time_constant(self.time_constant, 10.0, 50.0)?;
        check_non_negative("driving_strength", self.driving_strength)?;
        Ok(())
    }
}

/// Layer 5: output/category layer with burst amplification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer5Params {
    /// Membrane time constant (ms), in [50, 200].
    pub time_constant: f64,
    /// Gain applied to the incoming activation.
    pub amplification_gain: f64,
    /// Input level above which a unit bursts.
    pub burst_threshold: f64,
    /// Multiplier applied to bursting units.
    pub burst_amplification: f64,
    /// Gain applied to the layer output.
    pub output_gain: f64,
    /// Output level above which a category is declared formed.
    pub category_threshold: f64,
    /// Strength of the divisive soft-normalizer (0 disables).
    pub output_normalization: f64,
}

impl Default for Layer5Params {
    fn default() -> Self {
        Self {
            time_constant: 100.0,
            amplification_gain: 1.5,
            burst_threshold: 0.7,
            burst_amplification: 2.0,
            output_gain: 1.0,
            category_threshold: 0.8,
            output_normalization: 0.5,
        }
    }
}

impl Layer5Params {
    pub fn new(time_constant: f64) -> Result<Self> {
        let params = Self {
            time_constant,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_time_constant(self.time_constant, 50.0, 200.0)?;
        check_non_negative("amplification_gain", self.amplification_gain)?;
        check_non_negative("burst_threshold", self.burst_threshold)?;
        if !self.burst_amplification.is_finite() || self.burst_amplification < 1.0 {
            return Err(invalid(
                "burst_amplification",
                self.burst_amplification,
                "must be at least 1",
            ));
        }
        check_non_negative("output_gain", self.output_gain)?;
        check_non_negative("category_threshold", self.category_threshold)?;
        check_non_negative("output_normalization", self.output_normalization)?;
        Ok(())
    }
}

/// Layer 6: slow modulatory feedback layer implementing the ART
/// matching rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer6Params {
    /// Membrane time constant (ms), in [100, 500].
    pub time_constant: f64,
    /// Enhancement of units where expectation and drive coincide.
    pub on_center_weight: f64,
    /// Suppression of units adjacent to expected ones.
    pub off_surround_strength: f64,
    /// Gain of the feedback returned to L4.
    pub attentional_gain: f64,
    /// Bottom-up level a unit needs before it may emit anything.
    pub modulation_threshold: f64,
    /// Output ceiling.
    pub ceiling: f64,
}

impl Default for Layer6Params {
    fn default() -> Self {
        Self {
            time_constant: 200.0,
            on_center_weight: 1.0,
            off_surround_strength: 0.3,
            attentional_gain: 0.5,
            modulation_threshold: 0.0,
            ceiling: 1.0,
        }
    }
}

impl Layer6Params {
    pub fn new(time_constant: f64) -> Result<Self> {
        let params = Self {
            time_constant,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_time_constant(self.time_constant, 100.0, 500.0)?;
        check_non_negative("on_center_weight", self.on_center_weight)?;
        check_non_negative("off_surround_strength", self.off_surround_strength)?;
        check_non_negative("attentional_gain", self.attentional_gain)?;
        check_non_negative("modulation_threshold", self.modulation_threshold)?;
        if !self.ceiling.is_finite() || self.ceiling <= 0.0 {
            return Err(invalid("ceiling", self.ceiling, "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(Layer1Params::default().validate().is_ok());
        assert!(Layer23Params::default().validate().is_ok());
        assert!(Layer4Params::default().validate().is_ok());
        assert!(Layer5Params::default().validate().is_ok());
        assert!(Layer6Params::default().validate().is_ok());
    }

    #[test]
    fn test_time_constant_bounds_per_layer() {
        assert!(Layer1Params::new(200.0, 0.3).is_err());
        assert!(Layer1Params::new(800.0, 0.3).is_err());
        assert!(Layer23Params::new(40.0, 1.0, 0.5).is_err());
        assert!(Layer4Params::new(60.0, 1.5).is_err());
        assert!(Layer5Params::new(30.0).is_err());
        assert!(Layer6Params::new(600.0).is_err());
    }

    #[test]
    fn test_priming_strength_unit_interval() {
        assert!(Layer1Params::new(500.0, 1.5).is_err());
        assert!(Layer1Params::new(500.0, -0.1).is_err());
    }

    #[test]
    fn test_negative_weights_rejected() {
        assert!(Layer23Params::new(75.0, -1.0, 0.5).is_err());
        assert!(Layer4Params::new(25.0, -0.5).is_err());
    }

    #[test]
    fn test_burst_amplification_floor() {
        let mut params = Layer5Params::default();
        params.burst_amplification = 0.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_nan_time_constant_rejected() {
        assert!(Layer4Params::new(f64::NAN, 1.0).is_err());
    }

    proptest::proptest! {
        /// Construction succeeds exactly on the documented L4 range.
        #[test]
        fn prop_l4_time_constant_range(tc in -50.0f64..150.0) {
            let expected = (10.0..=50.0).contains(&tc);
            proptest::prop_assert_eq!(Layer4Params::new(tc, 1.0).is_ok(), expected);
        }
    }
}
