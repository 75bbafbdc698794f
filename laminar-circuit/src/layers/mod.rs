//! The five laminar layers.
//!
//! Each layer wraps a [`LayerCore`] (shunting field, optional
//! transmitter gates, weight matrix, optional oscillation tracker)
//! with its own processing policy. The shared capability surface is
//! the [`CorticalLayer`] trait.

mod layer1;
mod layer23;
mod layer4;
mod layer5;
mod layer6;

pub use layer1::Layer1;
pub use layer23::Layer23;
pub use layer4::Layer4;
pub use layer5::Layer5;
pub use layer6::Layer6;

use crate::error::Result;
use gated_learning::WeightMatrix;
use resonance_metrics::{OscillationAnalyzer, OscillationMetrics};
use serde::{Deserialize, Serialize};
use shunting_core::{ShuntingDynamics, ShuntingParams, TransmitterDynamics, TransmitterParams};

/// Weight bounds shared by all layer matrices.
const WEIGHT_MIN: f64 = 0.0;
const WEIGHT_MAX: f64 = 1.0;

/// Laminar layer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerId {
    L1,
    L23,
    L4,
    L5,
    L6,
}

impl LayerId {
    /// Stable name used for statistics keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerId::L1 => "L1",
            LayerId::L23 => "L2/3",
            LayerId::L4 => "L4",
            LayerId::L5 => "L5",
            LayerId::L6 => "L6",
        }
    }
}

/// Common capability surface of the five layers.
pub trait CorticalLayer {
    /// Layer identifier.
    fn id(&self) -> LayerId;

    /// Number of units.
    fn size(&self) -> usize;

    /// Current activation vector (defensive copy).
    fn activation(&self) -> Vec<f64>;

    /// The layer's weight matrix.
    fn weights(&self) -> &WeightMatrix;

    /// Mutable access for the learning controller.
    fn weights_mut(&mut self) -> &mut WeightMatrix;

    /// Return the layer to rest; weights are preserved.
    fn reset(&mut self);

    /// Attach a rolling oscillation tracker.
    fn enable_oscillation_tracking(&mut self, sample_rate: f64, history_size: usize)
        -> Result<()>;

    /// Detach the oscillation tracker, dropping its buffer.
    fn disable_oscillation_tracking(&mut self);

    /// Spectral metrics over the tracked signal, when enough samples
    /// are buffered.
    fn oscillation_metrics(&mut self) -> Option<OscillationMetrics>;

    /// Number of ticks recovered from non-finite activations.
    fn degraded_ticks(&self) -> u64;
}

/// State shared by every layer variant.
pub(crate) struct LayerCore {
    id: LayerId,
    size: usize,
    field: ShuntingDynamics,
    gates: Option<TransmitterDynamics>,
    weights: WeightMatrix,
    tracker: Option<OscillationAnalyzer>,
    degraded_ticks: u64,
}

impl LayerCore {
    pub(crate) fn new(
        id: LayerId,
        size: usize,
        field_params: ShuntingParams,
        with_gates: bool,
        seed: u64,
    ) -> Result<Self> {
        let field = ShuntingDynamics::new(size, field_params)?;
        let gates = if with_gates {
            Some(TransmitterDynamics::new(size, TransmitterParams::default())?)
        } else {
            None
        };
        let weights = WeightMatrix::random(size, size, WEIGHT_MIN, WEIGHT_MAX, seed)?;
        Ok(Self {
            id,
            size,
            field,
            gates,
            weights,
            tracker: None,
            degraded_ticks: 0,
        })
    }

    /// One forward-Euler step with the given drive. Non-finite
    /// activations after the clamp reset the field and count the tick
    /// as degraded; `track` controls whether the tracker samples this
    /// step (layers that step several times per tick sample once).
    pub(crate) fn step(
        &mut self,
        excitatory: &[f64],
        inhibitory: Option<&[f64]>,
        dt: f64,
        track: bool,
    ) -> Result<Vec<f64>> {
        self.field.set_excitatory(excitatory)?;
        if let Some(inhibitory) = inhibitory {
            self.field.set_inhibitory(inhibitory)?;
        }
        self.field.update(dt);

        if self.field.has_non_finite() {
            tracing::warn!(layer = self.id.as_str(), "non-finite activation, layer reset");
            self.field.reset();
            if let Some(gates) = self.gates.as_mut() {
                gates.reset();
            }
            self.degraded_ticks += 1;
        }

        if track {
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.push(self.field.mean_activation());
            }
        }
        Ok(self.field.activations())
    }

    pub(crate) fn id(&self) -> LayerId {
        self.id
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn activation(&self) -> Vec<f64> {
        self.field.activations()
    }

    pub(crate) fn gates(&mut self) -> Option<&mut TransmitterDynamics> {
        self.gates.as_mut()
    }

    pub(crate) fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    pub(crate) fn weights_mut(&mut self) -> &mut WeightMatrix {
        &mut self.weights
    }

    pub(crate) fn reset(&mut self) {
        self.field.reset();
        if let Some(gates) = self.gates.as_mut() {
            gates.reset();
        }
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.reset();
        }
    }

    pub(crate) fn enable_tracking(&mut self, sample_rate: f64, history_size: usize) -> Result<()> {
        self.tracker = Some(OscillationAnalyzer::new(sample_rate, history_size)?);
        Ok(())
    }

    pub(crate) fn disable_tracking(&mut self) {
        self.tracker = None;
    }

    pub(crate) fn metrics(&mut self) -> Option<OscillationMetrics> {
        self.tracker.as_mut().and_then(|t| t.metrics().ok())
    }

    pub(crate) fn degraded_ticks(&self) -> u64 {
        self.degraded_ticks
    }
}

/// Implements [`CorticalLayer`] by delegating to the layer's core.
macro_rules! impl_cortical_layer {
    ($layer:ty) => {
        impl crate::layers::CorticalLayer for $layer {
            fn id(&self) -> crate::layers::LayerId {
                self.core.id()
            }

            fn size(&self) -> usize {
                self.core.size()
            }

            fn activation(&self) -> Vec<f64> {
                self.core.activation()
            }

            fn weights(&self) -> &gated_learning::WeightMatrix {
                self.core.weights()
            }

            fn weights_mut(&mut self) -> &mut gated_learning::WeightMatrix {
                self.core.weights_mut()
            }

            fn reset(&mut self) {
                self.reset_layer();
            }

            fn enable_oscillation_tracking(
                &mut self,
                sample_rate: f64,
                history_size: usize,
            ) -> crate::error::Result<()> {
                self.core.enable_tracking(sample_rate, history_size)
            }

            fn disable_oscillation_tracking(&mut self) {
                self.core.disable_tracking();
            }

            fn oscillation_metrics(&mut self) -> Option<resonance_metrics::OscillationMetrics> {
                self.core.metrics()
            }

            fn degraded_ticks(&self) -> u64 {
                self.core.degraded_ticks()
            }
        }
    };
}

pub(crate) use impl_cortical_layer;

/// Split a signed drive into its excitatory and inhibitory parts.
pub(crate) fn split_drive(drive: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let excitatory = drive.iter().map(|&d| d.max(0.0)).collect();
    let inhibitory = drive.iter().map(|&d| (-d).max(0.0)).collect();
    (excitatory, inhibitory)
}
