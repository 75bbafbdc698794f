//! STORE-2 working memory with a primacy gradient.
//!
//! Items are stored at successive positions with a position-dependent
//! initial activation so that earlier items are encoded more strongly.
//! Item activations evolve under shunting dynamics with lateral
//! inhibition while habituative transmitter gates deplete under
//! sustained storage; the gated activation `a_i * z_i` weights the
//! stored patterns on readout.

use crate::config::WorkingMemoryConfig;
use crate::error::{Result, TemporalError};
use serde::{Deserialize, Serialize};
use shunting_core::{ShuntingDynamics, ShuntingParams, TransmitterDynamics, TransmitterParams};

/// Shunting steps per transmitter step.
const TRANSMITTER_CADENCE: usize = 10;

/// Mean gate level below which the field is habituated out and reset.
const HABITUATION_RESET_LEVEL: f64 = 0.3;

/// A stored pattern snapshot with its encoding metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pattern: Vec<f64>,
    position: usize,
    initial_activation: f64,
    stored_at: f64,
}

impl MemoryItem {
    /// The stored pattern snapshot.
    pub fn pattern(&self) -> &[f64] {
        &self.pattern
    }

    /// Insertion position of this item.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Activation assigned at storage time.
    pub fn initial_activation(&self) -> f64 {
        self.initial_activation
    }

    /// Simulation time (s) at which the item was stored.
    pub fn stored_at(&self) -> f64 {
        self.stored_at
    }
}

/// Result of a single store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreOutcome {
    /// The item was encoded at `position`.
    Stored {
        position: usize,
        initial_activation: f64,
    },
    /// The field was full and overflow reset is disabled.
    Dropped,
}

/// Defensive snapshot of the working-memory state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemorySnapshot {
    pub activations: Vec<f64>,
    pub gates: Vec<f64>,
    pub gated_activations: Vec<f64>,
    pub positions: Vec<usize>,
    pub primacy_weights: Vec<f64>,
    pub recency_weights: Vec<f64>,
    pub item_count: usize,
    pub next_position: usize,
    pub primacy_gradient_strength: f64,
}

/// Cumulative counters for recovered and rejected operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkingMemoryStats {
    pub items_stored: u64,
    pub items_dropped: u64,
    pub overflow_resets: u64,
    pub habituation_resets: u64,
}

/// Primacy-gradient working memory over an ordered item sequence.
pub struct WorkingMemory {
    config: WorkingMemoryConfig,
    items: Vec<MemoryItem>,
    field: ShuntingDynamics,
    gates: TransmitterDynamics,
    primacy_weights: Vec<f64>,
    recency_weights: Vec<f64>,
    next_position: usize,
    clock: f64,
    stats: WorkingMemoryStats,
}

impl WorkingMemory {
    /// Create an empty working memory.
    pub fn new(config: WorkingMemoryConfig) -> Result<Self> {
        config.validate()?;

        let field_params = ShuntingParams::new(config.decay_rate, config.max_activation, 0.0)?
            .with_self_excitation(config.self_excitation)?
            .with_lateral(0, 0.0, config.capacity, config.lateral_inhibition)?;
        let field = ShuntingDynamics::new(config.capacity, field_params)?;

        let gate_params = TransmitterParams::new(
            config.transmitter_recovery,
            1.0,
            config.transmitter_depletion_linear,
            config.transmitter_depletion_quadratic,
        )?;
        let gates = TransmitterDynamics::new(config.capacity, gate_params)?;

        let primacy_weights: Vec<f64> = (0..config.capacity)
            .map(|p| (-config.primacy_decay_rate * p as f64).exp())
            .collect();
        let recency_weights: Vec<f64> = (0..config.capacity)
            .map(|p| (-config.primacy_decay_rate * (config.capacity - 1 - p) as f64).exp())
            .collect();

        Ok(Self {
            config,
            items: Vec::new(),
            field,
            gates,
            primacy_weights,
            recency_weights,
            next_position: 0,
            clock: 0.0,
            stats: WorkingMemoryStats::default(),
        })
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the memory holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Stored items in insertion order.
    pub fn items(&self) -> &[MemoryItem] {
        &self.items
    }

    /// Cumulative counters.
    pub fn stats(&self) -> &WorkingMemoryStats {
        &self.stats
    }

    /// Position-dependent initial activation
    ///
    /// ```text
    /// a_init(p) = max(retrieval_threshold, A_max * exp(-lambda(p) * p))
    /// lambda(p) = primacy_decay * (1 + 0.1 * p)
    /// ```
    fn initial_activation(&self, position: usize) -> f64 {
        let p = position as f64;
        let lambda = self.config.primacy_decay_rate * (1.0 + 0.1 * p);
        (self.config.max_activation * (-lambda * p).exp()).max(self.config.retrieval_threshold)
    }

    /// Store one pattern for `duration` seconds of encoding dynamics.
    ///
    /// On overflow the field either resets (overflow reset enabled) or
    /// drops the item, leaving the state unchanged.
    pub fn store_item(&mut self, pattern: &[f64], duration: f64) -> Result<StoreOutcome> {
        if pattern.len() != self.config.item_dimension {
            return Err(TemporalError::DimensionMismatch {
                expected: self.config.item_dimension,
                actual: pattern.len(),
            });
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(TemporalError::InvalidParameter {
                parameter: "duration".to_string(),
                value: duration,
                reason: "must be positive and finite".to_string(),
            });
        }

        // Habituated fields no longer encode reliably
        if self.gates.mean_level() < HABITUATION_RESET_LEVEL {
            self.reset();
            self.stats.habituation_resets += 1;
        }

        if self.items.len() >= self.config.capacity {
            if self.config.overflow_reset_enabled {
                self.reset();
                self.stats.overflow_resets += 1;
            } else {
                self.stats.items_dropped += 1;
                return Ok(StoreOutcome::Dropped);
            }
        }

        let position = self.next_position;
        let a_init = self.initial_activation(position);

        self.items.push(MemoryItem {
            pattern: pattern.to_vec(),
            position,
            initial_activation: a_init,
            stored_at: self.clock,
        });

        self.field.set_excitatory_at(position, a_init)?;
        self.gates.set_signal_at(position, a_init)?;

        let dt = self.config.time_step;
        let steps = (duration / dt).floor() as usize;
        for step in 0..steps {
            self.field.update(dt);
            if (step + 1) % TRANSMITTER_CADENCE == 0 {
                self.gates.update(dt * TRANSMITTER_CADENCE as f64);
            }
        }

        // One gated re-injection pass closes the encoding episode
        let gated = self.gates.gate(&self.field.activations())?;
        self.field.set_excitatory(&gated)?;
        self.field.update(dt);
        self.gates.clear_signal();

        self.next_position += 1;
        self.clock += duration;
        self.stats.items_stored += 1;

        Ok(StoreOutcome::Stored {
            position,
            initial_activation: a_init,
        })
    }

    /// Store a sequence of patterns, each for `item_duration` seconds.
    pub fn store_sequence(
        &mut self,
        patterns: &[Vec<f64>],
        item_duration: f64,
    ) -> Result<Vec<StoreOutcome>> {
        patterns
            .iter()
            .map(|p| self.store_item(p, item_duration))
            .collect()
    }

    /// Stored patterns, each weighted by its gated activation.
    pub fn temporal_pattern(&self) -> Result<Vec<Vec<f64>>> {
        let gated = self.gated_activations()?;
        Ok(self
            .items
            .iter()
            .map(|item| {
                let mut weight = gated[item.position];
                if self.config.recency_gradient {
                    weight *= self.recency_weights[item.position];
                }
                item.pattern.iter().map(|&v| v * weight).collect()
            })
            .collect())
    }

    /// Superimposed weighted pattern, clamped to `[0, max_activation]`.
    pub fn combined_pattern(&self) -> Result<Vec<f64>> {
        let weighted = self.temporal_pattern()?;
        let mut combined = vec![0.0; self.config.item_dimension];
        for pattern in &weighted {
            for (dst, &v) in combined.iter_mut().zip(pattern) {
                *dst += v;
            }
        }
        for v in combined.iter_mut() {
            *v = v.clamp(0.0, self.config.max_activation);
        }
        Ok(combined)
    }

    /// Normalized difference between early-half and late-half gated
    /// activations; positive values indicate a primacy gradient.
    pub fn primacy_gradient_strength(&self) -> f64 {
        let n = self.items.len();
        if n < 2 {
            return 0.0;
        }
        let gated = match self.gated_activations() {
            Ok(g) => g,
            Err(_) => return 0.0,
        };
        let values: Vec<f64> = self.items.iter().map(|it| gated[it.position]).collect();

        let split = n / 2;
        let early_avg = values[..split].iter().sum::<f64>() / split as f64;
        let late_avg = values[split..].iter().sum::<f64>() / (n - split) as f64;
        (early_avg - late_avg) / (early_avg + late_avg + 1e-9)
    }

    /// Defensive snapshot of the full state.
    pub fn snapshot(&self) -> WorkingMemorySnapshot {
        let activations = self.field.activations();
        let gates = self.gates.gates();
        let gated_activations = activations
            .iter()
            .zip(&gates)
            .map(|(&a, &z)| a * z)
            .collect();
        WorkingMemorySnapshot {
            activations,
            gates,
            gated_activations,
            positions: self.items.iter().map(|it| it.position).collect(),
            primacy_weights: self.primacy_weights.clone(),
            recency_weights: self.recency_weights.clone(),
            item_count: self.items.len(),
            next_position: self.next_position,
            primacy_gradient_strength: self.primacy_gradient_strength(),
        }
    }

    /// Empty the field and return all dynamics to rest.
    pub fn reset(&mut self) {
        self.items.clear();
        self.field.reset();
        self.gates.reset();
        self.next_position = 0;
    }

    fn gated_activations(&self) -> Result<Vec<f64>> {
        Ok(self.gates.gate(&self.field.activations())?)
    }
}
