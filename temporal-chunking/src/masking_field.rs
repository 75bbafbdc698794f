//! Masking field: item-node competition and list-chunk formation.
//!
//! Input patterns recruit item nodes through fuzzy prototype matching;
//! item activations then compete under a Mexican-hat shunting kernel.
//! Winner sets that form a coherent position sequence are committed as
//! immutable list chunks, which decay exponentially while the active
//! chunk receives a reactivation drive.

use crate::coherence::{CoherencePolicy, PositionalGapPolicy};
use crate::config::MaskingFieldConfig;
use crate::error::{Result, TemporalError};
use serde::{Deserialize, Serialize};
use shunting_core::{ShuntingDynamics, ShuntingParams};

/// Inputs with no component above this level skip the match/learn step.
const SILENT_INPUT_LEVEL: f64 = 1e-9;

/// Chunk activations below this level no longer count as active.
const CHUNK_ACTIVE_LEVEL: f64 = 1e-3;

/// A recruited prototype with its competition bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemNode {
    prototype: Vec<f64>,
    strength: f64,
    position: usize,
    created_at: f64,
}

impl ItemNode {
    /// Prototype pattern this node responds to.
    pub fn prototype(&self) -> &[f64] {
        &self.prototype
    }

    /// Accumulated match strength.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Insertion position (never reused after pruning).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Simulation time (s) at which the node was recruited.
    pub fn created_at(&self) -> f64 {
        self.created_at
    }
}

/// An immutable winner grouping committed at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChunk {
    id: usize,
    members: Vec<ItemNode>,
    formed_at: f64,
}

impl ListChunk {
    /// Chunk identifier, unique within one masking field.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member item nodes in position order, frozen at formation time.
    pub fn members(&self) -> &[ItemNode] {
        &self.members
    }

    /// Simulation time (s) at which the chunk was committed.
    pub fn formed_at(&self) -> f64 {
        self.formed_at
    }
}

/// Defensive snapshot of the masking-field state after an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingFieldState {
    pub item_activations: Vec<f64>,
    pub chunk_activations: Vec<f64>,
    pub winners: Vec<usize>,
    pub active_item_count: usize,
    pub chunk_count: usize,
    pub chunk_formed: bool,
}

/// Cumulative masking-field counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskingFieldStats {
    pub nodes_recruited: u64,
    pub nodes_pruned: u64,
    pub chunks_formed: u64,
    pub chunks_skipped_at_capacity: u64,
    pub updates: u64,
}

/// Competitive field over item nodes with list-chunk formation.
pub struct MaskingField {
    config: MaskingFieldConfig,
    nodes: Vec<ItemNode>,
    field: ShuntingDynamics,
    chunks: Vec<ListChunk>,
    chunk_activations: Vec<f64>,
    active_chunk: Option<usize>,
    winners: Vec<usize>,
    coherence: Box<dyn CoherencePolicy>,
    dimension: Option<usize>,
    clock: f64,
    last_chunk_time: f64,
    next_chunk_id: usize,
    next_position: usize,
    stats: MaskingFieldStats,
}

impl MaskingField {
    /// Create an empty masking field with the default gap-based
    /// coherence policy.
    pub fn new(config: MaskingFieldConfig) -> Result<Self> {
        let policy = PositionalGapPolicy::new(config.max_temporal_gap);
        Self::with_coherence_policy(config, Box::new(policy))
    }

    /// Create a masking field with a caller-supplied coherence policy.
    pub fn with_coherence_policy(
        config: MaskingFieldConfig,
        coherence: Box<dyn CoherencePolicy>,
    ) -> Result<Self> {
        config.validate()?;

        let field_params = ShuntingParams::new(config.item_decay_rate, 1.0, 0.0)?
            .with_self_excitation(config.self_excitation)?
            .with_lateral(
                config.excitation_range,
                0.5 * config.competition_strength,
                config.inhibition_range,
                config.competition_strength,
            )?;
        let field = ShuntingDynamics::new(config.max_item_nodes, field_params)?;

        let max_chunks = config.max_chunks;
        Ok(Self {
            config,
            nodes: Vec::new(),
            field,
            chunks: Vec::new(),
            chunk_activations: vec![0.0; max_chunks],
            active_chunk: None,
            winners: Vec::new(),
            coherence,
            dimension: None,
            clock: 0.0,
            last_chunk_time: f64::NEG_INFINITY,
            next_chunk_id: 0,
            next_position: 0,
            stats: MaskingFieldStats::default(),
        })
    }

    /// Field configuration.
    pub fn config(&self) -> &MaskingFieldConfig {
        &self.config
    }

    /// Live item nodes in slot order.
    pub fn nodes(&self) -> &[ItemNode] {
        &self.nodes
    }

    /// All committed chunks, oldest first.
    pub fn chunks(&self) -> &[ListChunk] {
        &self.chunks
    }

    /// Chunks whose activation is still above the active level.
    pub fn active_chunks(&self) -> Vec<&ListChunk> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(i, _)| self.chunk_activations[*i] > CHUNK_ACTIVE_LEVEL)
            .map(|(_, c)| c)
            .collect()
    }

    /// Cumulative counters.
    pub fn statistics(&self) -> MaskingFieldStats {
        self.stats.clone()
    }

    /// Fuzzy prototype match: normalized overlap of the rectified
    /// patterns. Scale-invariant, 1.0 for identical directions.
    fn fuzzy_match(input: &[f64], prototype: &[f64]) -> f64 {
        let mut dot = 0.0;
        let mut norm_input = 0.0;
        let mut norm_proto = 0.0;
        for (&a, &b) in input.iter().zip(prototype) {
            let a = a.max(0.0);
            let b = b.max(0.0);
            dot += a * b;
            norm_input += a * a;
            norm_proto += b * b;
        }
        dot / (norm_input.sqrt() * norm_proto.sqrt() + 1e-9)
    }

    /// One masking-field tick: match/learn, compete, pick winners,
    /// possibly commit a chunk, decay chunk activations.
    pub fn update(&mut self, input: &[f64], dt: f64) -> Result<MaskingFieldState> {
        if let Some(dim) = self.dimension {
            if input.len() != dim {
                return Err(TemporalError::DimensionMismatch {
                    expected: dim,
                    actual: input.len(),
                });
            }
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TemporalError::InvalidParameter {
                parameter: "dt".to_string(),
                value: dt,
                reason: "must be positive and finite".to_string(),
            });
        }

        let mut activations = self.field.activations();

        // 1. Match or recruit
        let silent = input.iter().all(|&v| v <= SILENT_INPUT_LEVEL);
        if !silent {
            self.dimension.get_or_insert(input.len());
            match self.find_match(input) {
                Some(slot) => {
                    self.nodes[slot].strength += self.config.learning_rate;
                    activations[slot] =
                        (activations[slot] + self.config.activation_boost).min(1.0);
                }
                None => {
                    let slot = self.recruit(input, &mut activations);
                    activations[slot] = self.config.initial_activation.min(1.0);
                }
            }
        }

        // 2. Spatial competition under the Mexican-hat kernel
        self.field.load_state(&activations)?;
        self.field.set_excitatory(&activations)?;
        self.field.update(dt);
        let mut activations = self.field.activations();
        if self.config.normalization_enabled {
            let max = activations.iter().cloned().fold(0.0f64, f64::max);
            for a in activations.iter_mut() {
                *a /= max + 0.1;
            }
            self.field.load_state(&activations)?;
        }

        // 3. Winners
        self.winners = (0..self.nodes.len())
            .filter(|&i| activations[i] > self.config.winner_threshold)
            .collect();

        // 4. Chunk formation
        let chunk_formed = self.try_form_chunk(&mut activations)?;

        // 5. Chunk decay and reactivation
        let decay = (-self.config.chunk_decay_rate * dt).exp();
        for (i, act) in self.chunk_activations.iter_mut().enumerate() {
            *act *= decay;
            if Some(i) == self.active_chunk {
                *act += self.config.active_chunk_boost * dt;
            }
            *act = act.clamp(0.0, 1.0);
        }

        self.clock += dt;
        self.stats.updates += 1;

        Ok(MaskingFieldState {
            item_activations: activations,
            chunk_activations: self.chunk_activations.clone(),
            winners: self.winners.clone(),
            active_item_count: self.nodes.len(),
            chunk_count: self.chunks.len(),
            chunk_formed,
        })
    }

    fn find_match(&self, input: &[f64]) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| Self::fuzzy_match(input, &node.prototype) >= self.config.matching_threshold)
    }

    /// Recruit a node for `input`, pruning the weakest at capacity.
    /// Returns the slot the new node occupies.
    fn recruit(&mut self, input: &[f64], activations: &mut [f64]) -> usize {
        if self.nodes.len() >= self.config.max_item_nodes {
            let weakest = self
                .nodes
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.strength.total_cmp(&b.strength))
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.nodes.remove(weakest);
            // Shift the activation slots above the vacated one down
            for i in weakest..self.nodes.len() {
                activations[i] = activations[i + 1];
            }
            activations[self.nodes.len()] = 0.0;
            self.stats.nodes_pruned += 1;
        }

        let position = self.next_position;
        self.next_position += 1;
        self.nodes.push(ItemNode {
            prototype: input.to_vec(),
            strength: 1.0,
            position,
            created_at: self.clock,
        });
        self.stats.nodes_recruited += 1;
        self.nodes.len() - 1
    }

    fn try_form_chunk(&mut self, activations: &mut [f64]) -> Result<bool> {
        if self.winners.is_empty() {
            return Ok(false);
        }

        // The size floor saturates at the live node count so a sparse
        // field can still commit over everything it holds
        let effective_min = self.config.min_chunk_size.min(self.nodes.len().max(1));
        if self.winners.len() < effective_min {
            return Ok(false);
        }

        let positions: Vec<usize> = self.winners.iter().map(|&i| self.nodes[i].position).collect();
        if !self.coherence.coherent(&positions) {
            return Ok(false);
        }

        if self.clock - self.last_chunk_time < self.config.min_chunk_interval {
            return Ok(false);
        }

        if self.chunks.len() >= self.config.max_chunks {
            self.stats.chunks_skipped_at_capacity += 1;
            return Ok(false);
        }

        // Keep the strongest members when the winner set exceeds the
        // chunk size bound
        let mut member_slots = self.winners.clone();
        if member_slots.len() > self.config.max_chunk_size {
            member_slots.sort_by(|&a, &b| activations[b].total_cmp(&activations[a]));
            member_slots.truncate(self.config.max_chunk_size);
        }
        let mut members: Vec<ItemNode> =
            member_slots.iter().map(|&i| self.nodes[i].clone()).collect();
        members.sort_by_key(|node| node.position);

        let chunk_index = self.chunks.len();
        self.chunks.push(ListChunk {
            id: self.next_chunk_id,
            members,
            formed_at: self.clock,
        });
        self.next_chunk_id += 1;
        self.chunk_activations[chunk_index] = 1.0;
        self.active_chunk = Some(chunk_index);
        self.last_chunk_time = self.clock;
        self.stats.chunks_formed += 1;

        if self.config.reset_after_chunk {
            for a in activations.iter_mut() {
                *a *= self.config.reset_decay_factor;
            }
            self.field.load_state(activations)?;
            self.winners.clear();
        }

        Ok(true)
    }

    /// Clear all nodes, chunks and dynamics.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.chunks.clear();
        self.field.reset();
        self.chunk_activations.fill(0.0);
        self.active_chunk = None;
        self.winners.clear();
        self.dimension = None;
        self.clock = 0.0;
        self.last_chunk_time = f64::NEG_INFINITY;
        self.next_position = 0;
    }
}
