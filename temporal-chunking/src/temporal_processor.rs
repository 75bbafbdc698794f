//! Working-memory → masking-field pipeline.

use crate::config::{MaskingFieldConfig, WorkingMemoryConfig};
use crate::error::{Result, TemporalError};
use crate::masking_field::{ListChunk, MaskingField, MaskingFieldState};
use crate::working_memory::{WorkingMemory, WorkingMemorySnapshot};
use serde::{Deserialize, Serialize};

/// Joint result of one temporal-processing tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalResult {
    /// Superimposed gated readout of working memory.
    pub combined_pattern: Vec<f64>,
    /// Working-memory state after the store.
    pub memory: WorkingMemorySnapshot,
    /// Masking-field state after competition.
    pub field: MaskingFieldState,
    /// Number of chunks currently active.
    pub active_chunk_count: usize,
}

/// Coordinates working memory and the masking field: each input is
/// stored, then the combined readout competes for chunk formation.
pub struct TemporalProcessor {
    memory: WorkingMemory,
    field: MaskingField,
    item_duration: f64,
}

impl TemporalProcessor {
    /// Build the pipeline. `item_duration` is the encoding time (s)
    /// given to each stored input.
    pub fn new(
        memory_config: WorkingMemoryConfig,
        field_config: MaskingFieldConfig,
        item_duration: f64,
    ) -> Result<Self> {
        if !item_duration.is_finite() || item_duration <= 0.0 {
            return Err(TemporalError::InvalidParameter {
                parameter: "item_duration".to_string(),
                value: item_duration,
                reason: "must be positive and finite".to_string(),
            });
        }
        Ok(Self {
            memory: WorkingMemory::new(memory_config)?,
            field: MaskingField::new(field_config)?,
            item_duration,
        })
    }

    /// Store one input and run one masking-field tick over the
    /// combined working-memory readout.
    pub fn process(&mut self, input: &[f64]) -> Result<TemporalResult> {
        self.memory.store_item(input, self.item_duration)?;
        let combined = self.memory.combined_pattern()?;

        let dt = self.field.config().integration_time_step;
        let field_state = self.field.update(&combined, dt)?;

        Ok(TemporalResult {
            combined_pattern: combined,
            memory: self.memory.snapshot(),
            field: field_state,
            active_chunk_count: self.field.active_chunks().len(),
        })
    }

    /// Process a whole sequence, returning the per-item results.
    pub fn process_sequence(&mut self, inputs: &[Vec<f64>]) -> Result<Vec<TemporalResult>> {
        inputs.iter().map(|input| self.process(input)).collect()
    }

    /// The working memory.
    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    /// The masking field.
    pub fn field(&self) -> &MaskingField {
        &self.field
    }

    /// Chunks currently active in the masking field.
    pub fn active_chunks(&self) -> Vec<&ListChunk> {
        self.field.active_chunks()
    }

    /// Reset both stages.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.field.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> TemporalProcessor {
        TemporalProcessor::new(
            WorkingMemoryConfig::new(5, 10).unwrap(),
            MaskingFieldConfig::default(),
            0.05,
        )
        .unwrap()
    }

    fn basis(dim: usize, index: usize) -> Vec<f64> {
        let mut v = vec![0.0; dim];
        v[index] = 1.0;
        v
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let result = TemporalProcessor::new(
            WorkingMemoryConfig::default(),
            MaskingFieldConfig::default(),
            0.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_process_stores_and_competes() {
        let mut tp = processor();
        let result = tp.process(&basis(10, 0)).unwrap();

        assert_eq!(result.memory.item_count, 1);
        assert_eq!(result.combined_pattern.len(), 10);
        assert!(result.combined_pattern[0] > 0.0);
        assert_eq!(result.combined_pattern[5], 0.0);
    }

    #[test]
    fn test_sequence_builds_primacy_gradient() {
        let mut tp = processor();
        let inputs: Vec<Vec<f64>> = (0..5).map(|i| basis(10, i)).collect();
        let results = tp.process_sequence(&inputs).unwrap();

        assert_eq!(results.len(), 5);
        let last = results.last().unwrap();
        assert_eq!(last.memory.item_count, 5);
        assert!(last.memory.primacy_gradient_strength > 0.0);
    }

    #[test]
    fn test_reset_clears_both_stages() {
        let mut tp = processor();
        tp.process(&basis(10, 0)).unwrap();
        tp.reset();

        assert!(tp.memory().is_empty());
        assert!(tp.field().nodes().is_empty());
        assert!(tp.active_chunks().is_empty());
    }
}
