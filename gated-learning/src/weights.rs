//! Bounded synaptic weight matrices.
//!
//! Rows index post-synaptic units, columns pre-synaptic units. The
//! shape is frozen at construction and every write path clamps into
//! `[w_min, w_max]`, so the bound invariant cannot be violated by any
//! update rule.

use crate::error::{LearningError, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Rectangular weight table with hard bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMatrix {
    weights: Array2<f64>,
    w_min: f64,
    w_max: f64,
}

impl WeightMatrix {
    /// Create a matrix with every entry at the in-bounds value closest
    /// to zero.
    pub fn new(rows: usize, cols: usize, w_min: f64, w_max: f64) -> Result<Self> {
        Self::validate(rows, cols, w_min, w_max)?;
        let initial = 0.0f64.clamp(w_min, w_max);
        Ok(Self {
            weights: Array2::from_elem((rows, cols), initial),
            w_min,
            w_max,
        })
    }

    /// Create a matrix with seeded uniform random entries in
    /// `[w_min, w_max)`. The same seed always produces the same matrix.
    pub fn random(rows: usize, cols: usize, w_min: f64, w_max: f64, seed: u64) -> Result<Self> {
        Self::validate(rows, cols, w_min, w_max)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new(w_min, w_max);
        let weights = Array2::from_shape_fn((rows, cols), |_| dist.sample(&mut rng));
        Ok(Self {
            weights,
            w_min,
            w_max,
        })
    }

    fn validate(rows: usize, cols: usize, w_min: f64, w_max: f64) -> Result<()> {
        if rows == 0 || cols == 0 {
            return Err(LearningError::InvalidParameter {
                parameter: "shape".to_string(),
                value: (rows.min(cols)) as f64,
                reason: "rows and cols must be at least 1".to_string(),
            });
        }
        if !w_min.is_finite() || !w_max.is_finite() || w_min >= w_max {
            return Err(LearningError::InvalidParameter {
                parameter: "bounds".to_string(),
                value: w_min,
                reason: "w_min must be finite and below w_max".to_string(),
            });
        }
        Ok(())
    }

    /// Number of post-synaptic rows.
    pub fn rows(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of pre-synaptic columns.
    pub fn cols(&self) -> usize {
        self.weights.ncols()
    }

    /// Weight bounds `(w_min, w_max)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.w_min, self.w_max)
    }

    /// Read one entry.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.weights[(row, col)])
    }

    /// Write one entry, clamped into bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        self.weights[(row, col)] = value.clamp(self.w_min, self.w_max);
        Ok(())
    }

    /// Add `delta` to one entry, clamped into bounds.
    pub fn apply_delta(&mut self, row: usize, col: usize, delta: f64) -> Result<()> {
        self.check_index(row, col)?;
        let current = self.weights[(row, col)];
        self.weights[(row, col)] = (current + delta).clamp(self.w_min, self.w_max);
        Ok(())
    }

    /// Borrow the underlying table.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Defensive copy of the underlying table.
    pub fn snapshot(&self) -> Array2<f64> {
        self.weights.clone()
    }

    /// One post-synaptic row as a vector.
    pub fn row(&self, row: usize) -> Result<Vec<f64>> {
        if row >= self.rows() {
            return Err(LearningError::InvalidIndex {
                row,
                col: 0,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.weights.row(row).to_vec())
    }

    /// Mutate every entry in place through `f`, clamping the results.
    pub(crate) fn update_entries<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, f64) -> f64,
    {
        let (w_min, w_max) = (self.w_min, self.w_max);
        for ((i, j), w) in self.weights.indexed_iter_mut() {
            *w = f(i, j, *w).clamp(w_min, w_max);
        }
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(LearningError::InvalidIndex {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(())
    }
}
