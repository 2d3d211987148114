//! Dense Matrix Primitives
//!
//! Row-major `f64` matrices with the small set of operations the adaptation
//! engine needs: random initialization, matrix-vector product, and element
//! statistics. Randomness is always injected so callers control determinism.
//!
//! Matrices serialize as nested numeric arrays; serde_json's float
//! formatting round-trips `f64` exactly, so persisted weights reload
//! numerically identical.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Dense row-major matrix over `f64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Build a matrix from explicit rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Create a randomly initialized matrix.
    ///
    /// Each element is drawn as `(r - 0.5) * 2 / sqrt(cols)` with `r`
    /// uniform in [0, 1) - Xavier-style scaling by column count so the
    /// low-rank product stays small relative to the unit-normalized input.
    pub fn random(rows: usize, cols: usize, rng: &mut impl Rng) -> Self {
        let scale = 2.0 / (cols as f64).sqrt();
        let rows = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| (rng.gen::<f64>() - 0.5) * scale)
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (0 for an empty matrix)
    pub fn cols(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// True if the matrix has no elements
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    /// Element at (row, col), if present
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Iterate over all elements in row-major order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Standard dense matrix-vector product.
    ///
    /// Vector elements beyond the column count are ignored; missing
    /// elements are treated as 0. Never panics on short vectors.
    pub fn mat_vec(&self, vector: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, a)| a * vector.get(j).copied().unwrap_or(0.0))
                    .sum()
            })
            .collect()
    }

    /// Population variance over all elements (0 for an empty matrix)
    pub fn variance(&self) -> f64 {
        let n = self.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.values().sum::<f64>() / n as f64;
        self.values().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64
    }
}
