//! Adaptation Weights
//!
//! The immutable pair of low-rank matrices plus derived scaling. Created
//! once per application event; persisted as pretty JSON so matrices reload
//! byte-for-byte identical.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptation::config::{AdaptationConfig, SUPPORTED_RANKS};
use crate::codec::DATA_DIM;
use crate::error::{ConstelError, Result};
use crate::matrix::Matrix;

/// Elements below this magnitude count as zero for sparsity reporting
const SPARSITY_EPSILON: f64 = 1e-6;

/// Assumed storage width per parameter (f32) for memory reporting
const BYTES_PER_PARAMETER: usize = 4;

/// The A/B matrix pair of a low-rank decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMatrices {
    /// Down-projection: rank x 256
    #[serde(rename = "A")]
    pub a: Matrix,
    /// Up-projection: 256 x rank
    #[serde(rename = "B")]
    pub b: Matrix,
}

/// Immutable rank-r adaptation weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationWeights {
    /// Unique weight id, assigned at creation
    pub id: String,
    /// The config the weights were created from
    pub config: AdaptationConfig,
    /// Low-rank matrix pair
    pub matrices: WeightMatrices,
    /// `alpha / rank`, fixed at creation
    pub scaling: f64,
    /// Creation instant
    pub created_at: DateTime<Utc>,
}

/// Derived statistics for a weight set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStats {
    pub rank: usize,
    /// Total elements across both matrices (`rank * 256 * 2` when valid)
    pub parameter_count: usize,
    /// `parameter_count * 4`, assuming f32 storage
    pub memory_bytes: usize,
    /// Fraction of elements with magnitude below 1e-6
    pub sparsity: f64,
}

impl AdaptationWeights {
    /// Create weights from a config and an explicit randomness source.
    ///
    /// # Errors
    /// Returns [`ConstelError::InvalidConfig`] for an unsupported rank or
    /// non-positive alpha.
    pub fn create(config: AdaptationConfig, rng: &mut impl Rng) -> Result<Self> {
        config.validate()?;

        let matrices = WeightMatrices {
            a: Matrix::random(config.rank, DATA_DIM, rng),
            b: Matrix::random(DATA_DIM, config.rank, rng),
        };

        Ok(Self {
            id: format!("lora-{}", Uuid::new_v4()),
            scaling: config.scaling(),
            config,
            matrices,
            created_at: Utc::now(),
        })
    }

    /// Create weights from an OS-entropy randomness source.
    pub fn generate(config: AdaptationConfig) -> Result<Self> {
        Self::create(config, &mut StdRng::from_entropy())
    }

    /// Create weights from a fixed seed (deterministic).
    pub fn create_seeded(config: AdaptationConfig, seed: u64) -> Result<Self> {
        Self::create(config, &mut StdRng::seed_from_u64(seed))
    }

    /// Validate structure and dimensions against the declared rank.
    ///
    /// # Errors
    /// Returns a descriptive [`ConstelError::InvalidWeights`] on the first
    /// violation; invalid weights are never partially applied.
    pub fn validate(&self) -> Result<()> {
        if self.matrices.a.is_empty() || self.matrices.b.is_empty() {
            return Err(ConstelError::InvalidWeights {
                reason: "missing required matrices".to_string(),
            });
        }

        let rank = self.config.rank;
        if !SUPPORTED_RANKS.contains(&rank) {
            return Err(ConstelError::InvalidWeights {
                reason: format!("unsupported rank: {}", rank),
            });
        }

        if self.matrices.a.rows() != rank {
            return Err(ConstelError::InvalidWeights {
                reason: format!(
                    "matrix A has {} rows, expected rank {}",
                    self.matrices.a.rows(),
                    rank
                ),
            });
        }
        if self.matrices.b.cols() != rank {
            return Err(ConstelError::InvalidWeights {
                reason: format!(
                    "matrix B has {} columns, expected rank {}",
                    self.matrices.b.cols(),
                    rank
                ),
            });
        }

        if self.matrices.a.cols() != DATA_DIM || self.matrices.b.rows() != DATA_DIM {
            return Err(ConstelError::InvalidWeights {
                reason: format!(
                    "matrix inner dimensions {}x{} do not match data dimension {}",
                    self.matrices.a.cols(),
                    self.matrices.b.rows(),
                    DATA_DIM
                ),
            });
        }

        Ok(())
    }

    /// Compute parameter economics for this weight set.
    pub fn stats(&self) -> WeightStats {
        let parameter_count = self.matrices.a.len() + self.matrices.b.len();

        let total = parameter_count;
        let near_zero = self
            .matrices
            .a
            .values()
            .chain(self.matrices.b.values())
            .filter(|v| v.abs() < SPARSITY_EPSILON)
            .count();
        let sparsity = if total == 0 {
            0.0
        } else {
            near_zero as f64 / total as f64
        };

        WeightStats {
            rank: self.config.rank,
            parameter_count,
            memory_bytes: parameter_count * BYTES_PER_PARAMETER,
            sparsity,
        }
    }

    /// Write weights to a pretty-printed JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        log::info!("Saved adaptation weights {} to {}", self.id, path.display());
        Ok(())
    }

    /// Load and validate weights from a JSON file.
    ///
    /// # Errors
    /// I/O and parse errors pass through; structurally broken weights fail
    /// with [`ConstelError::InvalidWeights`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let weights: Self = serde_json::from_str(&content)?;
        weights.validate()?;
        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;
    use test_case::test_case;

    fn seeded(rank: usize) -> AdaptationWeights {
        AdaptationWeights::create_seeded(AdaptationConfig::new(rank), 42).unwrap()
    }

    #[test_case(4)]
    #[test_case(8)]
    #[test_case(16)]
    #[test_case(32)]
    #[test_case(64)]
    fn test_create_shapes_and_scaling(rank: usize) {
        let weights = seeded(rank);
        assert_eq!(weights.matrices.a.rows(), rank);
        assert_eq!(weights.matrices.a.cols(), DATA_DIM);
        assert_eq!(weights.matrices.b.rows(), DATA_DIM);
        assert_eq!(weights.matrices.b.cols(), rank);
        assert_relative_eq!(weights.scaling, 32.0 / rank as f64);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_bad_rank() {
        let err = AdaptationWeights::create_seeded(AdaptationConfig::new(5), 1).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_seeded_creation_is_deterministic() {
        let a = seeded(8);
        let b = seeded(8);
        assert_eq!(a.matrices, b.matrices);
    }

    #[test]
    fn test_validate_rank_mismatch() {
        let mut weights = seeded(16);
        // Declare a different (still supported) rank than the matrices have
        weights.config.rank = 32;
        let err = weights.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_WEIGHTS");
        assert!(err.to_string().contains("matrix A has 16 rows"));
    }

    #[test]
    fn test_validate_missing_matrices() {
        let mut weights = seeded(16);
        weights.matrices.a = Matrix::from_rows(vec![]);
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validate_wrong_inner_dimension() {
        let mut weights = seeded(4);
        weights.matrices.a = Matrix::random(4, 100, &mut StdRng::seed_from_u64(0));
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_stats_rank_16() {
        let stats = seeded(16).stats();
        assert_eq!(stats.parameter_count, 16 * 256 * 2);
        assert_eq!(stats.parameter_count, 8192);
        assert_eq!(stats.memory_bytes, 32768);
        assert_eq!(stats.rank, 16);
        // Random uniform init essentially never lands below 1e-6
        assert!(stats.sparsity < 0.01);
    }

    #[test]
    fn test_stats_sparsity_counts_near_zeros() {
        let mut weights = seeded(4);
        weights.matrices.a = Matrix::from_rows(vec![vec![0.0; DATA_DIM]; 4]);
        let stats = weights.stats();
        let a_elements = 4 * DATA_DIM;
        let total = a_elements + weights.matrices.b.len();
        assert!(stats.sparsity >= a_elements as f64 / total as f64);
    }

    #[test]
    fn test_save_load_round_trip_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.json");

        let weights = seeded(8);
        weights.save(&path).unwrap();
        let loaded = AdaptationWeights::load(&path).unwrap();

        assert_eq!(weights, loaded);
        assert_eq!(weights.matrices, loaded.matrices);
    }

    #[test]
    fn test_load_rejects_invalid_weights() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");

        let mut weights = seeded(8);
        weights.config.rank = 64;
        fs::write(&path, serde_json::to_string_pretty(&weights).unwrap()).unwrap();

        let err = AdaptationWeights::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_WEIGHTS");
    }
}
