//! Adaptation Configuration
//!
//! Rank and scaling parameters for weight creation. The rank allow-list
//! keeps the adaptation a real bottleneck against the 256-wide encoding.

use serde::{Deserialize, Serialize};

use crate::error::{ConstelError, Result};

/// Ranks accepted for adaptation matrices
pub const SUPPORTED_RANKS: [usize; 5] = [4, 8, 16, 32, 64];

const DEFAULT_RANK: usize = 16;
const DEFAULT_ALPHA: f64 = 32.0;
const DEFAULT_DROPOUT: f64 = 0.1;

/// Configuration for creating adaptation weights
///
/// `dropout` is carried for persistence parity with existing weight files
/// but is never applied - the transform is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationConfig {
    /// Bottleneck dimension; must be one of [`SUPPORTED_RANKS`]
    pub rank: usize,
    /// Scaling numerator; `scaling = alpha / rank`
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Unused, persisted for format compatibility
    #[serde(default = "default_dropout")]
    pub dropout: f64,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_dropout() -> f64 {
    DEFAULT_DROPOUT
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        Self {
            rank: DEFAULT_RANK,
            alpha: DEFAULT_ALPHA,
            dropout: DEFAULT_DROPOUT,
        }
    }
}

impl AdaptationConfig {
    /// Create a config with the given rank and default alpha
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            ..Self::default()
        }
    }

    /// Validate rank and alpha
    ///
    /// # Errors
    /// Returns [`ConstelError::InvalidConfig`] when the rank is outside the
    /// allow-list or alpha is not positive.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_RANKS.contains(&self.rank) {
            return Err(ConstelError::InvalidConfig {
                reason: format!(
                    "unsupported rank: {} (supported: {:?})",
                    self.rank, SUPPORTED_RANKS
                ),
            });
        }
        if !(self.alpha > 0.0) {
            return Err(ConstelError::InvalidConfig {
                reason: format!("alpha must be positive, got {}", self.alpha),
            });
        }
        Ok(())
    }

    /// The scaling factor applied to the low-rank delta
    pub fn scaling(&self) -> f64 {
        self.alpha / self.rank as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(4)]
    #[test_case(8)]
    #[test_case(16)]
    #[test_case(32)]
    #[test_case(64)]
    fn test_supported_ranks_validate(rank: usize) {
        assert!(AdaptationConfig::new(rank).validate().is_ok());
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(7)]
    #[test_case(128)]
    fn test_unsupported_ranks_rejected(rank: usize) {
        let err = AdaptationConfig::new(rank).validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_default_config() {
        let config = AdaptationConfig::default();
        assert_eq!(config.rank, 16);
        assert_relative_eq!(config.alpha, 32.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scaling_is_alpha_over_rank() {
        for rank in SUPPORTED_RANKS {
            let config = AdaptationConfig::new(rank);
            assert_relative_eq!(config.scaling(), 32.0 / rank as f64);
        }

        let config = AdaptationConfig {
            rank: 8,
            alpha: 16.0,
            ..Default::default()
        };
        assert_relative_eq!(config.scaling(), 2.0);
    }

    #[test]
    fn test_non_positive_alpha_rejected() {
        for alpha in [0.0, -1.0, f64::NAN] {
            let config = AdaptationConfig {
                rank: 16,
                alpha,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_alpha_defaults_when_absent_from_json() {
        let config: AdaptationConfig = serde_json::from_str(r#"{"rank": 8}"#).unwrap();
        assert_relative_eq!(config.alpha, 32.0);
        assert_relative_eq!(config.scaling(), 4.0);
    }
}
