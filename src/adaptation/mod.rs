//! Low-Rank Adaptation Engine
//!
//! Builds rank-constrained adaptation matrices, validates them, and applies
//! or extracts them against a layer's encoded payload. The transform is
//! `x + (B * A * x) * scaling` over the fixed 256-dimensional payload
//! encoding - a genuine low-rank bottleneck (rank is always much smaller
//! than 256), though no learning occurs.

mod config;
mod engine;
mod weights;

pub use config::{AdaptationConfig, SUPPORTED_RANKS};
pub use engine::{apply, extract, AdaptationRecord, ExtractedWeights, ExtractionMetadata};
pub use weights::{AdaptationWeights, WeightMatrices, WeightStats};
