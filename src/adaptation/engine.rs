//! Apply / Extract Operations
//!
//! Applying weights to a layer is value-producing: the input layer is never
//! mutated, and the result is a new adapted layer carrying its own record.
//! Extraction recovers the record from an adapted layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptation::config::AdaptationConfig;
use crate::adaptation::weights::AdaptationWeights;
use crate::codec;
use crate::error::{ConstelError, Result};
use crate::stack::Layer;

/// The adaptation state attached to an adapted layer
///
/// Once attached, `applied` is permanently true for that layer value;
/// re-applying produces a new layer, never an in-place change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationRecord {
    /// Id of the weight set that was applied
    pub id: String,
    /// The full weight set, so layers survive persistence round trips
    pub weights: AdaptationWeights,
    /// Config snapshot at application time
    pub config: AdaptationConfig,
    /// Always true on a live record
    pub applied: bool,
    /// Application instant
    pub timestamp: DateTime<Utc>,
}

/// Result of extracting weights from an adapted layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedWeights {
    pub weights: AdaptationWeights,
    pub config: AdaptationConfig,
    pub metadata: ExtractionMetadata,
}

/// Provenance for an extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Id of the layer the weights came from
    pub extracted_from: String,
    /// When the weights were originally applied
    pub original_timestamp: DateTime<Utc>,
    /// When the extraction happened
    pub extracted_at: DateTime<Utc>,
}

/// Apply adaptation weights to a layer, producing a new adapted layer.
///
/// The transform over the encoded payload `v` is
/// `enhanced[i] = v[i] + (B * A * v)[i] * scaling`, re-encoded to text via
/// the codec. Applying to an already-adapted layer re-adapts its base
/// payload.
///
/// # Errors
/// Returns [`ConstelError::InvalidWeights`] when validation fails; the
/// layer is untouched in that case.
pub fn apply(layer: &Layer, weights: &AdaptationWeights) -> Result<Layer> {
    weights.validate()?;

    let base = layer.plain().clone();

    let v = codec::encode(&base.payload);
    let mid = weights.matrices.a.mat_vec(&v);
    let delta = weights.matrices.b.mat_vec(&mid);
    let enhanced: Vec<f64> = v
        .iter()
        .zip(delta.iter())
        .map(|(x, d)| x + d * weights.scaling)
        .collect();
    let encoded_data = codec::decode(&enhanced);

    log::debug!(
        "Applied weights {} (rank {}) to layer {}",
        weights.id,
        weights.config.rank,
        base.id
    );

    Ok(Layer::Adapted {
        adaptation: AdaptationRecord {
            id: weights.id.clone(),
            weights: weights.clone(),
            config: weights.config.clone(),
            applied: true,
            timestamp: Utc::now(),
        },
        encoded_data,
        base,
    })
}

/// Extract the weights and provenance from an adapted layer.
///
/// # Errors
/// Returns [`ConstelError::NoAdaptation`] for a plain layer.
pub fn extract(layer: &Layer) -> Result<ExtractedWeights> {
    match layer {
        Layer::Plain(plain) => Err(ConstelError::NoAdaptation {
            layer_id: plain.id.clone(),
        }),
        Layer::Adapted {
            base, adaptation, ..
        } => Ok(ExtractedWeights {
            weights: adaptation.weights.clone(),
            config: adaptation.config.clone(),
            metadata: ExtractionMetadata {
                extracted_from: base.id.clone(),
                original_timestamp: adaptation.timestamp,
                extracted_at: Utc::now(),
            },
        }),
    }
}
