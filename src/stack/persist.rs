//! Stack Persistence
//!
//! JSON import/export of a stack in the format shared with the external
//! import/export collaborator. Binary image artifacts are never written;
//! a re-import regenerates them from `data` via the QR collaborator, so the
//! file carries only JSON-safe fields.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptation::AdaptationRecord;
use crate::error::{ConstelError, Result};
use crate::stack::layer::{estimate_symbol_version, Layer, PlainLayer, RenderOptions};
use crate::stack::store::Stack;

const STACK_TYPE: &str = "constellation";
const PAYLOAD_ENCODING: &str = "UTF-8";

/// On-disk stack document
#[derive(Debug, Serialize, Deserialize)]
struct StackFile {
    id: String,
    layers: Vec<LayerRecord>,
    /// Epoch milliseconds
    timestamp: i64,
    metadata: StackMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct StackMetadata {
    #[serde(rename = "totalLayers")]
    total_layers: usize,
    #[serde(rename = "stackType")]
    stack_type: String,
}

/// One serialized layer; the image buffer is intentionally absent
#[derive(Debug, Serialize, Deserialize)]
struct LayerRecord {
    id: String,
    data: String,
    options: RenderOptions,
    /// Epoch milliseconds
    timestamp: i64,
    /// Rendered symbol width, duplicated from options
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    opacity: Option<f64>,
    #[serde(rename = "zIndex")]
    z_index: usize,
    metadata: LayerMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    lora: Option<AdaptationRecord>,
    #[serde(rename = "encodedData", skip_serializing_if = "Option::is_none")]
    encoded_data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LayerMetadata {
    encoding: String,
    version: u32,
    #[serde(rename = "errorCorrectionLevel")]
    error_correction_level: String,
}

fn layer_record(layer: &Layer) -> LayerRecord {
    let plain = layer.plain();
    LayerRecord {
        id: plain.id.clone(),
        data: plain.payload.clone(),
        options: plain.options.clone(),
        timestamp: plain.created_at.timestamp_millis(),
        size: plain.options.width,
        opacity: plain.opacity,
        z_index: plain.order_index,
        metadata: LayerMetadata {
            encoding: PAYLOAD_ENCODING.to_string(),
            version: estimate_symbol_version(&plain.payload),
            error_correction_level: plain.options.error_correction_level.clone(),
        },
        lora: layer.adaptation().cloned(),
        encoded_data: layer.encoded_data().map(str::to_string),
    }
}

fn stack_file(stack: &Stack) -> StackFile {
    StackFile {
        id: stack.id.clone(),
        layers: stack.layers().iter().map(layer_record).collect(),
        timestamp: stack.created_at.timestamp_millis(),
        metadata: StackMetadata {
            total_layers: stack.len(),
            stack_type: STACK_TYPE.to_string(),
        },
    }
}

/// Serialize a stack to the export document as a JSON value.
pub fn stack_to_value(stack: &Stack) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(stack_file(stack))?)
}

/// Write a stack to a pretty-printed JSON file.
pub fn export_stack(stack: &Stack, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&stack_file(stack))?;
    fs::write(path, content)?;
    log::info!(
        "Exported stack {} ({} layers) to {}",
        stack.id,
        stack.len(),
        path.display()
    );
    Ok(())
}

fn millis_to_utc(millis: i64) -> Result<chrono::DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| ConstelError::InvalidInput {
            reason: format!("timestamp out of range: {}", millis),
        })
}

fn rebuild_layer(record: LayerRecord) -> Result<Layer> {
    let base = PlainLayer {
        id: record.id,
        payload: record.data,
        order_index: record.z_index,
        opacity: record.opacity,
        options: record.options,
        created_at: millis_to_utc(record.timestamp)?,
    };

    match record.lora {
        None => Ok(Layer::Plain(base)),
        Some(adaptation) => {
            // A persisted record must still hold coherent weights
            adaptation.weights.validate()?;
            let encoded_data =
                record
                    .encoded_data
                    .ok_or_else(|| ConstelError::InvalidInput {
                        reason: format!("adapted layer {} is missing encodedData", base.id),
                    })?;
            Ok(Layer::Adapted {
                base,
                adaptation,
                encoded_data,
            })
        }
    }
}

/// Read a stack back from a JSON file.
///
/// Layer ids are re-checked for uniqueness and any persisted adaptation
/// weights are re-validated. Image artifacts are not restored here; the
/// QR collaborator regenerates them from each layer's `data`.
pub fn import_stack(path: &Path) -> Result<Stack> {
    let content = fs::read_to_string(path)?;
    let file: StackFile = serde_json::from_str(&content)?;

    let mut stack = Stack::with_id(file.id);
    stack.created_at = millis_to_utc(file.timestamp)?;

    for record in file.layers {
        stack.push(rebuild_layer(record)?)?;
    }

    log::info!(
        "Imported stack {} ({} layers) from {}",
        stack.id,
        stack.len(),
        path.display()
    );
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptation::{self, AdaptationConfig, AdaptationWeights};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_stack() -> Stack {
        Stack::from_payloads(
            ["https://example.com/a", "second layer", "third"],
            RenderOptions::default(),
        )
    }

    #[test]
    fn test_export_document_shape() {
        let stack = sample_stack();
        let value = stack_to_value(&stack).unwrap();

        assert_eq!(value["metadata"]["totalLayers"], 3);
        assert_eq!(value["metadata"]["stackType"], "constellation");
        assert_eq!(value["layers"].as_array().unwrap().len(), 3);

        let first = &value["layers"][0];
        assert_eq!(first["data"], "https://example.com/a");
        assert_eq!(first["size"], 256);
        assert_eq!(first["zIndex"], 0);
        assert_eq!(first["metadata"]["encoding"], "UTF-8");
        assert_eq!(first["metadata"]["version"], 1);
        assert_eq!(first["metadata"]["errorCorrectionLevel"], "M");
        // No binary artifact is ever written
        assert!(first.get("buffer").is_none());
        assert!(first.get("lora").is_none());
    }

    #[test]
    fn test_round_trip_plain_stack() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stack.json");

        let stack = sample_stack();
        export_stack(&stack, &path).unwrap();
        let imported = import_stack(&path).unwrap();

        assert_eq!(imported.id, stack.id);
        assert_eq!(imported.len(), stack.len());
        for (a, b) in stack.layers().iter().zip(imported.layers()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.payload(), b.payload());
            assert_eq!(a.order_index(), b.order_index());
            assert_eq!(a.opacity(), b.opacity());
        }
    }

    #[test]
    fn test_round_trip_adapted_layer_preserves_matrices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("adapted.json");

        let mut stack = sample_stack();
        let weights =
            AdaptationWeights::create_seeded(AdaptationConfig::new(8), 42).unwrap();
        let target = stack.layers()[1].clone();
        let adapted = adaptation::apply(&target, &weights).unwrap();
        stack.replace(adapted.clone()).unwrap();

        export_stack(&stack, &path).unwrap();
        let imported = import_stack(&path).unwrap();

        let restored = imported.get(target.id()).unwrap();
        assert!(restored.is_adapted());
        assert_eq!(restored.encoded_data(), adapted.encoded_data());
        // Matrices survive the textual round trip numerically identical
        assert_eq!(
            restored.adaptation().unwrap().weights.matrices,
            weights.matrices
        );
    }

    #[test]
    fn test_import_rejects_duplicate_layer_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.json");

        let stack = sample_stack();
        let mut value = stack_to_value(&stack).unwrap();
        let first = value["layers"][0].clone();
        value["layers"][1] = first;
        fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = import_stack(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_import_rejects_malformed_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"id": "x", "layers": "not an array"}"#).unwrap();

        let err = import_stack(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_export_empty_stack() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");

        let stack = Stack::new();
        export_stack(&stack, &path).unwrap();
        let imported = import_stack(&path).unwrap();
        assert!(imported.is_empty());
    }
}
