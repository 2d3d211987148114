//! Layer Model
//!
//! A layer is one QR-encodable text payload plus its visual metadata within
//! a stack. Whether a layer carries an adaptation is an explicit variant,
//! checked by pattern match rather than a field-existence probe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptation::AdaptationRecord;

/// Dark/light module colors for the external QR renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub dark: String,
    pub light: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            dark: "#000000".to_string(),
            light: "#FFFFFF".to_string(),
        }
    }
}

/// Rendering options passed through to the external QR collaborator
///
/// The core never inspects pixel data; these ride along so a re-import can
/// regenerate the image artifact from the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: u32,
    pub margin: u32,
    pub color: ColorScheme,
    #[serde(rename = "errorCorrectionLevel")]
    pub error_correction_level: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 256,
            margin: 2,
            color: ColorScheme::default(),
            error_correction_level: "M".to_string(),
        }
    }
}

/// A layer with no adaptation applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainLayer {
    /// Opaque unique id, assigned at creation, immutable
    pub id: String,
    /// Source text that was encoded; immutable once created
    pub payload: String,
    /// 0-based position within the owning stack
    pub order_index: usize,
    /// Explicit opacity; derived from `order_index` when absent
    pub opacity: Option<f64>,
    /// Options for the external QR renderer
    pub options: RenderOptions,
    /// Creation instant
    pub created_at: DateTime<Utc>,
}

impl PlainLayer {
    /// Create a layer with a fresh id. The order index is assigned when the
    /// layer joins a stack.
    pub fn new(payload: impl Into<String>, options: RenderOptions) -> Self {
        Self {
            id: format!("qr-{}", Uuid::new_v4()),
            payload: payload.into(),
            order_index: 0,
            opacity: None,
            options,
            created_at: Utc::now(),
        }
    }
}

/// One visual unit in a stack
///
/// Adaptation state is a variant, not a nullable field: re-applying weights
/// produces a new `Adapted` value and never mutates the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    /// No adaptation applied
    Plain(PlainLayer),
    /// Adaptation applied over `base`; `encoded_data` is the re-encoded
    /// perturbed payload vector
    Adapted {
        base: PlainLayer,
        adaptation: AdaptationRecord,
        encoded_data: String,
    },
}

impl Layer {
    /// The underlying plain layer (the base for adapted layers)
    pub fn plain(&self) -> &PlainLayer {
        match self {
            Layer::Plain(plain) => plain,
            Layer::Adapted { base, .. } => base,
        }
    }

    fn plain_mut(&mut self) -> &mut PlainLayer {
        match self {
            Layer::Plain(plain) => plain,
            Layer::Adapted { base, .. } => base,
        }
    }

    /// Layer id
    pub fn id(&self) -> &str {
        &self.plain().id
    }

    /// Original source payload
    pub fn payload(&self) -> &str {
        &self.plain().payload
    }

    /// Position within the owning stack
    pub fn order_index(&self) -> usize {
        self.plain().order_index
    }

    pub(crate) fn set_order_index(&mut self, index: usize) {
        self.plain_mut().order_index = index;
    }

    /// Explicit opacity, if set
    pub fn opacity(&self) -> Option<f64> {
        self.plain().opacity
    }

    /// Renderer options
    pub fn options(&self) -> &RenderOptions {
        &self.plain().options
    }

    /// True for adapted layers
    pub fn is_adapted(&self) -> bool {
        matches!(self, Layer::Adapted { .. })
    }

    /// The adaptation record, for adapted layers
    pub fn adaptation(&self) -> Option<&AdaptationRecord> {
        match self {
            Layer::Plain(_) => None,
            Layer::Adapted { adaptation, .. } => Some(adaptation),
        }
    }

    /// The re-encoded perturbed payload, for adapted layers
    pub fn encoded_data(&self) -> Option<&str> {
        match self {
            Layer::Plain(_) => None,
            Layer::Adapted { encoded_data, .. } => Some(encoded_data),
        }
    }
}

/// Estimate the QR symbol version for a payload.
///
/// Length-band heuristic recorded in exported layer metadata; the external
/// renderer picks the real version.
pub fn estimate_symbol_version(payload: &str) -> u32 {
    let length = payload.chars().count();
    match length {
        0..=25 => 1,
        26..=47 => 2,
        48..=77 => 3,
        78..=114 => 4,
        115..=154 => 5,
        _ => 40.min(length.div_ceil(30) as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_new_layer_defaults() {
        let layer = PlainLayer::new("payload", RenderOptions::default());
        assert!(layer.id.starts_with("qr-"));
        assert_eq!(layer.payload, "payload");
        assert_eq!(layer.order_index, 0);
        assert!(layer.opacity.is_none());
        assert_eq!(layer.options.width, 256);
        assert_eq!(layer.options.error_correction_level, "M");
    }

    #[test]
    fn test_layer_ids_are_unique() {
        let a = PlainLayer::new("x", RenderOptions::default());
        let b = PlainLayer::new("x", RenderOptions::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_plain_layer_has_no_adaptation() {
        let layer = Layer::Plain(PlainLayer::new("x", RenderOptions::default()));
        assert!(!layer.is_adapted());
        assert!(layer.adaptation().is_none());
        assert!(layer.encoded_data().is_none());
    }

    #[test]
    fn test_render_options_serialize_with_js_field_names() {
        let json = serde_json::to_value(RenderOptions::default()).unwrap();
        assert_eq!(json["errorCorrectionLevel"], "M");
        assert_eq!(json["color"]["dark"], "#000000");
    }

    #[test_case("", 1)]
    #[test_case("short", 1)]
    #[test_case("a payload of twenty-five.", 1)]
    #[test_case("a payload of twenty-six ch", 2)]
    #[test_case("this payload is long enough to need version three of the symbol format", 3)]
    fn test_estimate_symbol_version_bands(payload: &str, expected: u32) {
        assert_eq!(estimate_symbol_version(payload), expected);
    }

    #[test]
    fn test_estimate_symbol_version_caps_at_40() {
        let huge = "z".repeat(5000);
        assert_eq!(estimate_symbol_version(&huge), 40);

        let long = "z".repeat(300);
        // ceil(300/30) = 10
        assert_eq!(estimate_symbol_version(&long), 10);
    }
}
