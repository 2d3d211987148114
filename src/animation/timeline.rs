//! Animation Timeline
//!
//! An immutable, finite sequence of frames. Every field except the
//! timeline's single `generated_at` instant is a pure function of the
//! source stack and the generation parameters, so tests can compare
//! timelines field-by-field and ignore only that one value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 3D transform for one layer in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub translate_x: f64,
    pub translate_y: f64,
    pub translate_z: f64,
    /// Degrees
    pub rotate_x: f64,
    /// Degrees
    pub rotate_y: f64,
    /// Degrees
    pub rotate_z: f64,
    /// Uniform scale
    pub scale: f64,
}

/// Per-layer state within a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerFrame {
    pub layer_id: String,
    pub transform: Transform3D,
    pub opacity: f64,
    /// Painter's-order hint derived from depth
    pub z_index: i64,
}

/// One discrete timestep of a timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 0-based frame number
    pub index: usize,
    /// `index / (frame_count - 1)`, in [0, 1] inclusive
    pub progress: f64,
    /// Deterministic offset from the timeline start
    pub offset_ms: f64,
    /// One entry per source layer, in stack order
    pub layers: Vec<LayerFrame>,
}

/// A generated animation timeline; immutable after generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationTimeline {
    pub id: String,
    pub duration_ms: u64,
    /// The only wall-clock field; everything else is deterministic
    pub generated_at: DateTime<Utc>,
    pub frames: Vec<Frame>,
}

impl AnimationTimeline {
    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Spacing between frames in milliseconds
    pub fn frame_interval_ms(&self) -> f64 {
        if self.frames.is_empty() {
            return 0.0;
        }
        self.duration_ms as f64 / self.frames.len() as f64
    }

    /// Absolute timestamp of a frame: the generation instant plus the
    /// frame's deterministic offset.
    pub fn frame_timestamp(&self, index: usize) -> Option<DateTime<Utc>> {
        let frame = self.frames.get(index)?;
        Some(self.generated_at + Duration::milliseconds(frame.offset_ms as i64))
    }
}
