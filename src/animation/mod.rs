//! Constellation Animation
//!
//! Eager, deterministic timeline generation over a layer stack, plus a
//! timer-free playback cursor. Generation is a single bounded computation;
//! real-time pacing is the external renderer's concern.

mod generator;
mod playback;
mod timeline;

pub use generator::{generate, generate_default, DEFAULT_DURATION_MS, DEFAULT_FRAME_COUNT};
pub use playback::{Playback, PlaybackState};
pub use timeline::{AnimationTimeline, Frame, LayerFrame, Transform3D};
