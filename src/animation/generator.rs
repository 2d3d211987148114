//! Transform Generator
//!
//! Computes the whole timeline eagerly from a stack snapshot. Identical
//! inputs always yield bit-identical transforms; only the timeline's
//! generation instant comes from the wall clock.

use std::f64::consts::PI;

use chrono::Utc;
use uuid::Uuid;

use crate::animation::timeline::{AnimationTimeline, Frame, LayerFrame, Transform3D};
use crate::error::{ConstelError, Result};
use crate::stack::{Layer, Stack};

/// Default animation length: 3 seconds
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Default frame count: 60 frames (50 ms apart at the default duration)
pub const DEFAULT_FRAME_COUNT: usize = 60;

/// Depth spread across the stack
const MAX_Z: f64 = 200.0;

/// Painter's-order bias so derived z-indices stay positive
const Z_INDEX_BASE: i64 = 1000;

/// Generate a timeline with the default duration and frame count.
pub fn generate_default(stack: &Stack) -> Result<AnimationTimeline> {
    generate(stack, DEFAULT_DURATION_MS, DEFAULT_FRAME_COUNT)
}

/// Generate a timeline of `frame_count` frames spanning `duration_ms`.
///
/// An empty stack is not an error: every frame simply carries an empty
/// layer list.
///
/// # Errors
/// Returns [`ConstelError::InvalidInput`] when `frame_count < 2` (progress
/// would be undefined).
pub fn generate(stack: &Stack, duration_ms: u64, frame_count: usize) -> Result<AnimationTimeline> {
    if frame_count < 2 {
        return Err(ConstelError::InvalidInput {
            reason: format!("frame count must be at least 2, got {}", frame_count),
        });
    }

    let layers = stack.layers();
    let frame_interval = duration_ms as f64 / frame_count as f64;

    let frames = (0..frame_count)
        .map(|index| {
            let progress = index as f64 / (frame_count - 1) as f64;
            Frame {
                index,
                progress,
                offset_ms: index as f64 * frame_interval,
                layers: layers
                    .iter()
                    .enumerate()
                    .map(|(layer_index, layer)| {
                        layer_frame(layer, layer_index, progress, layers.len())
                    })
                    .collect(),
            }
        })
        .collect();

    log::debug!(
        "Generated {} frames over {} ms for stack {} ({} layers)",
        frame_count,
        duration_ms,
        stack.id,
        layers.len()
    );

    Ok(AnimationTimeline {
        id: format!("anim-{}", Uuid::new_v4()),
        duration_ms,
        generated_at: Utc::now(),
        frames,
    })
}

/// Transform for one layer at one progress point.
fn layer_frame(layer: &Layer, index: usize, progress: f64, total_layers: usize) -> LayerFrame {
    let depth = index as f64 / total_layers as f64;

    // Depth oscillates around the layer's slot in the z spread
    let z = depth * MAX_Z + (progress * 2.0 * PI).sin() * 50.0;

    // Alternate spin direction per layer for the constellation look
    let spin = if index % 2 == 0 { 1.0 } else { -1.0 };
    let rotate_x = progress * 360.0 * spin;
    let rotate_y = progress * 180.0;
    let rotate_z = (progress * PI).sin() * 15.0;

    let base_scale = 1.0 - depth * 0.3;
    let pulse = 1.0 + (progress * 4.0 * PI).sin() * 0.1;
    let scale = base_scale * pulse;

    let base_opacity = layer.opacity().unwrap_or(1.0 - depth * 0.5);
    let fade = (progress * PI).sin() * 0.3 + 0.7;
    let opacity = (base_opacity * fade).min(1.0);

    // Layers fan out from the center as progress grows
    let radius = 100.0 + index as f64 * 20.0;
    let angle = depth * 2.0 * PI + progress * PI;
    let x = angle.cos() * radius * progress;
    let y = angle.sin() * radius * progress;

    LayerFrame {
        layer_id: layer.id().to_string(),
        transform: Transform3D {
            translate_x: x,
            translate_y: y,
            translate_z: z,
            rotate_x,
            rotate_y,
            rotate_z,
            scale,
        },
        opacity,
        z_index: z.floor() as i64 + Z_INDEX_BASE,
    }
}
