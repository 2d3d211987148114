//! Constel - Layer Stack Animation and Adaptation Engine
//!
//! Constel provides two independent numeric pipelines over stacks of
//! QR-encodable payload layers:
//! 1. Transform Generation - deterministic per-frame 3D transform timelines
//!    for an ordered layer stack ("constellation" animation)
//! 2. Low-Rank Adaptation - rank-constrained additive perturbation of a
//!    layer's fixed-length payload encoding
//!
//! # Architecture
//!
//! Both engines are pure functions of their inputs plus explicit randomness
//! sources:
//! - `codec`: text <-> fixed-length normalized vector conversion
//! - `matrix`: dense matrix/vector algebra primitives
//! - `adaptation`: rank-r weight creation, validation, apply/extract, stats
//! - `animation`: timeline generation and a timer-free playback cursor
//! - `stack`: the in-memory layer stack model and its JSON persistence
//!
//! Rendering of actual QR symbols and real-time frame scheduling are
//! external collaborators; the core only consumes and produces payload
//! strings, numeric metadata, and immutable timelines.

pub mod adaptation;
pub mod animation;
pub mod cli;
pub mod codec;
pub mod error;
pub mod matrix;
pub mod stack;

pub use error::{ConstelError, Result};
