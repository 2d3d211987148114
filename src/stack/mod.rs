//! Layer Stack Model
//!
//! The in-memory representation of an ordered stack of payload layers that
//! both engines read, plus the JSON persistence format shared with the
//! import/export collaborator.

mod layer;
mod persist;
mod store;

pub use layer::{estimate_symbol_version, ColorScheme, Layer, PlainLayer, RenderOptions};
pub use persist::{export_stack, import_stack, stack_to_value};
pub use store::{baseline_opacity, Stack};
