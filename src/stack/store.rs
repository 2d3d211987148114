//! Stack Store
//!
//! Ordered collection of layers forming one animated composition. Order is
//! semantically meaningful: it drives visual depth and animation phase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConstelError, Result};
use crate::stack::layer::{Layer, PlainLayer, RenderOptions};

/// Opacity floor so deep layers stay visible
const MIN_BASELINE_OPACITY: f64 = 0.3;

/// Baseline opacity for a layer at `index` in a stack of `total` layers.
pub fn baseline_opacity(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    MIN_BASELINE_OPACITY.max(1.0 - (index as f64 / total as f64) * 0.7)
}

/// Ordered sequence of layers with unique ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    /// Unique stack id
    pub id: String,
    layers: Vec<Layer>,
    /// Creation instant
    pub created_at: DateTime<Utc>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Create an empty stack with a fresh id.
    pub fn new() -> Self {
        Self::with_id(format!("stack-{}", Uuid::new_v4()))
    }

    /// Create an empty stack with an explicit id (used by import).
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layers: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a stack from payloads, assigning order and baseline opacity.
    pub fn from_payloads<I, S>(payloads: I, options: RenderOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let payloads: Vec<String> = payloads.into_iter().map(Into::into).collect();
        let total = payloads.len();

        let mut stack = Self::new();
        for (index, payload) in payloads.into_iter().enumerate() {
            let mut plain = PlainLayer::new(payload, options.clone());
            plain.order_index = index;
            plain.opacity = Some(baseline_opacity(index, total));
            stack.layers.push(Layer::Plain(plain));
        }
        stack
    }

    /// Append a layer, assigning its order index.
    ///
    /// # Errors
    /// Returns [`ConstelError::InvalidInput`] when a layer with the same id
    /// is already present.
    pub fn push(&mut self, mut layer: Layer) -> Result<()> {
        if self.contains(layer.id()) {
            return Err(ConstelError::InvalidInput {
                reason: format!("duplicate layer id in stack: {}", layer.id()),
            });
        }
        layer.set_order_index(self.layers.len());
        self.layers.push(layer);
        Ok(())
    }

    /// Replace the layer with the same id, keeping its position.
    ///
    /// Used after an apply: the adapted layer takes the plain layer's slot.
    ///
    /// # Errors
    /// Returns [`ConstelError::InvalidInput`] when no layer has that id.
    pub fn replace(&mut self, layer: Layer) -> Result<()> {
        let position = self
            .layers
            .iter()
            .position(|existing| existing.id() == layer.id())
            .ok_or_else(|| ConstelError::InvalidInput {
                reason: format!("no layer with id {} in stack", layer.id()),
            })?;

        let mut layer = layer;
        layer.set_order_index(position);
        self.layers[position] = layer;
        Ok(())
    }

    /// Layer with the given id, if present
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// True when a layer with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Layers in stack order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when the stack has no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
