//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use log::info;

use crate::adaptation::{self, AdaptationConfig, AdaptationWeights};
use crate::animation;
use crate::error::{ConstelError, Result};
use crate::stack::{export_stack, import_stack, RenderOptions, Stack};

/// Create a stack file from payload strings.
pub fn new_stack(output: &Path, payloads: &[String]) -> Result<()> {
    info!("Creating stack with {} layers", payloads.len());

    let stack = Stack::from_payloads(payloads.iter().cloned(), RenderOptions::default());
    export_stack(&stack, output)?;

    println!("Stack created: {}", output.display());
    println!("Layers:");
    for layer in stack.layers() {
        println!("  [{}] {} ({})", layer.order_index(), layer.id(), layer.payload());
    }

    Ok(())
}

/// Generate a fresh weight file.
pub fn create_weights(rank: usize, alpha: f64, seed: Option<u64>, output: &Path) -> Result<()> {
    info!("Creating rank-{} adaptation weights", rank);

    let config = AdaptationConfig {
        rank,
        alpha,
        ..Default::default()
    };
    let weights = match seed {
        Some(seed) => AdaptationWeights::create_seeded(config, seed)?,
        None => AdaptationWeights::generate(config)?,
    };
    weights.save(output)?;

    let stats = weights.stats();
    println!("Weights created: {}", output.display());
    println!("  id:         {}", weights.id);
    println!("  rank:       {}", stats.rank);
    println!("  scaling:    {:.4}", weights.scaling);
    println!("  parameters: {}", stats.parameter_count);

    Ok(())
}

/// Show parameter statistics for a weight file.
pub fn stats(path: &Path) -> Result<()> {
    let weights = AdaptationWeights::load(path)?;
    let stats = weights.stats();

    println!("Weights: {}", weights.id);
    println!("  rank:         {}", stats.rank);
    println!("  parameters:   {}", stats.parameter_count);
    println!("  memory:       {} bytes", stats.memory_bytes);
    println!("  sparsity:     {:.6}", stats.sparsity);
    println!("  created:      {}", weights.created_at);

    Ok(())
}

/// Apply weights to one layer of a stack file.
pub fn apply(stack_path: &Path, layer_id: &str, weights_path: &Path, output: Option<&Path>) -> Result<()> {
    info!("Applying {} to layer {}", weights_path.display(), layer_id);

    let mut stack = import_stack(stack_path)?;
    let weights = AdaptationWeights::load(weights_path)?;

    let layer = stack
        .get(layer_id)
        .ok_or_else(|| ConstelError::InvalidInput {
            reason: format!("no layer with id {} in stack", layer_id),
        })?;

    let adapted = adaptation::apply(layer, &weights)?;
    let encoded_preview: String = adapted
        .encoded_data()
        .unwrap_or_default()
        .chars()
        .take(48)
        .collect();
    stack.replace(adapted)?;

    let target = output.unwrap_or(stack_path);
    export_stack(&stack, target)?;

    println!("Applied weights {} to layer {}", weights.id, layer_id);
    println!("  encoded: {}...", encoded_preview);
    println!("  written: {}", target.display());

    Ok(())
}

/// Extract weights from an adapted layer into a weight file.
pub fn extract(stack_path: &Path, layer_id: &str, output: &Path) -> Result<()> {
    info!("Extracting weights from layer {}", layer_id);

    let stack = import_stack(stack_path)?;
    let layer = stack
        .get(layer_id)
        .ok_or_else(|| ConstelError::InvalidInput {
            reason: format!("no layer with id {} in stack", layer_id),
        })?;

    let extracted = adaptation::extract(layer)?;
    let content = serde_json::to_string_pretty(&extracted)?;
    fs::write(output, content)?;

    println!("Extracted weights {} from layer {}", extracted.weights.id, layer_id);
    println!("  originally applied: {}", extracted.metadata.original_timestamp);
    println!("  written: {}", output.display());

    Ok(())
}

/// Generate a timeline from a stack file.
pub fn animate(
    stack_path: &Path,
    duration_ms: u64,
    frame_count: usize,
    output: Option<&Path>,
) -> Result<()> {
    let stack = import_stack(stack_path)?;
    let timeline = animation::generate(&stack, duration_ms, frame_count)?;

    println!("Timeline {} generated", timeline.id);
    println!(
        "  {} frames over {} ms ({:.1} ms/frame), {} layers",
        timeline.frame_count(),
        timeline.duration_ms,
        timeline.frame_interval_ms(),
        stack.len()
    );

    if let Some(path) = output {
        let content = serde_json::to_string_pretty(&timeline)?;
        fs::write(path, content)?;
        println!("  written: {}", path.display());
    }

    Ok(())
}
