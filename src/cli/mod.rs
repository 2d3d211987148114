//! CLI Module
//!
//! Command-line interface for the Constel animation and adaptation engine.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Constel - layer stack animation and low-rank adaptation engine
#[derive(Parser, Debug)]
#[command(name = "constel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a stack file from payload strings
    #[command(name = "new-stack")]
    NewStack {
        /// Output stack file
        #[arg(short, long)]
        output: PathBuf,

        /// One payload per layer, in stack order
        #[arg(required = true)]
        payloads: Vec<String>,
    },

    /// Generate a fresh adaptation weight file
    #[command(name = "create-weights")]
    CreateWeights {
        /// Bottleneck rank (4, 8, 16, 32 or 64)
        #[arg(short, long, default_value_t = 16)]
        rank: usize,

        /// Scaling numerator
        #[arg(short, long, default_value_t = 32.0)]
        alpha: f64,

        /// Fixed seed for reproducible weights
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output weights file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show parameter statistics for a weight file
    #[command(name = "stats")]
    Stats {
        /// Path to the weights file
        path: PathBuf,
    },

    /// Apply weights to one layer of a stack
    #[command(name = "apply")]
    Apply {
        /// Path to the stack file
        #[arg(long)]
        stack: PathBuf,

        /// Id of the layer to adapt
        #[arg(short, long)]
        layer: String,

        /// Path to the weights file
        #[arg(short, long)]
        weights: PathBuf,

        /// Output stack file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract weights from an adapted layer
    #[command(name = "extract")]
    Extract {
        /// Path to the stack file
        #[arg(long)]
        stack: PathBuf,

        /// Id of the adapted layer
        #[arg(short, long)]
        layer: String,

        /// Output weights file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate an animation timeline from a stack
    #[command(name = "animate")]
    Animate {
        /// Path to the stack file
        #[arg(long)]
        stack: PathBuf,

        /// Animation length in milliseconds
        #[arg(short, long, default_value_t = 3000)]
        duration: u64,

        /// Number of frames
        #[arg(short, long, default_value_t = 60)]
        frames: usize,

        /// Output timeline file (prints a summary when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
