//! Constel CLI - Layer Stack Animation and Adaptation
//!
//! Command-line interface for the Constel engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use constel::cli::{commands, Cli, Commands};
use constel::Result;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Constel v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Constel v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::NewStack { output, payloads } => commands::new_stack(&output, &payloads),
        Commands::CreateWeights {
            rank,
            alpha,
            seed,
            output,
        } => commands::create_weights(rank, alpha, seed, &output),
        Commands::Stats { path } => commands::stats(&path),
        Commands::Apply {
            stack,
            layer,
            weights,
            output,
        } => commands::apply(&stack, &layer, &weights, output.as_deref()),
        Commands::Extract {
            stack,
            layer,
            output,
        } => commands::extract(&stack, &layer, &output),
        Commands::Animate {
            stack,
            duration,
            frames,
            output,
        } => commands::animate(&stack, duration, frames, output.as_deref()),
    }
}
