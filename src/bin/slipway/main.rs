//! Slipway CLI - validate and linearize C/C++ target dependency graphs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let manifest_path = cli.manifest_path.as_deref();
    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Check(args) => commands::check::execute(manifest_path, color, args),
        Commands::Plan(args) => commands::plan::execute(manifest_path, color, args),
        Commands::Closure(args) => commands::closure::execute(manifest_path, color, args),
        Commands::Tree(args) => commands::tree::execute(manifest_path, color, args),
    }
}
