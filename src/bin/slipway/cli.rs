//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Slipway - target dependency graph validation and build ordering
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Slipway.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the manifest's dependency graph
    Check(CheckArgs),

    /// Emit the ordered build plan with per-target closures
    Plan(PlanArgs),

    /// Show the transitive dependency closure of a target
    Closure(ClosureArgs),

    /// Display the dependency tree
    Tree(TreeArgs),
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct PlanArgs {
    /// Write the plan JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClosureArgs {
    /// Target name (canonical or alias)
    pub target: String,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Root target to print (defaults to all targets nothing depends on)
    pub target: Option<String>,

    /// Maximum depth to print
    #[arg(long)]
    pub depth: Option<usize>,
}
