//! `slipway check` command

use std::path::Path;

use anyhow::Result;

use crate::cli::CheckArgs;
use crate::commands::{load_manifest, validate_or_report};

pub fn execute(manifest_path: Option<&Path>, color: bool, _args: CheckArgs) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let resolution = validate_or_report(&manifest, color)?;

    let order = resolution.build_order()?;
    println!(
        "ok: {} target(s), dependency graph is acyclic",
        order.len()
    );

    Ok(())
}
