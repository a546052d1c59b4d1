//! `slipway plan` command

use std::path::Path;

use anyhow::Result;

use crate::cli::PlanArgs;
use crate::commands::{load_manifest, validate_or_report};
use slipway::BuildPlan;

pub fn execute(manifest_path: Option<&Path>, color: bool, args: PlanArgs) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let mut resolution = validate_or_report(&manifest, color)?;

    let package = manifest.package_name().map(|s| s.to_string());
    let plan = BuildPlan::from_resolution(&mut resolution, package)?;

    match args.output {
        Some(path) => {
            plan.emit_json(&path)?;
            tracing::info!("wrote build plan for {} target(s) to {}", plan.len(), path.display());
        }
        None => println!("{}", plan.to_json()?),
    }

    Ok(())
}
