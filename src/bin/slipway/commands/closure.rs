//! `slipway closure` command

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::ClosureArgs;
use crate::commands::{load_manifest, validate_or_report};
use slipway::util::diagnostic::{emit, suggestions, Diagnostic};

pub fn execute(manifest_path: Option<&Path>, color: bool, args: ClosureArgs) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let mut resolution = validate_or_report(&manifest, color)?;

    if manifest.get(&args.target).is_none() {
        let diag = Diagnostic::error(format!("no target named `{}`", args.target))
            .with_suggestion(suggestions::TARGET_NOT_FOUND.to_string());
        emit(&diag, color);
        bail!("unknown target `{}`", args.target);
    }

    let closure = resolution.transitive_closure(&args.target)?;
    if closure.is_empty() {
        println!("{} has no dependencies", args.target);
        return Ok(());
    }

    for name in closure {
        println!("{}", name);
    }

    Ok(())
}
