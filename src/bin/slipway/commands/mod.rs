//! Command implementations.

pub mod check;
pub mod closure;
pub mod plan;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use slipway::core::MANIFEST_NAME;
use slipway::util::diagnostic::{emit, suggestions};
use slipway::{Manifest, Resolution, ValidationErrors};

/// Locate and load the manifest.
///
/// With no explicit path, Slipway.toml is searched for in the current
/// directory and its parents.
pub fn load_manifest(manifest_path: Option<&Path>) -> Result<Manifest> {
    let path = match manifest_path {
        Some(path) => path.to_path_buf(),
        None => find_manifest().with_context(|| {
            format!(
                "could not find {} in the current directory or any parent\n{}",
                MANIFEST_NAME,
                suggestions::NO_MANIFEST
            )
        })?,
    };

    Manifest::load(&path)
}

fn find_manifest() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let mut dir = cwd.as_path();

    loop {
        let candidate = dir.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => bail!("no manifest found"),
        }
    }
}

/// Run validation, printing every collected error as a diagnostic.
pub fn validate_or_report<'m>(
    manifest: &'m Manifest,
    color: bool,
) -> Result<Resolution<'m>> {
    let mut resolution = Resolution::new(manifest);

    if let Err(errors) = resolution.validate() {
        report(&errors, color);
        bail!("validation failed with {} error(s)", errors.len());
    }

    Ok(resolution)
}

fn report(errors: &ValidationErrors, color: bool) {
    for err in errors.iter() {
        emit(&err.to_diagnostic(), color);
    }
}
