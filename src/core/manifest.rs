//! Slipway.toml manifest parsing and the in-memory manifest model.
//!
//! The manifest enumerates build targets as declarative records. The
//! model is registration-only: once a target is added it is never
//! mutated, and redefinition is always an error, never an overwrite.
//!
//! Target naming is a presentation layer over one canonical graph: an
//! `[aliases]` table may map alternate public names onto canonical
//! target names, and every lookup canonicalizes first. There is never a
//! second parallel graph for the aliased names.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::target::Target;
use crate::resolver::errors::{ResolveError, ValidationErrors};
use crate::util::InternedString;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Slipway.toml";

/// The manifest model: all declared targets plus the alias table.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Package name, if the manifest declares one
    package_name: Option<String>,

    /// Targets in registration order
    targets: Vec<Target>,

    /// Name to index into `targets`
    index: HashMap<InternedString, usize>,

    /// Alternate public names mapped onto canonical target names
    aliases: HashMap<InternedString, InternedString>,

    /// The directory containing this manifest
    manifest_dir: PathBuf,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    package: Option<RawPackage>,

    #[serde(default)]
    targets: Vec<RawTarget>,

    #[serde(default)]
    aliases: HashMap<String, String>,
}

/// Raw `[package]` section.
#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
}

/// Raw `[[targets]]` record (before interning and path joining).
#[derive(Debug, Deserialize)]
struct RawTarget {
    name: String,

    #[serde(default)]
    deps: Vec<String>,

    /// Target root; `public_headers` is relative to it when both are set
    #[serde(default)]
    path: Option<String>,

    #[serde(default)]
    sources: Vec<String>,

    #[serde(default)]
    public_headers: Option<String>,
}

impl Manifest {
    /// Create an empty manifest model.
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    ///
    /// Duplicate target names and bad aliases are collected across the
    /// whole document and reported together as a [`ValidationErrors`],
    /// so one pass surfaces every registration problem at once.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest =
            toml::from_str(content).with_context(|| "failed to parse Slipway.toml")?;

        let mut manifest = Manifest {
            package_name: raw.package.map(|p| p.name),
            manifest_dir: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            ..Manifest::default()
        };

        let mut errors = Vec::new();

        for raw_target in raw.targets {
            let target = convert_target(raw_target);
            if let Err(e) = manifest.add_target(target) {
                errors.push(e);
            }
        }

        for (alias, canonical) in raw.aliases {
            if let Err(e) = manifest.add_alias(
                InternedString::new(alias),
                InternedString::new(canonical),
            ) {
                errors.push(e);
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors).into());
        }

        Ok(manifest)
    }

    /// Register a target.
    ///
    /// Fails if the name is already taken by a target or an alias; the
    /// model is unchanged by a failed registration.
    pub fn add_target(&mut self, target: Target) -> Result<(), ResolveError> {
        let name = target.name();
        if self.index.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(ResolveError::DuplicateTarget {
                name: name.to_string(),
            });
        }

        self.index.insert(name, self.targets.len());
        self.targets.push(target);
        Ok(())
    }

    /// Register an alternate public name for a canonical target name.
    ///
    /// The canonical side is not required to exist yet (aliases may be
    /// declared ahead of their targets); dangling aliases are caught by
    /// [`crate::resolver::Resolution::validate`].
    pub fn add_alias(
        &mut self,
        alias: InternedString,
        canonical: InternedString,
    ) -> Result<(), ResolveError> {
        if self.index.contains_key(&alias) || self.aliases.contains_key(&alias) {
            return Err(ResolveError::DuplicateTarget {
                name: alias.to_string(),
            });
        }

        self.aliases.insert(alias, canonical);
        Ok(())
    }

    /// Resolve a name to the canonical target name it denotes.
    ///
    /// Returns `None` for names that are neither a target nor an alias
    /// of one. Aliases are a single level deep; chained aliases do not
    /// resolve.
    pub fn canonicalize(&self, name: &str) -> Option<InternedString> {
        let interned = InternedString::new(name);
        if self.index.contains_key(&interned) {
            return Some(interned);
        }

        self.aliases
            .get(&interned)
            .copied()
            .filter(|canonical| self.index.contains_key(canonical))
    }

    /// Look up a target by canonical name or alias.
    pub fn get(&self, name: &str) -> Option<&Target> {
        let canonical = self.canonicalize(name)?;
        self.index.get(&canonical).map(|&i| &self.targets[i])
    }

    /// All targets, in registration order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// The alias table.
    pub fn aliases(&self) -> impl Iterator<Item = (InternedString, InternedString)> + '_ {
        self.aliases.iter().map(|(a, c)| (*a, *c))
    }

    /// Number of registered targets (aliases excluded).
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if no targets are registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The package name, if declared.
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// The directory containing the manifest file.
    pub fn manifest_dir(&self) -> &Path {
        &self.manifest_dir
    }
}

fn convert_target(raw: RawTarget) -> Target {
    // publicHeadersPath semantics: relative to the target root when a
    // root is declared.
    let public_headers = raw.public_headers.map(|headers| match &raw.path {
        Some(root) => Path::new(root).join(headers),
        None => PathBuf::from(headers),
    });

    Target::new(
        raw.name,
        raw.deps.into_iter().map(InternedString::new).collect(),
        raw.sources,
        public_headers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_basic_manifest() {
        let content = r#"
[package]
name = "abseil-cpp"

[[targets]]
name = "absl_base"
sources = ["internal/spinlock.cc", "log_severity.cc"]
path = "absl/base"
public_headers = "include"

[[targets]]
name = "absl_algorithm"
deps = ["absl_base"]
path = "absl/algorithm"
public_headers = "include"
"#;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);

        let manifest = Manifest::parse(content, &path).unwrap();
        assert_eq!(manifest.package_name(), Some("abseil-cpp"));
        assert_eq!(manifest.len(), 2);

        let base = manifest.get("absl_base").unwrap();
        assert!(!base.is_header_only());
        assert_eq!(
            base.public_headers(),
            Some(Path::new("absl/base/include"))
        );

        let algorithm = manifest.get("absl_algorithm").unwrap();
        assert!(algorithm.is_header_only());
        assert_eq!(algorithm.deps()[0].as_str(), "absl_base");
    }

    #[test]
    fn test_duplicate_registration_has_no_effect() {
        let mut manifest = Manifest::new();

        manifest
            .add_target(Target::new("base", vec![], vec!["a.cc".into()], None))
            .unwrap();

        let err = manifest
            .add_target(Target::new("base", vec![], vec!["b.cc".into()], None))
            .unwrap_err();

        assert!(matches!(err, ResolveError::DuplicateTarget { ref name } if name == "base"));
        assert_eq!(manifest.len(), 1);
        // The surviving record is the first registration.
        assert_eq!(manifest.get("base").unwrap().sources(), ["a.cc"]);
    }

    #[test]
    fn test_parse_collects_all_duplicates() {
        let content = r#"
[[targets]]
name = "base"

[[targets]]
name = "base"

[[targets]]
name = "strings"

[[targets]]
name = "strings"
"#;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);

        let err = Manifest::parse(content, &path).unwrap_err();
        let errors = err.downcast_ref::<ValidationErrors>().unwrap();

        assert_eq!(errors.len(), 2);
        let message = errors.to_string();
        assert!(message.contains("base"));
        assert!(message.contains("strings"));
    }

    #[test]
    fn test_alias_resolves_to_canonical_target() {
        let content = r#"
[[targets]]
name = "absl_base"

[aliases]
base = "absl_base"
"#;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_NAME);

        let manifest = Manifest::parse(content, &path).unwrap();
        assert_eq!(
            manifest.canonicalize("base").unwrap().as_str(),
            "absl_base"
        );
        assert_eq!(
            manifest.get("base").unwrap().name().as_str(),
            "absl_base"
        );
        // One canonical graph: the alias adds no target.
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_alias_may_not_shadow_target() {
        let mut manifest = Manifest::new();
        manifest
            .add_target(Target::new("base", vec![], vec![], None))
            .unwrap();
        manifest
            .add_target(Target::new("strings", vec![], vec![], None))
            .unwrap();

        let err = manifest
            .add_alias(InternedString::new("base"), InternedString::new("strings"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateTarget { .. }));
    }

    #[test]
    fn test_dangling_alias_does_not_canonicalize() {
        let mut manifest = Manifest::new();
        manifest
            .add_alias(InternedString::new("base"), InternedString::new("missing"))
            .unwrap();

        assert!(manifest.canonicalize("base").is_none());
        assert!(manifest.get("base").is_none());
    }
}
