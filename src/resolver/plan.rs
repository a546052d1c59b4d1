//! Build plan emission.
//!
//! A BuildPlan is the derived artifact handed to a compiler driver: the
//! ordered target sequence plus each target's transitive closure for
//! computing effective include paths and link sets. It is recomputed
//! from a valid resolution whenever the manifest changes, never patched
//! incrementally.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::resolver::errors::ResolveError;
use crate::resolver::resolve::Resolution;
use crate::util::InternedString;

/// The ordered build plan for one resolved manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Package name, when the manifest declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Target names, dependencies before dependents
    pub build_order: Vec<InternedString>,

    /// Per-target transitive dependency closure, each sorted by name
    pub closures: BTreeMap<InternedString, Vec<InternedString>>,
}

impl BuildPlan {
    /// Build the plan from a validated resolution run.
    ///
    /// Fails with [`ResolveError::NotValidated`] if the run has not
    /// passed validation; an invalid run never yields a partial plan.
    pub fn from_resolution(
        resolution: &mut Resolution<'_>,
        package: Option<String>,
    ) -> Result<Self, ResolveError> {
        let build_order: Vec<InternedString> = resolution.build_order()?.to_vec();

        let mut closures = BTreeMap::new();
        for &name in &build_order {
            let closure = resolution.transitive_closure(&name)?;
            closures.insert(name, closure.iter().copied().collect());
        }

        Ok(BuildPlan {
            package,
            build_order,
            closures,
        })
    }

    /// Number of targets in the plan.
    pub fn len(&self) -> usize {
        self.build_order.len()
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.build_order.is_empty()
    }

    /// Serialize the plan as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the plan as JSON for downstream consumers.
    pub fn emit_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Manifest, Target};

    fn resolved_manifest() -> Manifest {
        let mut manifest = Manifest::new();
        for (name, deps) in [
            ("absl_base", vec![]),
            ("absl_strings", vec!["absl_base"]),
            ("absl_flags", vec!["absl_strings", "absl_base"]),
        ] {
            manifest
                .add_target(Target::new(
                    name,
                    deps.into_iter().map(InternedString::new).collect(),
                    vec![],
                    None,
                ))
                .unwrap();
        }
        manifest
    }

    #[test]
    fn test_plan_from_valid_resolution() {
        let manifest = resolved_manifest();
        let mut resolution = Resolution::new(&manifest);
        resolution.validate().unwrap();

        let plan =
            BuildPlan::from_resolution(&mut resolution, Some("abseil-cpp".to_string())).unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.build_order[0].as_str(), "absl_base");

        let flags_closure: Vec<&str> = plan.closures[&InternedString::new("absl_flags")]
            .iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(flags_closure, ["absl_base", "absl_strings"]);
    }

    #[test]
    fn test_plan_refused_before_validation() {
        let manifest = resolved_manifest();
        let mut resolution = Resolution::new(&manifest);

        let err = BuildPlan::from_resolution(&mut resolution, None).unwrap_err();
        assert!(matches!(err, ResolveError::NotValidated { .. }));
    }

    #[test]
    fn test_plan_json_round_trip() {
        let manifest = resolved_manifest();
        let mut resolution = Resolution::new(&manifest);
        resolution.validate().unwrap();

        let plan = BuildPlan::from_resolution(&mut resolution, None).unwrap();
        let json = plan.to_json().unwrap();
        let parsed: BuildPlan = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.build_order, plan.build_order);
        assert_eq!(parsed.closures, plan.closures);
        // package was None, so the key is omitted entirely.
        assert!(!json.contains("package"));
    }
}
