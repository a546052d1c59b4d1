//! Resolution error types and diagnostics.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during manifest registration or graph resolution.
///
/// Every variant is reported to the caller; nothing is silently
/// recovered. A masked error here would hand an invalid build plan to a
/// compiler driver.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum ResolveError {
    /// A target (or alias) name was registered twice.
    #[error("target `{name}` is declared more than once")]
    #[diagnostic(
        code(slipway::manifest::duplicate_target),
        help("Remove or rename one of the declarations; redefinition never overwrites")
    )]
    DuplicateTarget { name: String },

    /// A declared dependency name resolves to no target.
    #[error("unknown dependency `{missing}` declared by target `{target}`")]
    #[diagnostic(
        code(slipway::resolve::unknown_dependency),
        help("Declare `{missing}` as a target or fix the dependency name")
    )]
    UnknownDependency { target: String, missing: String },

    /// A target transitively depends on itself.
    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(slipway::resolve::cyclic_dependency),
        help("Break the cycle by removing or restructuring dependencies")
    )]
    CyclicDependency { cycle: Vec<String> },

    /// `build_order` or `transitive_closure` was called on a run that
    /// has not passed validation. A programming error, not input data.
    #[error("`{operation}` called before validation passed")]
    #[diagnostic(
        code(slipway::resolve::not_validated),
        help("Call `Resolution::validate` first and check its result")
    )]
    NotValidated { operation: &'static str },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::DuplicateTarget { name } => {
                Diagnostic::error(format!("target `{}` is declared more than once", name))
                    .with_suggestion("Remove or rename one of the declarations".to_string())
            }

            ResolveError::UnknownDependency { target, missing } => {
                Diagnostic::error(format!("unknown dependency `{}`", missing))
                    .with_context(format!("declared by target `{}`", target))
                    .with_suggestion(suggestions::UNKNOWN_DEPENDENCY.to_string())
            }

            ResolveError::CyclicDependency { cycle } => {
                Diagnostic::error("cycle detected in dependency graph")
                    .with_context(format!("cycle: {}", cycle.join(" -> ")))
                    .with_suggestion(suggestions::CYCLE.to_string())
            }

            ResolveError::NotValidated { operation } => {
                Diagnostic::error(format!("`{}` called before validation passed", operation))
                    .with_suggestion(
                        "Call `Resolution::validate` first and check its result".to_string(),
                    )
            }
        }
    }
}

/// The exhaustive set of errors collected by one validation pass.
///
/// Unknown-dependency and duplicate-name errors are gathered across the
/// whole manifest before being reported, so the user sees every problem
/// at once instead of fixing one and re-running.
#[derive(Debug, Clone, MietteDiagnostic)]
pub struct ValidationErrors {
    #[related]
    errors: Vec<ResolveError>,
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    /// Wrap a non-empty collection of errors.
    pub fn new(errors: Vec<ResolveError>) -> Self {
        debug_assert!(!errors.is_empty());
        ValidationErrors { errors }
    }

    /// The collected errors, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolveError> {
        self.errors.iter()
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no errors were collected (never constructed this way).
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() == 1 {
            return write!(f, "{}", self.errors[0]);
        }

        writeln!(f, "{} validation errors:", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "  {}", err)?;
        }
        Ok(())
    }
}
