//! Build target records.
//!
//! A target is a named, independently buildable unit: a set of sources,
//! an optional public headers directory, and the names of the targets it
//! depends on. Dependency names are weak references resolved by lookup
//! during graph construction, never owned pointers.

use std::path::{Path, PathBuf};

use crate::util::InternedString;

/// A declared build target.
///
/// Immutable once constructed; the resolver treats the whole manifest as
/// a frozen snapshot for the duration of a resolution run.
#[derive(Debug, Clone)]
pub struct Target {
    /// Unique target name
    name: InternedString,

    /// Declared dependency names, in declaration order
    deps: Vec<InternedString>,

    /// Source file paths, relative to the target root. Empty means
    /// header-only.
    sources: Vec<String>,

    /// Public headers directory, if the target exports headers
    public_headers: Option<PathBuf>,
}

impl Target {
    /// Create a new target record.
    pub fn new(
        name: impl Into<InternedString>,
        deps: Vec<InternedString>,
        sources: Vec<String>,
        public_headers: Option<PathBuf>,
    ) -> Self {
        Target {
            name: name.into(),
            deps,
            sources,
            public_headers,
        }
    }

    /// The target name.
    pub fn name(&self) -> InternedString {
        self.name
    }

    /// Declared dependency names, in declaration order.
    ///
    /// May contain duplicates; the graph collapses them to one edge.
    pub fn deps(&self) -> &[InternedString] {
        &self.deps
    }

    /// Source file paths.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Public headers directory, if any.
    pub fn public_headers(&self) -> Option<&Path> {
        self.public_headers.as_deref()
    }

    /// A target with no sources compiles nothing; only its headers are
    /// propagated to dependents.
    pub fn is_header_only(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_target() {
        let target = Target::new(
            "absl_meta",
            vec![InternedString::new("absl_base")],
            vec![],
            Some(PathBuf::from("include")),
        );

        assert!(target.is_header_only());
        assert_eq!(target.deps().len(), 1);
        assert_eq!(target.public_headers(), Some(Path::new("include")));
    }

    #[test]
    fn test_compiled_target() {
        let target = Target::new(
            "absl_base",
            vec![],
            vec!["internal/spinlock.cc".to_string(), "log_severity.cc".to_string()],
            Some(PathBuf::from("include")),
        );

        assert!(!target.is_header_only());
        assert_eq!(target.sources().len(), 2);
        assert!(target.deps().is_empty());
    }
}
