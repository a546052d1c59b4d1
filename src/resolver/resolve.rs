//! Resolution - one validation run over a frozen manifest.
//!
//! A run moves through `Unvalidated -> Validating -> { Valid, Invalid }`.
//! `Invalid` is terminal: no partial build plan is ever produced.
//! `build_order` and `transitive_closure` are only answerable from
//! `Valid`; calling them earlier is a programming error and fails with
//! [`ResolveError::NotValidated`] rather than guessing.

use std::collections::{BTreeSet, HashMap};

use crate::core::Manifest;
use crate::resolver::errors::{ResolveError, ValidationErrors};
use crate::resolver::graph::DepGraph;
use crate::util::InternedString;

/// Where a resolution run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unvalidated,
    Validating,
    Valid,
    Invalid,
}

/// A single resolution run over an immutable manifest snapshot.
///
/// Pure, synchronous, single-threaded: no I/O, no shared state between
/// runs. Independent runs over distinct manifests may execute in
/// parallel with no coordination. Validation and ordering are bounded
/// by O(targets + edges) and always run to completion or fail
/// deterministically.
pub struct Resolution<'m> {
    /// The frozen manifest snapshot; callers must not mutate it while
    /// the run is live (the borrow enforces this)
    manifest: &'m Manifest,

    state: ResolutionState,

    /// Present from the moment stage-1 validation succeeds
    graph: Option<DepGraph>,

    /// Build order, computed at validation success
    order: Vec<InternedString>,

    /// Errors of a failed run, replayed on repeated calls
    failure: Option<ValidationErrors>,

    /// Memoized transitive closures, filled in dependency order on
    /// first demand
    closures: Option<HashMap<InternedString, BTreeSet<InternedString>>>,
}

impl<'m> Resolution<'m> {
    /// Start a resolution run over a manifest snapshot.
    pub fn new(manifest: &'m Manifest) -> Self {
        Resolution {
            manifest,
            state: ResolutionState::Unvalidated,
            graph: None,
            order: Vec::new(),
            failure: None,
            closures: None,
        }
    }

    /// Current state of the run.
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Validate referential integrity and acyclicity.
    ///
    /// Stage 1 collects unknown-dependency (and dangling-alias) errors
    /// for the whole manifest; if any exist, validation stops there and
    /// surfaces the full set, since cycle detection assumes a fully
    /// resolvable graph. Stage 2 runs cycle detection and reports the
    /// complete cycle path. Idempotent: re-validating a finished run
    /// replays its outcome.
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        match self.state {
            ResolutionState::Valid => return Ok(()),
            ResolutionState::Invalid => {
                return Err(self.failure.clone().expect("invalid run without errors"));
            }
            ResolutionState::Unvalidated | ResolutionState::Validating => {}
        }

        self.state = ResolutionState::Validating;

        let graph = match DepGraph::from_manifest(self.manifest) {
            Ok(graph) => graph,
            Err(errors) => return Err(self.fail(errors)),
        };

        if let Some(cycle) = graph.find_cycle() {
            let error = ResolveError::CyclicDependency {
                cycle: cycle.iter().map(|n| n.to_string()).collect(),
            };
            return Err(self.fail(ValidationErrors::new(vec![error])));
        }

        tracing::debug!(
            targets = graph.len(),
            "dependency graph validated"
        );

        self.order = graph.topo_order();
        self.graph = Some(graph);
        self.state = ResolutionState::Valid;
        Ok(())
    }

    fn fail(&mut self, errors: ValidationErrors) -> ValidationErrors {
        self.state = ResolutionState::Invalid;
        self.failure = Some(errors.clone());
        errors
    }

    /// The deterministic build order: every dependency strictly before
    /// each of its dependents, lexical tie-break among peers.
    pub fn build_order(&self) -> Result<&[InternedString], ResolveError> {
        if self.state != ResolutionState::Valid {
            return Err(ResolveError::NotValidated {
                operation: "build_order",
            });
        }
        Ok(&self.order)
    }

    /// The validated graph.
    pub fn graph(&self) -> Result<&DepGraph, ResolveError> {
        if self.state != ResolutionState::Valid {
            return Err(ResolveError::NotValidated { operation: "graph" });
        }
        Ok(self.graph.as_ref().expect("valid run without graph"))
    }

    /// All targets reachable from `name` via dependency edges, excluding
    /// `name` itself. Consumers derive effective include paths and link
    /// sets from this.
    ///
    /// Closures are memoized for the run: the first call computes every
    /// closure in dependency order (closure(A) is the union of the
    /// closures of A's direct dependencies plus those dependencies),
    /// so shared subtrees are never recomputed per target.
    pub fn transitive_closure(
        &mut self,
        name: &str,
    ) -> Result<&BTreeSet<InternedString>, ResolveError> {
        if self.state != ResolutionState::Valid {
            return Err(ResolveError::NotValidated {
                operation: "transitive_closure",
            });
        }

        let canonical = self.manifest.canonicalize(name).ok_or_else(|| {
            ResolveError::UnknownDependency {
                target: name.to_string(),
                missing: name.to_string(),
            }
        })?;

        if self.closures.is_none() {
            self.closures = Some(self.compute_closures());
        }

        Ok(&self.closures.as_ref().unwrap()[&canonical])
    }

    fn compute_closures(&self) -> HashMap<InternedString, BTreeSet<InternedString>> {
        let graph = self.graph.as_ref().expect("valid run without graph");
        let mut closures: HashMap<InternedString, BTreeSet<InternedString>> =
            HashMap::with_capacity(self.order.len());

        // Dependency order guarantees every dep's closure is already
        // present when its dependents are reached.
        for &name in &self.order {
            let mut closure = BTreeSet::new();
            for dep in graph.deps(name) {
                closure.insert(dep);
                closure.extend(closures[&dep].iter().copied());
            }
            closures.insert(name, closure);
        }

        closures
    }
}
