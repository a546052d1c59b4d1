//! Dependency graph validation and linearization.
//!
//! The resolver is pure and deterministic: it consumes a frozen
//! [`crate::core::Manifest`] snapshot, validates referential integrity
//! and acyclicity, and produces a stable topological build order plus
//! per-target transitive closures. All I/O happens before resolution.

pub mod errors;
pub mod graph;
pub mod plan;
pub mod resolve;

pub use errors::{ResolveError, ValidationErrors};
pub use graph::DepGraph;
pub use plan::BuildPlan;
pub use resolve::{Resolution, ResolutionState};
