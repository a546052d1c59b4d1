//! Slipway - target dependency graph model and resolver for C/C++ packages
//!
//! This crate provides the graph component a build system sits on top of:
//! an immutable manifest model of declared targets, referential-integrity
//! and acyclicity validation, deterministic topological build ordering, and
//! per-target transitive dependency closures. Compiling sources, platform
//! gating, and packaging are external collaborators that consume the
//! resolved graph.

pub mod core;
pub mod resolver;
pub mod util;

pub use core::{manifest::Manifest, target::Target};

pub use resolver::{BuildPlan, Resolution, ResolveError, ValidationErrors};
pub use util::InternedString;
