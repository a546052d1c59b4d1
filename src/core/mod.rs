//! Core data structures for Slipway.
//!
//! This module contains the manifest model: immutable target records and
//! the collection they are registered into. The resolver in
//! [`crate::resolver`] consumes these, never mutates them.

pub mod manifest;
pub mod target;

pub use manifest::{Manifest, MANIFEST_NAME};
pub use target::Target;
