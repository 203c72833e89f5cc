//! Shared utilities for the makegen build-file generator.
//!
//! This crate provides [`ContentHash`] for idempotence checks in the output
//! layer, path manipulation helpers used by the resolver and rule emitter,
//! and the [`Location`] type attached to fatal errors so they can be
//! rendered as `file:line: error: message`.

#![warn(missing_docs)]

pub mod hash;
pub mod location;
pub mod paths;

pub use hash::ContentHash;
pub use location::Location;
pub use paths::{file_name, normalize, relative_path, replace_extension, strip_extension};
