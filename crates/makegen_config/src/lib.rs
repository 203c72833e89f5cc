//! Build-descriptor loading and make-style variable handling.
//!
//! A build descriptor is a `Makefile.in`-style file: everything before the
//! sentinel comment line is user content (comments, blank lines, `NAME =
//! value` assignments) that is preserved verbatim; everything after it is
//! regenerated output. This crate parses descriptors into a [`VarStore`],
//! provides `$(NAME)` expansion with override precedence through
//! [`VarScope`], and extracts the typed [`UnitAttrs`] a build unit is
//! configured with.

#![warn(missing_docs)]

pub mod attrs;
pub mod descriptor;
pub mod error;
pub mod vars;

pub use attrs::UnitAttrs;
pub use descriptor::{load_descriptor, parse_descriptor, Descriptor, SENTINEL};
pub use error::ConfigError;
pub use vars::{VarScope, VarStore};
