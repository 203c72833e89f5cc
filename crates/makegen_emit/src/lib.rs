//! Rule emission and transactional output.
//!
//! This crate turns a fully loaded [`BuildUnit`](makegen_graph::BuildUnit)
//! into build-file text (compile/generate rules, install/clean/test lists,
//! aggregate targets) and writes it through a temp-file guard so repeated
//! runs are idempotent and aborted runs leave no partial output.

#![warn(missing_docs)]

pub mod artifacts;
pub mod error;
pub mod output;
pub mod rules;

pub use artifacts::{ignore_list, language_list, test_registry};
pub use error::EmitError;
pub use output::OutputFile;
pub use rules::{emit_unit, InstallClass, InstallEntry};
