//! Per-unit include graphs: resolution, expansion, and derived sources.
//!
//! This crate owns the [`BuildUnit`] and its [`IncludeNode`] arena, the
//! ordered-strategy include resolver, the memoized recursive include-graph
//! builder, and the generated-source deriver that synthesizes extra build
//! artifacts from directive flags.

#![warn(missing_docs)]

pub mod builder;
pub mod context;
pub mod derive;
pub mod error;
pub mod node;
pub mod resolver;
pub mod summary;
pub mod unit;

pub use builder::load_unit_sources;
pub use context::RunContext;
pub use error::GraphError;
pub use node::{IncludeNode, NodeId};
pub use summary::{summarize_unit, SourceSummary, UnitSummary};
pub use unit::BuildUnit;
