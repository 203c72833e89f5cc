//! Graph construction errors.

use std::fmt;

use makegen_common::Location;
use makegen_config::ConfigError;
use makegen_scan::ScanError;

/// Fatal errors raised while building a unit's include graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A required (non-system) include could not be resolved anywhere.
    #[error("{}", render_not_found(.name, .chain))]
    IncludeNotFound {
        /// The unresolved name.
        name: String,
        /// The full ancestor inclusion chain, innermost first.
        chain: Vec<Location>,
    },

    /// A declared source file does not exist.
    #[error("makegen: error: cannot find source '{name}' in {unit}")]
    SourceNotFound {
        /// The declared source name.
        name: String,
        /// The unit directory.
        unit: String,
    },

    /// A declared source has an unrecognized suffix.
    #[error("makegen: error: unknown type of source '{name}' in {unit}")]
    UnknownSourceType {
        /// The declared source name.
        name: String,
        /// The unit directory.
        unit: String,
    },

    /// A scanner reported a fatal error.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Variable expansion or descriptor parsing failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Renders the resolution failure with its full inclusion chain, one
/// ancestor per line, to aid diagnosis.
fn render_not_found(name: &str, chain: &[Location]) -> String {
    let mut out = String::new();
    match chain.first() {
        Some(loc) => {
            let _ = fmt::Write::write_fmt(
                &mut out,
                format_args!("{loc}: error: include '{name}' not found"),
            );
        }
        None => {
            let _ = fmt::Write::write_fmt(
                &mut out,
                format_args!("makegen: error: include '{name}' not found"),
            );
        }
    }
    for loc in chain.iter().skip(1) {
        let _ = fmt::Write::write_fmt(&mut out, format_args!("\n  included from {loc}"));
    }
    out
}
