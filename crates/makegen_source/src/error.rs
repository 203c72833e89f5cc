//! Structural errors detected while recording dependencies.

use makegen_common::Location;

/// Structural errors in a file's dependency list.
///
/// These are always fatal; the run aborts rather than silently reordering
/// the offending records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The platform configuration header was included after other headers.
    #[error("{location}: error: {name} must be included before anything else")]
    ConfigNotFirst {
        /// Where the late include appeared.
        location: Location,
        /// The offending header name.
        name: String,
    },

    /// The portability header was included without the configuration header
    /// directly before it.
    #[error("{location}: error: config.h must be included before {name}")]
    PortWithoutConfig {
        /// Where the include appeared.
        location: Location,
        /// The offending header name.
        name: String,
    },
}
