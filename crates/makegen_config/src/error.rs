//! Errors raised while loading descriptors or expanding variables.

use std::path::PathBuf;

use makegen_common::Location;

/// Fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A `$(NAME)` reference was missing its closing parenthesis.
    #[error("makegen: error: unmatched '(' in '{text}'")]
    UnmatchedParen {
        /// The text being expanded when the error was detected.
        text: String,
    },

    /// A variable expanded into itself, directly or indirectly.
    #[error("makegen: error: recursive definition of variable '{name}'")]
    RecursiveVariable {
        /// The variable whose expansion re-entered itself.
        name: String,
    },

    /// A pre-sentinel descriptor line was neither a comment, a blank line,
    /// nor an assignment.
    #[error("{location}: error: malformed assignment")]
    MalformedAssignment {
        /// The offending line.
        location: Location,
    },

    /// The descriptor file could not be read.
    #[error("makegen: error: cannot open {}: {source}", path.display())]
    Io {
        /// The descriptor path.
        path: PathBuf,
        /// The underlying operating-system error.
        source: std::io::Error,
    },
}
