//! Scanner error types.

use std::path::PathBuf;

use makegen_common::Location;
use makegen_source::SourceError;

/// Fatal errors raised while scanning a file for dependencies.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A quoted name or string literal was not terminated on its line.
    #[error("{location}: error: unterminated string in directive")]
    UnterminatedQuote {
        /// Where the open quote appeared.
        location: Location,
    },

    /// A parenthesized directive argument was missing its closing `)`.
    #[error("{location}: error: missing ')' in directive")]
    MissingParen {
        /// Where the directive appeared.
        location: Location,
    },

    /// A directive was recognized but its argument could not be parsed.
    #[error("{location}: error: malformed {directive} directive")]
    MalformedDirective {
        /// Where the directive appeared.
        location: Location,
        /// The directive keyword (e.g. `include`).
        directive: String,
    },

    /// An include referenced a name with an upward relative path.
    #[error("{location}: error: relative path not allowed in include '{name}'")]
    RelativePath {
        /// Where the include appeared.
        location: Location,
        /// The offending name.
        name: String,
    },

    /// The dependency list violated a structural ordering invariant.
    #[error(transparent)]
    Structure(#[from] SourceError),

    /// The file could not be read.
    #[error("makegen: error: cannot open {}: {source}", path.display())]
    Io {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying operating-system error.
        source: std::io::Error,
    },
}
