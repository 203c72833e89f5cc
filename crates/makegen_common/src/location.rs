//! Source locations attached to fatal errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A file/line pair identifying where in an input file an error was detected.
///
/// Rendered as `file:line`, matching the `file:line: error: message` format
/// the tool prints on standard error.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Location {
    /// Path of the input file, as the user referred to it.
    pub file: PathBuf,
    /// 1-indexed line number within the file.
    pub line: u32,
}

impl Location {
    /// Creates a location from a path and a 1-indexed line number.
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
