//! Output-layer error types.

use std::path::PathBuf;

/// Fatal errors raised while writing generated output.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A file could not be created, written, or renamed.
    #[error("makegen: error: cannot write {}: {source}", path.display())]
    Io {
        /// The path the operation was targeting.
        path: PathBuf,
        /// The underlying operating-system error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_message_includes_os_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let err = EmitError::Io {
            path: PathBuf::from("dlls/foo/Makefile"),
            source: io,
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("makegen: error: cannot write dlls/foo/Makefile:"));
        assert!(msg.contains("Permission denied"));
    }
}
