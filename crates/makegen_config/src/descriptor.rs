//! Build-descriptor parsing.

use std::path::Path;

use makegen_common::Location;

use crate::error::ConfigError;
use crate::vars::VarStore;

/// The sentinel comment separating user content from generated rules.
///
/// Everything from the first sentinel line onward is discarded on load and
/// regenerated on output.
pub const SENTINEL: &str = "### Dependencies:";

/// A parsed build descriptor: the preserved pre-sentinel text and the
/// variable bindings it declared.
#[derive(Clone, Debug, Default)]
pub struct Descriptor {
    /// The pre-sentinel content, verbatim, to be copied into the output.
    pub preamble: String,
    /// The `NAME = value` bindings found in the preamble.
    pub vars: VarStore,
}

/// Reads and parses the descriptor at `path`.
pub fn load_descriptor(path: &Path) -> Result<Descriptor, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(path, &content)
}

/// Parses descriptor text.
///
/// Lines before the sentinel must each be a comment, a blank line, or a
/// `NAME = value` assignment; anything else is fatal. Content from the
/// sentinel onward (left over from a previous run) is discarded.
pub fn parse_descriptor(path: &Path, content: &str) -> Result<Descriptor, ConfigError> {
    let mut descriptor = Descriptor::default();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with(SENTINEL) {
            break;
        }
        descriptor.preamble.push_str(line);
        descriptor.preamble.push('\n');
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match VarStore::parse_assignment(line) {
            Some((name, value)) => descriptor.vars.set(name, value),
            None => {
                return Err(ConfigError::MalformedAssignment {
                    location: Location::new(path, (idx + 1) as u32),
                })
            }
        }
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Descriptor, ConfigError> {
        parse_descriptor(Path::new("dlls/foo/Makefile.in"), content)
    }

    #[test]
    fn assignments_and_comments() {
        let d = parse("# foo module\nMODULE = foo.dll\n\nSOURCES = main.c\n").unwrap();
        assert_eq!(d.vars.get_raw("MODULE"), Some("foo.dll"));
        assert_eq!(d.vars.get_raw("SOURCES"), Some("main.c"));
        assert!(d.preamble.contains("# foo module"));
    }

    #[test]
    fn sentinel_content_discarded() {
        let d = parse("MODULE = foo.dll\n### Dependencies:\n\nfoo.o: main.c\n").unwrap();
        assert_eq!(d.preamble, "MODULE = foo.dll\n");
        assert_eq!(d.vars.get_raw("MODULE"), Some("foo.dll"));
    }

    #[test]
    fn preamble_preserved_verbatim() {
        let input = "# comment\n\nMODULE = foo.dll\n";
        let d = parse(input).unwrap();
        assert_eq!(d.preamble, input);
    }

    #[test]
    fn malformed_line_fatal() {
        let err = parse("MODULE = foo.dll\nthis is not an assignment\n").unwrap_err();
        match err {
            ConfigError::MalformedAssignment { location } => {
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn redefinition_last_wins() {
        let d = parse("X = 1\nX = 2\n").unwrap();
        assert_eq!(d.vars.get_raw("X"), Some("2"));
    }
}
