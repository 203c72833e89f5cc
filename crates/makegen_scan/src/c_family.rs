//! Scanner for C-family sources: `.c`, `.h`, `.inl`, `.y`, `.l`, `.m`, `.mc`.

use makegen_common::Location;
use makegen_source::{DepKind, PhysicalFile};

use crate::directive::{check_relative, parse_makedep_pragma, read_include_arg, split_token};
use crate::error::ScanError;

/// Line-oriented scan for `#` directives.
///
/// Recognizes `#include "X"` / `#include <X>`, `#import` (only when
/// `allow_import` is set, i.e. for Objective-C sources), and
/// `#pragma makedep ...`.
pub(crate) fn scan_c_family(
    file: &mut PhysicalFile,
    content: &str,
    allow_import: bool,
) -> Result<(), ScanError> {
    for (idx, raw) in content.lines().enumerate() {
        let line = (idx + 1) as u32;
        let Some(after_hash) = raw.trim_start().strip_prefix('#') else {
            continue;
        };
        let loc = Location::new(file.path.clone(), line);
        let (word, rest) = split_token(after_hash);
        match word {
            "include" => {
                let (name, system) = read_include_arg(rest, "include", &loc)?;
                check_relative(name, &loc)?;
                let kind = if system { DepKind::System } else { DepKind::Local };
                file.add_dependency(line, kind, name)?;
            }
            "import" if allow_import => {
                let (name, system) = read_include_arg(rest, "import", &loc)?;
                check_relative(name, &loc)?;
                let kind = if system { DepKind::System } else { DepKind::Local };
                file.add_dependency(line, kind, name)?;
            }
            "pragma" => {
                let (keyword, args) = split_token(rest);
                if keyword == "makedep" {
                    parse_makedep_pragma(file, line, args, &loc)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use makegen_source::{FileFlags, SourceError};

    fn scan(content: &str) -> Result<PhysicalFile, ScanError> {
        let mut file = PhysicalFile::new("main.c");
        scan_c_family(&mut file, content, false)?;
        Ok(file)
    }

    #[test]
    fn quoted_and_system_includes() {
        let file = scan("#include \"config.h\"\n#include <stdarg.h>\n#include \"winbase.h\"\n")
            .unwrap();
        assert_eq!(file.records.len(), 3);
        assert_eq!(file.records[0].kind, DepKind::Local);
        assert_eq!(file.records[1].kind, DepKind::System);
        assert_eq!(file.records[1].name, "stdarg.h");
        assert_eq!(file.records[2].line, 3);
    }

    #[test]
    fn indented_directives() {
        let file = scan("  #  include \"foo.h\"\n").unwrap();
        assert_eq!(file.records[0].name, "foo.h");
    }

    #[test]
    fn non_directive_lines_ignored() {
        let file = scan("int main(void) { return 0; }\n/* #include \"no.h\" */\n").unwrap();
        assert!(file.records.is_empty());
    }

    #[test]
    fn import_only_for_objc() {
        let file = scan("#import \"foo.h\"\n").unwrap();
        assert!(file.records.is_empty());

        let mut objc = PhysicalFile::new("view.m");
        scan_c_family(&mut objc, "#import \"foo.h\"\n", true).unwrap();
        assert_eq!(objc.records[0].name, "foo.h");
    }

    #[test]
    fn pragma_install() {
        let file = scan("#pragma makedep install\n").unwrap();
        assert!(file.flags.contains(FileFlags::INSTALL));
    }

    #[test]
    fn unterminated_include_fatal() {
        let err = scan("#include \"broken.h\n").unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedQuote { .. }));
    }

    #[test]
    fn relative_include_fatal() {
        let err = scan("#include \"../other/foo.h\"\n").unwrap_err();
        assert!(matches!(err, ScanError::RelativePath { .. }));
    }

    #[test]
    fn config_ordering_enforced() {
        let err = scan("#include <stdarg.h>\n#include \"config.h\"\n").unwrap_err();
        assert!(matches!(
            err,
            ScanError::Structure(SourceError::ConfigNotFirst { .. })
        ));
    }
}
