//! Low-level directive token helpers shared by the scanners.

use makegen_common::Location;
use makegen_source::{DepKind, FileFlags, PhysicalFile};

use crate::error::ScanError;

/// Splits the leading whitespace-delimited token off `s`.
///
/// Returns the token and the remainder with leading whitespace stripped.
pub fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

/// Reads a name delimited by `close`, with `s` positioned just after the
/// opening delimiter.
///
/// Returns the name and the remainder after the closing delimiter.
pub fn read_until<'a>(s: &'a str, close: char, loc: &Location) -> Result<(&'a str, &'a str), ScanError> {
    match s.find(close) {
        Some(idx) => Ok((&s[..idx], &s[idx + close.len_utf8()..])),
        None => Err(ScanError::UnterminatedQuote {
            location: loc.clone(),
        }),
    }
}

/// Parses an include-style argument: `"name"` or `<name>`.
///
/// Returns the name and `true` when the angle-bracket (system) form was used.
pub fn read_include_arg<'a>(
    s: &'a str,
    directive: &str,
    loc: &Location,
) -> Result<(&'a str, bool), ScanError> {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('"') {
        let (name, _) = read_until(rest, '"', loc)?;
        Ok((name, false))
    } else if let Some(rest) = s.strip_prefix('<') {
        let (name, _) = read_until(rest, '>', loc)?;
        Ok((name, true))
    } else {
        Err(ScanError::MalformedDirective {
            location: loc.clone(),
            directive: directive.to_string(),
        })
    }
}

/// Rejects include names that escape upward through `..` components.
pub fn check_relative(name: &str, loc: &Location) -> Result<(), ScanError> {
    if name.split('/').any(|c| c == "..") {
        return Err(ScanError::RelativePath {
            location: loc.clone(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Reads a C string literal with backslash escapes, with `s` positioned just
/// after the opening quote.
///
/// Returns the unescaped content and the remainder after the closing quote.
pub fn read_string_literal<'a>(
    s: &'a str,
    loc: &Location,
) -> Result<(String, &'a str), ScanError> {
    let mut out = String::new();
    let mut chars = s.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, &s[idx + 1..])),
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(ch),
        }
    }
    Err(ScanError::UnterminatedQuote {
        location: loc.clone(),
    })
}

/// Parses the argument list of a `#pragma makedep` directive and applies it
/// to `file`.
///
/// Flag words accumulate into [`FileFlags`]; `depend` consumes the rest of
/// the line as extra dependency names (bare or quoted). Unrecognized words
/// are ignored.
pub fn parse_makedep_pragma(
    file: &mut PhysicalFile,
    line: u32,
    args: &str,
    loc: &Location,
) -> Result<(), ScanError> {
    let mut rest = args.trim_start();
    while !rest.is_empty() {
        let (word, after) = split_token(rest);
        rest = after;
        match word {
            "install" => file.flags |= FileFlags::INSTALL,
            "header" => file.flags |= FileFlags::IDL_HEADER,
            "client" => file.flags |= FileFlags::IDL_CLIENT,
            "server" => file.flags |= FileFlags::IDL_SERVER,
            "ident" => file.flags |= FileFlags::IDL_IDENT,
            "proxy" => file.flags |= FileFlags::IDL_PROXY,
            "typelib" => file.flags |= FileFlags::IDL_TYPELIB,
            "regtypelib" => file.flags |= FileFlags::IDL_REGTYPELIB,
            "po" => file.flags |= FileFlags::RC_PO,
            "implib" => file.flags |= FileFlags::C_IMPLIB,
            "depend" => {
                while !rest.is_empty() {
                    let name;
                    if let Some(quoted) = rest.strip_prefix('"') {
                        let (n, after_quote) = read_until(quoted, '"', loc)?;
                        name = n.to_string();
                        rest = after_quote.trim_start();
                    } else {
                        let (n, after_token) = split_token(rest);
                        name = n.to_string();
                        rest = after_token;
                    }
                    check_relative(&name, loc)?;
                    file.add_dependency(line, DepKind::Local, name)?;
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

    fn loc() -> Location {
        Location::new("test.c", 1)
    }

    #[test]
    fn split_leading_token() {
        assert_eq!(split_token("  include \"x.h\""), ("include", "\"x.h\""));
        assert_eq!(split_token("install"), ("install", ""));
    }

    #[test]
    fn include_arg_quoted() {
        let (name, system) = read_include_arg("\"foo.h\"", "include", &loc()).unwrap();
        assert_eq!(name, "foo.h");
        assert!(!system);
    }

    #[test]
    fn include_arg_system() {
        let (name, system) = read_include_arg("<stdarg.h>", "include", &loc()).unwrap();
        assert_eq!(name, "stdarg.h");
        assert!(system);
    }

    #[test]
    fn include_arg_unterminated() {
        let err = read_include_arg("\"foo.h", "include", &loc()).unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedQuote { .. }));
    }

    #[test]
    fn include_arg_malformed() {
        let err = read_include_arg("foo.h", "include", &loc()).unwrap_err();
        assert!(matches!(err, ScanError::MalformedDirective { .. }));
    }

    #[test]
    fn relative_rejected() {
        assert!(check_relative("../secret.h", &loc()).is_err());
        assert!(check_relative("sub/../x.h", &loc()).is_err());
        assert!(check_relative("sub/x.h", &loc()).is_ok());
    }

    #[test]
    fn string_literal_escapes() {
        let (content, rest) = read_string_literal("#include \\\"foo.h\\\"\")", &loc()).unwrap();
        assert_eq!(content, "#include \"foo.h\"");
        assert_eq!(rest, ")");
    }

    #[test]
    fn pragma_flags_accumulate() {
        let mut file = PhysicalFile::new("x.idl");
        parse_makedep_pragma(&mut file, 1, "header proxy", &loc()).unwrap();
        assert!(file.flags.contains(FileFlags::IDL_HEADER));
        assert!(file.flags.contains(FileFlags::IDL_PROXY));
    }

    #[test]
    fn pragma_depend_adds_records() {
        let mut file = PhysicalFile::new("x.c");
        parse_makedep_pragma(&mut file, 4, "depend foo.h \"bar baz.h\"", &loc()).unwrap();
        let names: Vec<&str> = file.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["foo.h", "bar baz.h"]);
        assert_eq!(file.records[0].line, 4);
    }
}
