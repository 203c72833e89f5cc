//! Scanner for interface-definition (`.idl`) files.

use makegen_common::Location;
use makegen_source::{DepKind, PhysicalFile};

use crate::directive::{
    check_relative, parse_makedep_pragma, read_include_arg, read_string_literal, read_until,
    split_token,
};
use crate::error::ScanError;

/// Scans an interface definition for `import`, `importlib`, `cpp_quote`
/// includes, and ordinary `#` directives (idl files may carry preprocessor
/// includes and `#pragma makedep` output flags).
pub(crate) fn scan_idl(file: &mut PhysicalFile, content: &str) -> Result<(), ScanError> {
    for (idx, raw) in content.lines().enumerate() {
        let line = (idx + 1) as u32;
        let trimmed = raw.trim_start();
        let loc = Location::new(file.path.clone(), line);

        // importlib first: "import" is its prefix.
        if let Some(rest) = trimmed.strip_prefix("importlib") {
            let name = read_paren_string(rest, &loc)?;
            file.add_dependency(line, DepKind::ImportLib, name)?;
        } else if let Some(rest) = trimmed.strip_prefix("import") {
            let rest = rest.trim_start();
            let Some(quoted) = rest.strip_prefix('"') else {
                return Err(ScanError::MalformedDirective {
                    location: loc,
                    directive: "import".to_string(),
                });
            };
            let (name, _) = read_until(quoted, '"', &loc)?;
            check_relative(name, &loc)?;
            file.add_dependency(line, DepKind::Import, name)?;
        } else if let Some(rest) = trimmed.strip_prefix("cpp_quote") {
            scan_cpp_quote(file, line, rest, &loc)?;
        } else if let Some(after_hash) = trimmed.strip_prefix('#') {
            let (word, rest) = split_token(after_hash);
            match word {
                "include" => {
                    let (name, system) = read_include_arg(rest, "include", &loc)?;
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
    }
    Ok(())
}

/// Parses `("name")`, returning the quoted name.
fn read_paren_string<'a>(rest: &'a str, loc: &Location) -> Result<&'a str, ScanError> {
    let rest = rest.trim_start();
    let Some(inner) = rest.strip_prefix('(') else {
        return Err(ScanError::MissingParen {
            location: loc.clone(),
        });
    };
    let inner = inner.trim_start();
    let Some(quoted) = inner.strip_prefix('"') else {
        return Err(ScanError::MalformedDirective {
            location: loc.clone(),
            directive: "importlib".to_string(),
        });
    };
    let (name, after) = read_until(quoted, '"', loc)?;
    if !after.trim_start().starts_with(')') {
        return Err(ScanError::MissingParen {
            location: loc.clone(),
        });
    }
    Ok(name)
}

/// Handles `cpp_quote("#include ...")`, which emulates a C include that will
/// appear inside the generated header.
fn scan_cpp_quote(
    file: &mut PhysicalFile,
    line: u32,
    rest: &str,
    loc: &Location,
) -> Result<(), ScanError> {
    let rest = rest.trim_start();
    let Some(inner) = rest.strip_prefix('(') else {
        return Err(ScanError::MissingParen {
            location: loc.clone(),
        });
    };
    let inner = inner.trim_start();
    let Some(quoted) = inner.strip_prefix('"') else {
        // Not a string argument; nothing to scan.
        return Ok(());
    };
    let (content, after) = read_string_literal(quoted, loc)?;
    if !after.trim_start().starts_with(')') {
        return Err(ScanError::MissingParen {
            location: loc.clone(),
        });
    }
    let Some(after_hash) = content.trim_start().strip_prefix('#') else {
        return Ok(());
    };
    let (word, args) = split_token(after_hash);
    if word != "include" {
        return Ok(());
    }
    let (name, system) = read_include_arg(args, "include", loc)?;
    check_relative(name, loc)?;
    let kind = if system {
        DepKind::CppQuotedSystem
    } else {
        DepKind::CppQuoted
    };
    file.add_dependency(line, kind, name)?;
    Ok(())
}
