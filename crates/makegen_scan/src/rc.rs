//! Scanner for resource scripts (`.rc`).

use makegen_common::Location;
use makegen_source::{DepKind, PhysicalFile};

use crate::directive::{
    check_relative, parse_makedep_pragma, read_include_arg, read_until, split_token,
};
use crate::error::ScanError;

/// Scans a resource script.
///
/// A `/* @makedep: NAME */` comment declares an explicit dependency on a
/// resource data file (the name may be quoted); everything else falls back
/// to the generic `#` directive scan shared with C sources.
pub(crate) fn scan_rc(file: &mut PhysicalFile, content: &str) -> Result<(), ScanError> {
    for (idx, raw) in content.lines().enumerate() {
        let line = (idx + 1) as u32;
        let trimmed = raw.trim_start();
        let loc = Location::new(file.path.clone(), line);

        if let Some(marker) = trimmed.find("@makedep:") {
            let rest = trimmed[marker + "@makedep:".len()..].trim_start();
            let name = if let Some(quoted) = rest.strip_prefix('"') {
                read_until(quoted, '"', &loc)?.0.to_string()
            } else {
                match rest.find("*/") {
                    Some(end) => rest[..end].trim_end().to_string(),
                    None => rest.to_string(),
                }
            };
            if name.is_empty() {
                return Err(ScanError::MalformedDirective {
                    location: loc,
                    directive: "@makedep".to_string(),
                });
            }
            check_relative(&name, &loc)?;
            file.add_dependency(line, DepKind::Local, name)?;
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
