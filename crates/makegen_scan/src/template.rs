//! Scanner for templated text files (`.in`) and man-page templates
//! (`.man.in`).

use makegen_common::Location;
use makegen_source::{CategoryMeta, DepKind, ManPage, PhysicalFile, CONFIG_HEADER};

use crate::directive::split_token;
use crate::error::ScanError;

/// Scans a `.in` template.
///
/// Every template is regenerated whenever the platform configuration
/// changes, so each one depends on the configuration pseudo-header. When
/// `man_page` is set, the `.TH` directive's program name and section number
/// are extracted; they later decide the page's install path.
pub(crate) fn scan_template(
    file: &mut PhysicalFile,
    content: &str,
    man_page: bool,
) -> Result<(), ScanError> {
    file.add_dependency(1, DepKind::Local, CONFIG_HEADER)?;
    if !man_page {
        return Ok(());
    }
    for (idx, raw) in content.lines().enumerate() {
        let line = (idx + 1) as u32;
        let Some(rest) = raw.trim_start().strip_prefix(".TH") else {
            continue;
        };
        let loc = Location::new(file.path.clone(), line);
        let (program, rest) = split_token(rest);
        let (section, _) = split_token(rest);
        let program = program.trim_matches('"');
        let section = section.trim_matches('"');
        if program.is_empty() || section.is_empty() {
            return Err(ScanError::MalformedDirective {
                location: loc,
                directive: ".TH".to_string(),
            });
        }
        file.meta = CategoryMeta::ManPage(ManPage {
            program: program.to_ascii_lowercase(),
            section: section.to_string(),
        });
        break;
    }
    Ok(())
}
