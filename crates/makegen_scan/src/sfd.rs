//! Scanner for font descriptors (`.sfd`).

use makegen_common::Location;
use makegen_source::{CategoryMeta, FontRequest, PhysicalFile};

use crate::directive::{read_until, split_token};
use crate::error::ScanError;

/// Scans a font descriptor's comment fields for sub-font directives.
///
/// The `Comment:`/`UComment:` field value uses a literal `\n` escape as its
/// internal line separator; each embedded line of the form
/// `#pragma makedep font: TARGET ARGS...` requests one generated sub-font.
pub(crate) fn scan_sfd(file: &mut PhysicalFile, content: &str) -> Result<(), ScanError> {
    let mut fonts = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = (idx + 1) as u32;
        let trimmed = raw.trim_start();
        let value = if let Some(v) = trimmed.strip_prefix("Comment:") {
            v
        } else if let Some(v) = trimmed.strip_prefix("UComment:") {
            v
        } else {
            continue;
        };
        let loc = Location::new(file.path.clone(), line);

        let value = value.trim_start();
        let value = if let Some(quoted) = value.strip_prefix('"') {
            read_until(quoted, '"', &loc)?.0
        } else {
            value
        };

        for segment in value.split("\\n") {
            let Some(rest) = segment.trim().strip_prefix("#pragma makedep font:") else {
                continue;
            };
            let (target, args) = split_token(rest);
            if target.is_empty() {
                return Err(ScanError::MalformedDirective {
                    location: loc.clone(),
                    directive: "font".to_string(),
                });
            }
            fonts.push(FontRequest {
                target: target.to_string(),
                args: args.to_string(),
            });
        }
    }
    if !fonts.is_empty() {
        file.meta = CategoryMeta::Fonts(fonts);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str) -> Result<PhysicalFile, ScanError> {
        let mut file = PhysicalFile::new("courier.sfd");
        scan_sfd(&mut file, content)?;
        Ok(file)
    }

    #[test]
    fn single_font_request() {
        let file =
            scan("Comment: \"#pragma makedep font: coure.fon 13 1252\"\n").unwrap();
        match &file.meta {
            CategoryMeta::Fonts(fonts) => {
                assert_eq!(fonts.len(), 1);
                assert_eq!(fonts[0].target, "coure.fon");
                assert_eq!(fonts[0].args, "13 1252");
            }
            other => panic!("unexpected meta: {other:?}"),
        }
    }

    #[test]
    fn multiple_requests_escaped_newlines() {
        let file = scan(
            "UComment: \"#pragma makedep font: coure.fon 13 1252\\n#pragma makedep font: couree.fon 13 1253\"\n",
        )
        .unwrap();
        match &file.meta {
            CategoryMeta::Fonts(fonts) => {
                assert_eq!(fonts.len(), 2);
                assert_eq!(fonts[1].target, "couree.fon");
            }
            other => panic!("unexpected meta: {other:?}"),
        }
    }

    #[test]
    fn comment_without_directive() {
        let file = scan("Comment: \"Converted by FontForge\"\nAscent: 800\n").unwrap();
        assert_eq!(file.meta, CategoryMeta::None);
    }

    #[test]
    fn missing_target_fatal() {
        let err = scan("Comment: \"#pragma makedep font:\"\n").unwrap_err();
        assert!(matches!(err, ScanError::MalformedDirective { .. }));
    }

    #[test]
    fn unterminated_comment_fatal() {
        let err = scan("Comment: \"#pragma makedep font: a.fon\n").unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedQuote { .. }));
    }
}
