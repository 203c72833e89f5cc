//! Category dispatch: one entry point for scanning any file.

use std::path::Path;

use makegen_source::PhysicalFile;

use crate::c_family::scan_c_family;
use crate::category::SourceCategory;
use crate::error::ScanError;
use crate::idl::scan_idl;
use crate::rc::scan_rc;
use crate::sfd::scan_sfd;
use crate::template::scan_template;

/// Scans `content` according to `category` and returns the completed
/// [`PhysicalFile`].
///
/// [`Unknown`](SourceCategory::Unknown), translation catalogs, and `.x`
/// templates produce no dependency records; whether an unknown suffix is
/// acceptable at all is the caller's decision (fatal for declared sources,
/// opaque for discovered includes).
pub fn scan(
    category: SourceCategory,
    path: &Path,
    content: &str,
) -> Result<PhysicalFile, ScanError> {
    let mut file = PhysicalFile::new(path);
    match category {
        SourceCategory::ObjC => scan_c_family(&mut file, content, true)?,
        SourceCategory::C
        | SourceCategory::Header
        | SourceCategory::Inline
        | SourceCategory::Yacc
        | SourceCategory::Lex
        | SourceCategory::MessageCatalog => scan_c_family(&mut file, content, false)?,
        SourceCategory::Idl => scan_idl(&mut file, content)?,
        SourceCategory::ResourceScript => scan_rc(&mut file, content)?,
        SourceCategory::Template => scan_template(&mut file, content, false)?,
        SourceCategory::ManTemplate => scan_template(&mut file, content, true)?,
        SourceCategory::FontDescriptor => scan_sfd(&mut file, content)?,
        SourceCategory::XTemplate | SourceCategory::Translation | SourceCategory::Unknown => {}
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use makegen_source::DepKind;

    #[test]
    fn dispatches_by_category() {
        let file = scan(
            SourceCategory::C,
            Path::new("main.c"),
            "#include \"config.h\"\n",
        )
        .unwrap();
        assert_eq!(file.records[0].kind, DepKind::Local);

        let file = scan(
            SourceCategory::Idl,
            Path::new("x.idl"),
            "import \"oaidl.idl\";\n",
        )
        .unwrap();
        assert_eq!(file.records[0].kind, DepKind::Import);
    }

    #[test]
    fn opaque_categories_have_no_records() {
        let file = scan(
            SourceCategory::Unknown,
            Path::new("logo.svg"),
            "#include \"never scanned\"\n",
        )
        .unwrap();
        assert!(file.records.is_empty());

        let file = scan(SourceCategory::Translation, Path::new("de.po"), "msgid \"\"\n").unwrap();
        assert!(file.records.is_empty());
    }
}
