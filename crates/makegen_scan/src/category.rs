//! Filename-suffix dispatch to source categories.

/// The category a file belongs to, decided purely by its name.
///
/// Declared sources must map to a known category; files only encountered as
/// discovered includes may map to [`Unknown`](SourceCategory::Unknown) and
/// are then treated as opaque (no scan, no records).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SourceCategory {
    /// A compilable C unit (`.c`).
    C,
    /// A C header (`.h`).
    Header,
    /// An inline fragment included from C sources (`.inl`).
    Inline,
    /// An Objective-C source (`.m`); the only category where `#import` is
    /// recognized.
    ObjC,
    /// A yacc/bison grammar (`.y`).
    Yacc,
    /// A lex/flex scanner definition (`.l`).
    Lex,
    /// A message-catalog source (`.mc`).
    MessageCatalog,
    /// An interface-definition file (`.idl`).
    Idl,
    /// A resource script (`.rc`).
    ResourceScript,
    /// A templated text file (`.in`).
    Template,
    /// A man-page template (`.man.in`).
    ManTemplate,
    /// A header-generating template (`.x`).
    XTemplate,
    /// A font descriptor (`.sfd`).
    FontDescriptor,
    /// A translation catalog (`.po`).
    Translation,
    /// Anything else; never scanned.
    Unknown,
}

impl SourceCategory {
    /// Maps a file name to its category.
    ///
    /// Longer suffixes are matched first so `.man.in` wins over `.in`.
    pub fn from_name(name: &str) -> SourceCategory {
        if name.ends_with(".man.in") {
            return SourceCategory::ManTemplate;
        }
        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("c") => SourceCategory::C,
            Some("h") => SourceCategory::Header,
            Some("inl") => SourceCategory::Inline,
            Some("m") => SourceCategory::ObjC,
            Some("y") => SourceCategory::Yacc,
            Some("l") => SourceCategory::Lex,
            Some("mc") => SourceCategory::MessageCatalog,
            Some("idl") => SourceCategory::Idl,
            Some("rc") => SourceCategory::ResourceScript,
            Some("in") => SourceCategory::Template,
            Some("x") => SourceCategory::XTemplate,
            Some("sfd") => SourceCategory::FontDescriptor,
            Some("po") => SourceCategory::Translation,
            _ => SourceCategory::Unknown,
        }
    }

    /// Returns `true` for the categories handled by the C-family scanner.
    pub fn is_c_family(self) -> bool {
        matches!(
            self,
            SourceCategory::C
                | SourceCategory::Header
                | SourceCategory::Inline
                | SourceCategory::ObjC
                | SourceCategory::Yacc
                | SourceCategory::Lex
                | SourceCategory::MessageCatalog
        )
    }
}
