//! Category-specific side data attached to a scanned file.

use serde::{Deserialize, Serialize};

/// Metadata only some file categories produce, modeled as a tagged union so
/// each scanner returns a uniform result.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CategoryMeta {
    /// No category-specific data.
    #[default]
    None,
    /// Man-page template metadata extracted from a `.man.in` file.
    ManPage(ManPage),
    /// Sub-font generation requests from a font descriptor's directives.
    Fonts(Vec<FontRequest>),
}

/// Program name and manual section extracted from a man-page template,
/// used to compute the page's install path.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ManPage {
    /// The documented program's name.
    pub program: String,
    /// The manual section string (e.g. `"1"`).
    pub section: String,
}

/// One named sub-font a font descriptor asks to have generated.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FontRequest {
    /// Target file name of the generated font (e.g. `coure.fon`).
    pub target: String,
    /// Generator arguments, verbatim from the directive.
    pub args: String,
}
