//! The parse-once file model shared by every build unit.
//!
//! A [`PhysicalFile`] records everything one scan pass learned about a file:
//! its ordered dependency records, the directive-derived [`FileFlags`], and
//! category-specific [`CategoryMeta`]. Many build units may reference the
//! same `PhysicalFile`; none of them mutate it after the scan completes.

#![warn(missing_docs)]

pub mod error;
pub mod flags;
pub mod meta;
pub mod physical_file;
pub mod record;

pub use error::SourceError;
pub use flags::FileFlags;
pub use meta::{CategoryMeta, FontRequest, ManPage};
pub use physical_file::PhysicalFile;
pub use record::{DepKind, DepRecord};

/// Name of the platform configuration pseudo-header.
///
/// When a C-family file includes it, it must be the very first dependency
/// record; see [`PhysicalFile::add_dependency`].
pub const CONFIG_HEADER: &str = "config.h";

/// Name of the platform portability pseudo-header.
///
/// Only legal as the second dependency record, directly after
/// [`CONFIG_HEADER`].
pub const PORT_HEADER: &str = "port.h";
