//! Per-format dependency scanners.
//!
//! Each source-file category gets one scanner that turns raw text into a
//! [`PhysicalFile`](makegen_source::PhysicalFile): an ordered sequence of
//! dependency records plus directive-derived flags and category metadata.
//! Dispatch is by filename suffix through [`SourceCategory`]; the
//! [`FileCache`] guarantees every physical file is scanned exactly once per
//! run.

#![warn(missing_docs)]

mod c_family;
pub mod cache;
pub mod category;
mod directive;
pub mod dispatch;
pub mod error;
mod idl;
mod rc;
mod sfd;
mod template;

pub use cache::FileCache;
pub use category::SourceCategory;
pub use dispatch::scan;
pub use error::ScanError;
