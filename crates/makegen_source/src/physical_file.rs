//! The parse-once representation of one file.

use std::path::PathBuf;

use makegen_common::Location;

use crate::error::SourceError;
use crate::flags::FileFlags;
use crate::meta::CategoryMeta;
use crate::record::{DepKind, DepRecord};
use crate::{CONFIG_HEADER, PORT_HEADER};

/// Everything one scan pass learned about a physical file.
///
/// Created lazily the first time any build unit references the path, then
/// cached for the rest of the run. After the scan (including the directive
/// pass that refines [`FileFlags`]) the record is never mutated; build units
/// share it read-only.
#[derive(Clone, Debug)]
pub struct PhysicalFile {
    /// Canonical path, also the cache key.
    pub path: PathBuf,
    /// Ordered dependency records, in scan order.
    pub records: Vec<DepRecord>,
    /// Directive-derived flags.
    pub flags: FileFlags,
    /// Category-specific side data.
    pub meta: CategoryMeta,
}

impl PhysicalFile {
    /// Creates an empty record for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            flags: FileFlags::default(),
            meta: CategoryMeta::None,
        }
    }

    /// Appends a dependency record, enforcing the baseline-header ordering
    /// invariant.
    ///
    /// The configuration pseudo-header must be the first record; the
    /// portability pseudo-header must come directly after it and is illegal
    /// otherwise. Violations are structural errors, not warnings.
    pub fn add_dependency(
        &mut self,
        line: u32,
        kind: DepKind,
        name: impl Into<String>,
    ) -> Result<(), SourceError> {
        let name = name.into();
        if name == CONFIG_HEADER && !self.records.is_empty() {
            return Err(SourceError::ConfigNotFirst {
                location: Location::new(self.path.clone(), line),
                name,
            });
        }
        if name == PORT_HEADER
            && !(self.records.len() == 1 && self.records[0].name == CONFIG_HEADER)
        {
            return Err(SourceError::PortWithoutConfig {
                location: Location::new(self.path.clone(), line),
                name,
            });
        }
        self.records.push(DepRecord::new(line, kind, name));
        Ok(())
    }

    /// Returns `true` if the file carries any of the given flags.
    pub fn has_flag(&self, flags: FileFlags) -> bool {
        self.flags.intersects(flags)
    }
}
