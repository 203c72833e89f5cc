//! The run-scoped parse-once file cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use makegen_common::paths::file_name;
use makegen_source::PhysicalFile;

use crate::category::SourceCategory;
use crate::dispatch::scan;
use crate::error::ScanError;

/// Path-keyed store of scanned files.
///
/// Owned by the top-level run and passed by handle to every component that
/// needs lookups. Each physical file is scanned exactly once no matter how
/// many build units reference it; the scan category is derived from the
/// file name. In-memory sources can be registered for tests (mirroring
/// `SourceDb::add_source`); they shadow the filesystem.
#[derive(Debug, Default)]
pub struct FileCache {
    files: RefCell<HashMap<PathBuf, Rc<PhysicalFile>>>,
    memory: HashMap<PathBuf, String>,
    root: Option<PathBuf>,
}

impl FileCache {
    /// Creates an empty cache resolving disk paths against the working
    /// directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache resolving disk paths against `root`.
    ///
    /// Cache keys stay top-relative either way; only filesystem access is
    /// redirected.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Registers an in-memory source, shadowing any on-disk file at `path`.
    pub fn add_source(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.memory.insert(path.into(), content.into());
    }

    fn disk_path(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Returns `true` if a file exists at `path` (in-memory or on disk).
    pub fn exists(&self, path: &Path) -> bool {
        self.memory.contains_key(path) || self.disk_path(path).is_file()
    }

    /// Returns the scanned representation of `path`, scanning on first use.
    pub fn load(&self, path: &Path) -> Result<Rc<PhysicalFile>, ScanError> {
        if let Some(file) = self.files.borrow().get(path) {
            return Ok(Rc::clone(file));
        }
        let content = match self.memory.get(path) {
            Some(content) => content.clone(),
            None => {
                std::fs::read_to_string(self.disk_path(path)).map_err(|source| ScanError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        let category = SourceCategory::from_name(file_name(&path.to_string_lossy()));
        let file = Rc::new(scan(category, path, &content)?);
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&file));
        Ok(file)
    }

    /// Number of distinct files scanned so far.
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    /// Returns `true` if nothing has been scanned yet.
    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}
