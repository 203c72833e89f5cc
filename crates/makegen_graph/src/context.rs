//! The run-scoped context handle.

use std::path::PathBuf;

use makegen_config::{VarScope, VarStore};
use makegen_scan::FileCache;

use crate::unit::BuildUnit;

/// State shared by every phase of one generator run.
///
/// Owned by the top level and passed by reference to the components that
/// need lookups; there are no process globals.
#[derive(Debug)]
pub struct RunContext {
    /// The parse-once file cache, keyed by top-relative path.
    pub cache: FileCache,
    /// Command-line `NAME=value` overrides.
    pub cmdline: VarStore,
    /// The root descriptor's variable bindings.
    pub root_vars: VarStore,
    /// The build-file name to generate (`-f`, default `Makefile`).
    pub output_name: String,
    /// The global top-level include tree, relative to the top directory.
    pub include_dir: PathBuf,
}

impl RunContext {
    /// Creates a context with default settings and the given cache.
    pub fn new(cache: FileCache) -> Self {
        Self {
            cache,
            cmdline: VarStore::new(),
            root_vars: VarStore::new(),
            output_name: "Makefile".to_string(),
            include_dir: PathBuf::from("include"),
        }
    }

    /// Returns the variable scope for `unit`.
    pub fn scope<'a>(&'a self, unit: &'a BuildUnit) -> VarScope<'a> {
        VarScope::new(&self.cmdline, &unit.vars, &self.root_vars)
    }

    /// Path of a unit's build descriptor.
    pub fn descriptor_path(&self, dir: &str) -> PathBuf {
        if dir == "." {
            PathBuf::from(format!("{}.in", self.output_name))
        } else {
            PathBuf::from(dir).join(format!("{}.in", self.output_name))
        }
    }

    /// Path of a unit's generated build file.
    pub fn build_file_path(&self, dir: &str) -> PathBuf {
        if dir == "." {
            PathBuf::from(&self.output_name)
        } else {
            PathBuf::from(dir).join(&self.output_name)
        }
    }
}
