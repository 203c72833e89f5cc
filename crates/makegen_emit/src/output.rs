//! The transactional output layer.
//!
//! Generated text is streamed into a uniquely named temporary file beside
//! its destination, then renamed over it on commit. The temporary file is
//! created in the destination's directory so the final rename stays on one
//! filesystem; an uncommitted guard removes its temporary file on drop, so
//! an aborted run never leaves partial output behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};

use makegen_common::ContentHash;

use crate::error::EmitError;

static TEMP_SEQ: AtomicU32 = AtomicU32::new(0);

/// A guard around one pending output file.
pub struct OutputFile {
    dest: PathBuf,
    temp: PathBuf,
    handle: Option<fs::File>,
    committed: bool,
}

impl OutputFile {
    /// Opens a temporary file beside `dest` for streaming.
    pub fn create(dest: impl Into<PathBuf>) -> Result<Self, EmitError> {
        let dest = dest.into();
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp = dest.with_file_name(format!(".{name}.tmp{}.{seq}", process::id()));
        let handle = fs::File::create(&temp).map_err(|source| EmitError::Io {
            path: temp.clone(),
            source,
        })?;
        Ok(Self {
            dest,
            temp,
            handle: Some(handle),
            committed: false,
        })
    }

    /// Appends `text` to the pending file.
    pub fn write_str(&mut self, text: &str) -> Result<(), EmitError> {
        if let Some(handle) = &mut self.handle {
            handle
                .write_all(text.as_bytes())
                .map_err(|source| EmitError::Io {
                    path: self.temp.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Renames the pending file over the destination unconditionally.
    ///
    /// Used for the primary build file, whose presence alone signals
    /// "regenerated" to downstream tooling.
    pub fn commit(mut self) -> Result<(), EmitError> {
        self.close()?;
        fs::rename(&self.temp, &self.dest).map_err(|source| EmitError::Io {
            path: self.dest.clone(),
            source,
        })?;
        self.committed = true;
        Ok(())
    }

    /// Renames the pending file over the destination only when the content
    /// differs; an identical destination is left untouched (including its
    /// modification time).
    ///
    /// Returns `true` when the destination was replaced.
    pub fn commit_if_changed(mut self) -> Result<bool, EmitError> {
        self.close()?;
        let fresh = fs::read(&self.temp).map_err(|source| EmitError::Io {
            path: self.temp.clone(),
            source,
        })?;
        if let Ok(existing) = fs::read(&self.dest) {
            if ContentHash::from_bytes(&existing) == ContentHash::from_bytes(&fresh) {
                fs::remove_file(&self.temp).map_err(|source| EmitError::Io {
                    path: self.temp.clone(),
                    source,
                })?;
                self.committed = true;
                return Ok(false);
            }
        }
        fs::rename(&self.temp, &self.dest).map_err(|source| EmitError::Io {
            path: self.dest.clone(),
            source,
        })?;
        self.committed = true;
        Ok(true)
    }

    /// Path of the destination file.
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    fn close(&mut self) -> Result<(), EmitError> {
        if let Some(handle) = self.handle.take() {
            handle.sync_all().map_err(|source| EmitError::Io {
                path: self.temp.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        self.handle.take();
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    fn temp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with('.')
            })
            .count()
    }

    #[test]
    fn commit_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Makefile");
        fs::write(&dest, "old\n").unwrap();

        let mut out = OutputFile::create(&dest).unwrap();
        out.write_str("new content\n").unwrap();
        out.commit().unwrap();

        assert_eq!(read(&dest), "new content\n");
        assert_eq!(temp_files(dir.path()), 0);
    }

    #[test]
    fn drop_without_commit_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Makefile");
        {
            let mut out = OutputFile::create(&dest).unwrap();
            out.write_str("half-written\n").unwrap();
        }
        assert!(!dest.exists());
        assert_eq!(temp_files(dir.path()), 0);
    }

    #[test]
    fn commit_if_changed_skips_identical() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("testlist.c");
        fs::write(&dest, "same\n").unwrap();
        let before = fs::metadata(&dest).unwrap().modified().unwrap();

        let mut out = OutputFile::create(&dest).unwrap();
        out.write_str("same\n").unwrap();
        assert!(!out.commit_if_changed().unwrap());

        assert_eq!(read(&dest), "same\n");
        assert_eq!(fs::metadata(&dest).unwrap().modified().unwrap(), before);
        assert_eq!(temp_files(dir.path()), 0);
    }

    #[test]
    fn commit_if_changed_replaces_different() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("testlist.c");
        fs::write(&dest, "old\n").unwrap();

        let mut out = OutputFile::create(&dest).unwrap();
        out.write_str("new\n").unwrap();
        assert!(out.commit_if_changed().unwrap());
        assert_eq!(read(&dest), "new\n");
    }

    #[test]
    fn commit_if_changed_creates_missing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("LINGUAS");

        let mut out = OutputFile::create(&dest).unwrap();
        out.write_str("de\nfr\n").unwrap();
        assert!(out.commit_if_changed().unwrap());
        assert_eq!(read(&dest), "de\nfr\n");
    }
}
