//! Path and file-name helpers shared by the resolver and the rule emitter.
//!
//! Build-file names carry meaning in their suffixes (`.tab.h` is a grammar
//! header, `.man.in` a man-page template), so most helpers here work on the
//! textual name rather than going through [`Path`] extension handling, which
//! only sees the last dot.

use std::path::{Component, Path, PathBuf};

/// Returns the final component of a path-like name.
pub fn file_name(name: &str) -> &str {
    match name.rfind('/') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Returns the name with its last-dot extension removed.
///
/// A name with no dot is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Replaces the last-dot extension of `name` with `new_ext` (given without
/// the leading dot).
///
/// ```
/// # use makegen_common::paths::replace_extension;
/// assert_eq!(replace_extension("foo.h", "idl"), "foo.idl");
/// ```
pub fn replace_extension(name: &str, new_ext: &str) -> String {
    format!("{}.{new_ext}", strip_extension(name))
}

/// Lexically normalizes a path, resolving `.` and `..` components without
/// touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else {
                    parts.push(comp);
                }
            }
            other => parts.push(other),
        }
    }
    let mut out = PathBuf::new();
    for comp in parts {
        out.push(comp.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Computes the lexical relative path from `from` to `to`.
///
/// Purely textual: neither path is required to exist, since object
/// directories are routinely referenced before they are created. Both paths
/// are interpreted relative to the same (unspecified) root.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for comp in &to[common..] {
        result.push(comp.as_os_str());
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}
