//! Dependency records produced by the format scanners.

use serde::{Deserialize, Serialize};

/// Classification of a dependency reference found while scanning a file.
///
/// The kind decides which resolver strategies apply and what kind of graph
/// edge the reference becomes: a [`System`](DepKind::System) include that
/// cannot be found is silently accepted as a toolchain-provided header,
/// while any other unresolved kind is a fatal error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DepKind {
    /// `#include "name"` — a quoted, local include.
    Local,
    /// `#include <name>` — a system include; allowed to be unresolved.
    System,
    /// `import "name.idl";` — an imported interface definition.
    Import,
    /// `importlib("name.tlb");` — an imported type library.
    ImportLib,
    /// `cpp_quote("#include \"name\"")` — a quoted include smuggled through
    /// an interface definition into its generated header.
    CppQuoted,
    /// `cpp_quote("#include <name>")` — the system-include variant.
    CppQuotedSystem,
}

impl DepKind {
    /// Returns `true` for the kinds whose resolution failure is tolerated.
    pub fn is_system(self) -> bool {
        matches!(self, DepKind::System | DepKind::CppQuotedSystem)
    }
}

/// One dependency reference: the line it appeared on, its kind, and the
/// referenced name exactly as written.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DepRecord {
    /// 1-indexed line of the reference in the scanned file.
    pub line: u32,
    /// How the reference was written, which drives resolution.
    pub kind: DepKind,
    /// The referenced name, verbatim.
    pub name: String,
}

impl DepRecord {
    /// Creates a dependency record.
    pub fn new(line: u32, kind: DepKind, name: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            name: name.into(),
        }
    }
}
