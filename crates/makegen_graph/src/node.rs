//! Include-graph nodes.

use std::path::PathBuf;
use std::rc::Rc;

use makegen_source::{DepKind, PhysicalFile};

/// Index of an [`IncludeNode`] within its owning unit's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize` for arena access.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of a build unit's include graph.
///
/// Nodes are scoped to a single unit: two units referencing the same
/// physical file each get their own node, pointing at the one shared
/// [`PhysicalFile`]. Within a unit there is at most one node per distinct
/// name; the dedup map lives on the unit.
#[derive(Clone, Debug)]
pub struct IncludeNode {
    /// Display name, as referenced by includers.
    pub name: String,
    /// How the node was referenced.
    pub kind: DepKind,
    /// The scanned file, when resolution found one. Absent for tolerated
    /// unresolved system headers and for purely generated outputs.
    pub file: Option<Rc<PhysicalFile>>,
    /// The path downstream rules should reference. Absent exactly when the
    /// node contributes no dependency edge.
    pub path: Option<PathBuf>,
    /// The generator's source path when the node's content is generated
    /// (grammar source, interface definition, template).
    pub origin: Option<PathBuf>,
    /// `true` when the node's output is synthesized into the object
    /// directory rather than found on disk.
    pub generated: bool,
    /// The node that first included this one, for diagnostics.
    pub included_by: Option<NodeId>,
    /// The line of that first inclusion.
    pub included_line: u32,
    /// Direct children, in discovery order.
    pub children: Vec<NodeId>,
    /// `true` when the node is also a declared or synthesized unit source.
    pub is_source: bool,
}

impl IncludeNode {
    /// Creates a bare node with the given name and kind.
    pub fn new(name: impl Into<String>, kind: DepKind) -> Self {
        Self {
            name: name.into(),
            kind,
            file: None,
            path: None,
            origin: None,
            generated: false,
            included_by: None,
            included_line: 0,
            children: Vec::new(),
            is_source: false,
        }
    }
}
