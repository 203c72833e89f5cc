//! Build units and their node arenas.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use makegen_common::paths::normalize;
use makegen_common::Location;
use makegen_config::{Descriptor, UnitAttrs, VarStore};

use crate::node::{IncludeNode, NodeId};

/// One directory's worth of configured build targets and sources.
///
/// The source list is fixed before any dependency resolution begins; the
/// node arena grows monotonically during resolution and is frozen once rule
/// emission starts.
#[derive(Clone, Debug, Default)]
pub struct BuildUnit {
    /// Unit directory relative to the top directory (`.` for the root).
    pub name: String,
    /// Base directory of the unit.
    pub base_dir: PathBuf,
    /// Where the unit's sources live (normally the base directory).
    pub src_dir: PathBuf,
    /// Where generated outputs land (normally the base directory).
    pub obj_dir: PathBuf,
    /// The descriptor's preserved pre-sentinel text.
    pub preamble: String,
    /// The unit's own variable bindings.
    pub vars: VarStore,
    /// Typed attributes extracted from the variables.
    pub attrs: UnitAttrs,
    /// Declared plus synthesized sources, in declaration/derivation order.
    pub sources: Vec<NodeId>,
    /// Language codes registered by translation catalogs.
    pub languages: Vec<String>,
    nodes: Vec<IncludeNode>,
    by_name: HashMap<String, NodeId>,
}

impl BuildUnit {
    /// Creates a unit for `dir` from its parsed descriptor and attributes.
    pub fn new(dir: &str, descriptor: Descriptor, attrs: UnitAttrs) -> Self {
        let base = normalize(Path::new(dir));
        Self {
            name: base.to_string_lossy().into_owned(),
            base_dir: base.clone(),
            src_dir: base.clone(),
            obj_dir: base,
            preamble: descriptor.preamble,
            vars: descriptor.vars,
            attrs,
            sources: Vec::new(),
            languages: Vec::new(),
            nodes: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Returns the node for `id`.
    pub fn node(&self, id: NodeId) -> &IncludeNode {
        &self.nodes[id.index()]
    }

    /// Returns the node for `id` mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut IncludeNode {
        &mut self.nodes[id.index()]
    }

    /// Looks up a node by name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Registers a new node, deduplicating by name.
    ///
    /// Returns the existing node when the name is already present.
    pub fn insert_node(&mut self, node: IncludeNode) -> NodeId {
        if let Some(id) = self.by_name.get(&node.name) {
            return *id;
        }
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.by_name.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    /// Marks `id` as a unit source, appending it to the source list once.
    pub fn mark_source(&mut self, id: NodeId) {
        if !self.nodes[id.index()].is_source {
            self.nodes[id.index()].is_source = true;
            self.sources.push(id);
        }
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Path of `name` within the unit's source directory.
    pub fn src_path(&self, name: &str) -> PathBuf {
        normalize(&self.src_dir.join(name))
    }

    /// Path of `name` within the unit's object directory.
    pub fn obj_path(&self, name: &str) -> PathBuf {
        normalize(&self.obj_dir.join(name))
    }

    /// Flattens the set of resolvable prerequisites transitively reachable
    /// from `id`, excluding `id` itself.
    ///
    /// One pass over the reachable subgraph per call: an explicit visited
    /// set bounds the work, and nodes without a resolved path (tolerated
    /// system misses) contribute no entry.
    pub fn prereqs(&self, id: NodeId) -> Vec<PathBuf> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        visited.insert(id);
        self.collect_prereqs(id, &mut visited, &mut out);
        out
    }

    fn collect_prereqs(&self, id: NodeId, visited: &mut HashSet<NodeId>, out: &mut Vec<PathBuf>) {
        for &child in &self.node(id).children {
            if !visited.insert(child) {
                continue;
            }
            if let Some(path) = &self.node(child).path {
                out.push(path.clone());
            }
            self.collect_prereqs(child, visited, out);
        }
    }

    /// Reconstructs the ancestor inclusion chain of `id`, innermost first.
    pub fn inclusion_chain(&self, id: NodeId) -> Vec<Location> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).included_by {
            let display = match &self.node(parent).path {
                Some(path) => path.to_string_lossy().into_owned(),
                None => self.node(parent).name.clone(),
            };
            chain.push(Location::new(display, self.node(current).included_line));
            current = parent;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makegen_source::DepKind;

    fn unit() -> BuildUnit {
        BuildUnit::new("dlls/foo", Descriptor::default(), UnitAttrs::default())
    }

    #[test]
    fn path_helpers() {
        let u = unit();
        assert_eq!(u.src_path("main.c"), PathBuf::from("dlls/foo/main.c"));
        assert_eq!(u.obj_path("main.o"), PathBuf::from("dlls/foo/main.o"));
    }

    #[test]
    fn dedup_by_name() {
        let mut u = unit();
        let a = u.insert_node(IncludeNode::new("winbase.h", DepKind::Local));
        let b = u.insert_node(IncludeNode::new("winbase.h", DepKind::System));
        assert_eq!(a, b);
        assert_eq!(u.node_count(), 1);
    }

    #[test]
    fn mark_source_is_idempotent() {
        let mut u = unit();
        let id = u.insert_node(IncludeNode::new("main.c", DepKind::Local));
        u.mark_source(id);
        u.mark_source(id);
        assert_eq!(u.sources, vec![id]);
    }

    #[test]
    fn prereqs_transitive_and_deduped() {
        let mut u = unit();
        let a = u.insert_node(IncludeNode::new("a.c", DepKind::Local));
        let mut b_node = IncludeNode::new("b.h", DepKind::Local);
        b_node.path = Some(PathBuf::from("dlls/foo/b.h"));
        let b = u.insert_node(b_node);
        let mut c_node = IncludeNode::new("c.h", DepKind::Local);
        c_node.path = Some(PathBuf::from("include/c.h"));
        let c = u.insert_node(c_node);
        u.node_mut(a).children.push(b);
        u.node_mut(b).children.push(c);
        // Diamond: a also includes c directly.
        u.node_mut(a).children.push(c);
        let prereqs = u.prereqs(a);
        assert_eq!(
            prereqs,
            vec![PathBuf::from("dlls/foo/b.h"), PathBuf::from("include/c.h")]
        );
    }

    #[test]
    fn prereqs_tolerates_cycles() {
        let mut u = unit();
        let mut a_node = IncludeNode::new("a.h", DepKind::Local);
        a_node.path = Some(PathBuf::from("dlls/foo/a.h"));
        let a = u.insert_node(a_node);
        let mut b_node = IncludeNode::new("b.h", DepKind::Local);
        b_node.path = Some(PathBuf::from("dlls/foo/b.h"));
        let b = u.insert_node(b_node);
        u.node_mut(a).children.push(b);
        u.node_mut(b).children.push(a);
        let prereqs = u.prereqs(a);
        assert_eq!(prereqs, vec![PathBuf::from("dlls/foo/b.h")]);
    }

    #[test]
    fn unresolved_nodes_add_no_edge() {
        let mut u = unit();
        let a = u.insert_node(IncludeNode::new("a.c", DepKind::Local));
        let b = u.insert_node(IncludeNode::new("stdarg.h", DepKind::System));
        u.node_mut(a).children.push(b);
        assert!(u.prereqs(a).is_empty());
    }

    #[test]
    fn inclusion_chain_walks_ancestors() {
        let mut u = unit();
        let mut main = IncludeNode::new("main.c", DepKind::Local);
        main.path = Some(PathBuf::from("dlls/foo/main.c"));
        let main = u.insert_node(main);
        let mut util = IncludeNode::new("util.h", DepKind::Local);
        util.path = Some(PathBuf::from("dlls/foo/util.h"));
        util.included_by = Some(main);
        util.included_line = 7;
        let util = u.insert_node(util);
        let mut missing = IncludeNode::new("missing.h", DepKind::Local);
        missing.included_by = Some(util);
        missing.included_line = 3;
        let missing = u.insert_node(missing);
        let chain = u.inclusion_chain(missing);
        assert_eq!(chain[0], Location::new("dlls/foo/util.h", 3));
        assert_eq!(chain[1], Location::new("dlls/foo/main.c", 7));
    }
}
