//! Recursive, memoized include-graph construction.

use std::path::PathBuf;

use makegen_common::paths::{file_name, normalize};
use makegen_common::{replace_extension, Location};
use makegen_scan::SourceCategory;
use makegen_source::DepKind;

use crate::context::RunContext;
use crate::derive::derive_generated;
use crate::error::GraphError;
use crate::node::{IncludeNode, NodeId};
use crate::resolver::resolve;
use crate::unit::BuildUnit;

/// Baseline headers every generated interface header includes.
const IDL_BASE_HEADERS: [&str; 2] = ["rpc.h", "rpcndr.h"];

/// Loads a unit's declared sources, expands their transitive includes, and
/// derives the synthesized sources implied by directive flags.
///
/// The declared source list is fixed before this runs; everything else in
/// the unit's graph grows from it.
pub fn load_unit_sources(ctx: &RunContext, unit: &mut BuildUnit) -> Result<(), GraphError> {
    let declared = unit.attrs.sources.clone();
    for name in declared {
        let category = SourceCategory::from_name(file_name(&name));
        if matches!(category, SourceCategory::Unknown) {
            return Err(GraphError::UnknownSourceType {
                name,
                unit: unit.name.clone(),
            });
        }
        let path = find_source(ctx, unit, &name).ok_or_else(|| GraphError::SourceNotFound {
            name: name.clone(),
            unit: unit.name.clone(),
        })?;
        let file = ctx.cache.load(&path)?;
        let mut node = IncludeNode::new(name, DepKind::Local);
        node.file = Some(file);
        node.path = Some(path);
        let id = unit.insert_node(node);
        unit.mark_source(id);
        expand_node(ctx, unit, id)?;
    }
    derive_generated(ctx, unit)?;
    Ok(())
}

/// Locates a declared source: the unit's own source directory first, then
/// the configured parent directory for shared test/helper sources.
fn find_source(ctx: &RunContext, unit: &BuildUnit, name: &str) -> Option<PathBuf> {
    let local = unit.src_path(name);
    if ctx.cache.exists(&local) {
        return Some(local);
    }
    if let Some(parent) = &unit.attrs.parent_src {
        let candidate = normalize(&unit.base_dir.join(parent).join(name));
        if ctx.cache.exists(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Recursively expands `id`'s dependency records into child nodes.
///
/// Termination is guaranteed by the per-unit dedup-by-name map: a file
/// that re-includes an ancestor finds the already-registered node and does
/// not recurse again.
pub(crate) fn expand_node(
    ctx: &RunContext,
    unit: &mut BuildUnit,
    id: NodeId,
) -> Result<(), GraphError> {
    let node = unit.node(id);
    let Some(file) = node.file.clone() else {
        return Ok(());
    };
    // Grammar-generated outputs are leaves: they include nothing further.
    if node.generated && grammar_origin(node) {
        return Ok(());
    }
    let as_generated_header =
        node.generated && node.name.ends_with(".h") && idl_origin(node);
    let includer_path = node.path.clone();

    let mut wanted: Vec<(String, DepKind, u32)> = Vec::new();
    if as_generated_header {
        // A generated interface header starts from two fixed baseline
        // headers; imports become the imported interface's own generated
        // header, and cpp_quote includes turn into ordinary includes.
        for base in IDL_BASE_HEADERS {
            wanted.push((base.to_string(), DepKind::Local, 0));
        }
        for rec in &file.records {
            match rec.kind {
                DepKind::Import => {
                    let name = if rec.name.ends_with(".idl") {
                        replace_extension(&rec.name, "h")
                    } else {
                        rec.name.clone()
                    };
                    wanted.push((name, DepKind::Local, rec.line));
                }
                DepKind::CppQuoted => wanted.push((rec.name.clone(), DepKind::Local, rec.line)),
                DepKind::CppQuotedSystem => {
                    wanted.push((rec.name.clone(), DepKind::System, rec.line))
                }
                _ => {}
            }
        }
    } else {
        for rec in &file.records {
            match rec.kind {
                DepKind::Local | DepKind::Import => {
                    wanted.push((rec.name.clone(), rec.kind, rec.line))
                }
                DepKind::System => wanted.push((rec.name.clone(), DepKind::System, rec.line)),
                DepKind::ImportLib => {
                    wanted.push((rec.name.clone(), DepKind::ImportLib, rec.line))
                }
                // cpp_quote includes belong to the generated header, not to
                // the interface definition itself.
                DepKind::CppQuoted | DepKind::CppQuotedSystem => {}
            }
        }
    }

    for (name, kind, line) in wanted {
        if let Some(existing) = unit.lookup(&name) {
            // A template-backed node's own name resolves back to itself;
            // no self edge.
            if existing != id && !unit.node(id).children.contains(&existing) {
                unit.node_mut(id).children.push(existing);
            }
            continue;
        }
        match resolve(ctx, unit, &name, kind, includer_path.as_deref())? {
            Some(resolved) => {
                let mut child = IncludeNode::new(name, kind);
                child.file = resolved.file;
                child.path = Some(resolved.path);
                child.origin = resolved.origin;
                child.generated = resolved.generated;
                child.included_by = Some(id);
                child.included_line = line;
                let child_id = unit.insert_node(child);
                unit.node_mut(id).children.push(child_id);
                expand_node(ctx, unit, child_id)?;
            }
            None if kind.is_system() => {
                // Tolerated miss: an external, unmodeled dependency. The
                // node is kept for dedup but contributes no edge.
                let mut child = IncludeNode::new(name, kind);
                child.included_by = Some(id);
                child.included_line = line;
                let child_id = unit.insert_node(child);
                unit.node_mut(id).children.push(child_id);
            }
            None => {
                let display = match &unit.node(id).path {
                    Some(path) => path.to_string_lossy().into_owned(),
                    None => unit.node(id).name.clone(),
                };
                let mut chain = vec![Location::new(display, line)];
                chain.extend(unit.inclusion_chain(id));
                return Err(GraphError::IncludeNotFound { name, chain });
            }
        }
    }
    Ok(())
}

fn grammar_origin(node: &IncludeNode) -> bool {
    node.origin
        .as_deref()
        .is_some_and(|p| p.extension().is_some_and(|e| e == "y"))
}

fn idl_origin(node: &IncludeNode) -> bool {
    node.origin
        .as_deref()
        .is_some_and(|p| p.extension().is_some_and(|e| e == "idl"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use makegen_config::{parse_descriptor, UnitAttrs, VarScope, VarStore};
    use makegen_scan::FileCache;
    use std::path::Path;

    fn build_unit(
        dir: &str,
        descriptor: &str,
        files: &[(&str, &str)],
    ) -> Result<(RunContext, BuildUnit), GraphError> {
        let mut cache = FileCache::new();
        for (path, content) in files {
            cache.add_source(*path, *content);
        }
        let ctx = RunContext::new(cache);
        let parsed = parse_descriptor(Path::new("Makefile.in"), descriptor)?;
        let empty = VarStore::new();
        let scope = VarScope::new(&ctx.cmdline, &parsed.vars, &empty);
        let attrs = UnitAttrs::from_scope(&scope)?;
        let mut unit = BuildUnit::new(dir, parsed, attrs);
        load_unit_sources(&ctx, &mut unit)?;
        Ok((ctx, unit))
    }

    #[test]
    fn transitive_closure_complete() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = a.c\n",
            &[
                ("dlls/foo/a.c", "#include \"b.h\"\n"),
                ("dlls/foo/b.h", "#include \"c.h\"\n"),
                ("dlls/foo/c.h", ""),
            ],
        )
        .unwrap();
        let a = unit.lookup("a.c").unwrap();
        let prereqs = unit.prereqs(a);
        assert!(prereqs.contains(&PathBuf::from("dlls/foo/b.h")));
        assert!(prereqs.contains(&PathBuf::from("dlls/foo/c.h")));
    }

    #[test]
    fn dedup_two_includers_one_node() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = a.c b.c\n",
            &[
                ("dlls/foo/a.c", "#include \"shared.h\"\n"),
                ("dlls/foo/b.c", "#include \"shared.h\"\n"),
                ("dlls/foo/shared.h", ""),
            ],
        )
        .unwrap();
        let shared = unit.lookup("shared.h").unwrap();
        let a = unit.lookup("a.c").unwrap();
        let b = unit.lookup("b.c").unwrap();
        assert!(unit.node(a).children.contains(&shared));
        assert!(unit.node(b).children.contains(&shared));
        // Exactly one node carries the name.
        assert_eq!(
            (0..unit.node_count())
                .filter(|&i| unit.node(NodeId::from_raw(i as u32)).name == "shared.h")
                .count(),
            1
        );
    }

    #[test]
    fn include_cycle_terminates() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = a.c\n",
            &[
                ("dlls/foo/a.c", "#include \"x.h\"\n"),
                ("dlls/foo/x.h", "#include \"y.h\"\n"),
                ("dlls/foo/y.h", "#include \"x.h\"\n"),
            ],
        )
        .unwrap();
        let a = unit.lookup("a.c").unwrap();
        let prereqs = unit.prereqs(a);
        assert_eq!(prereqs.len(), 2);
    }

    #[test]
    fn system_miss_is_soft() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = a.c\n",
            &[("dlls/foo/a.c", "#include <nonexistent_system_header.h>\n")],
        )
        .unwrap();
        let a = unit.lookup("a.c").unwrap();
        assert!(unit.prereqs(a).is_empty());
        // The node exists for dedup but has no path.
        let miss = unit.lookup("nonexistent_system_header.h").unwrap();
        assert!(unit.node(miss).path.is_none());
    }

    #[test]
    fn quoted_miss_is_fatal_with_chain() {
        let err = build_unit(
            "dlls/foo",
            "SOURCES = a.c\n",
            &[("dlls/foo/a.c", "#include \"missing_local.h\"\n")],
        )
        .unwrap_err();
        match err {
            GraphError::IncludeNotFound { name, chain } => {
                assert_eq!(name, "missing_local.h");
                assert_eq!(chain[0], Location::new("dlls/foo/a.c", 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn generated_header_binds_to_interface_definition() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = main.c custom.idl\n",
            &[
                ("dlls/foo/main.c", "#include \"custom.h\"\n"),
                ("dlls/foo/custom.idl", "#pragma makedep header\n"),
                ("include/rpc.h", ""),
                ("include/rpcndr.h", ""),
            ],
        )
        .unwrap();
        let header = unit.lookup("custom.h").unwrap();
        let node = unit.node(header);
        assert!(node.generated);
        assert_eq!(
            node.file.as_ref().unwrap().path,
            PathBuf::from("dlls/foo/custom.idl")
        );
    }

    #[test]
    fn generated_header_expands_imports_and_baselines() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = main.c\n",
            &[
                ("dlls/foo/main.c", "#include \"app.h\"\n"),
                (
                    "dlls/foo/app.idl",
                    "import \"base.idl\";\ncpp_quote(\"#include \\\"extra.h\\\"\")\n",
                ),
                ("dlls/foo/extra.h", ""),
                ("include/base.idl", ""),
                ("include/rpc.h", ""),
                ("include/rpcndr.h", ""),
            ],
        )
        .unwrap();
        let header = unit.lookup("app.h").unwrap();
        let prereqs = unit.prereqs(header);
        assert!(prereqs.contains(&PathBuf::from("include/rpc.h")));
        assert!(prereqs.contains(&PathBuf::from("include/rpcndr.h")));
        // The import resolves to base.idl's own generated header.
        assert!(prereqs.contains(&PathBuf::from("include/base.h")));
        assert!(prereqs.contains(&PathBuf::from("dlls/foo/extra.h")));
    }

    #[test]
    fn template_backed_header_has_no_self_edge() {
        let (_, unit) = build_unit(
            "dlls/foo",
            "SOURCES = main.c\n",
            &[
                ("dlls/foo/main.c", "#include \"config.h\"\n"),
                ("include/config.h.in", ""),
            ],
        )
        .unwrap();
        // The template's own scan records a dependency on the header it
        // generates; that reference must not become a self child.
        let cfg = unit.lookup("config.h").unwrap();
        assert!(!unit.node(cfg).children.contains(&cfg));
    }

    #[test]
    fn unknown_declared_source_is_fatal() {
        let err = build_unit(
            "dlls/foo",
            "SOURCES = logo.svg\n",
            &[("dlls/foo/logo.svg", "<svg/>")],
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::UnknownSourceType { .. }));
    }

    #[test]
    fn missing_declared_source_is_fatal() {
        let err = build_unit("dlls/foo", "SOURCES = ghost.c\n", &[]).unwrap_err();
        assert!(matches!(err, GraphError::SourceNotFound { .. }));
    }
}
