//! Derivation of synthesized sources from directive flags.

use std::mem;
use std::path::PathBuf;
use std::rc::Rc;

use makegen_common::paths::file_name;
use makegen_common::{replace_extension, strip_extension};
use makegen_scan::SourceCategory;
use makegen_source::{CategoryMeta, DepKind, FileFlags, PhysicalFile};

use crate::builder::expand_node;
use crate::context::RunContext;
use crate::error::GraphError;
use crate::node::{IncludeNode, NodeId};
use crate::unit::BuildUnit;

/// The generated outputs an interface definition can request, as
/// `(flag, suffix)` pairs. The header is handled separately because every
/// other output depends on it.
const IDL_OUTPUT_SUFFIXES: [(FileFlags, &str); 6] = [
    (FileFlags::IDL_CLIENT, "_c.c"),
    (FileFlags::IDL_SERVER, "_s.c"),
    (FileFlags::IDL_IDENT, "_i.c"),
    (FileFlags::IDL_PROXY, "_p.c"),
    (FileFlags::IDL_TYPELIB, ".tlb"),
    (FileFlags::IDL_REGTYPELIB, "_t.res"),
];

/// Inspects every declared source's accumulated flags and synthesizes the
/// additional sources they imply.
///
/// All insertions go through the unit's dedup-by-name path, so a second
/// request for the same synthesized name is a no-op.
pub fn derive_generated(ctx: &RunContext, unit: &mut BuildUnit) -> Result<(), GraphError> {
    let declared = unit.sources.clone();
    for id in declared {
        let node = unit.node(id);
        let name = node.name.clone();
        let path = node.path.clone();
        let file = node.file.clone();
        match SourceCategory::from_name(file_name(&name)) {
            SourceCategory::Idl => {
                if let Some(file) = file {
                    derive_idl_outputs(ctx, unit, &name, path, &file)?;
                }
            }
            SourceCategory::Yacc => {
                derive_with_transferred_includes(unit, id, &name, "tab.c", path);
            }
            SourceCategory::Lex => {
                derive_with_transferred_includes(unit, id, &name, "yy.c", path);
            }
            SourceCategory::XTemplate => {
                let header = replace_extension(&name, "h");
                add_synthesized(unit, &header, path, None);
            }
            SourceCategory::FontDescriptor => {
                if let Some(CategoryMeta::Fonts(fonts)) = file.as_deref().map(|f| &f.meta) {
                    for req in fonts.clone() {
                        add_synthesized(unit, &req.target, path.clone(), None);
                    }
                }
            }
            SourceCategory::ResourceScript => {
                // Translatable resources feed one per-unit extraction
                // template alongside the catalog-driven language list.
                if file.as_deref().is_some_and(|f| f.has_flag(FileFlags::RC_PO)) {
                    add_synthesized(unit, "rsrc.pot", None, None);
                }
            }
            SourceCategory::Translation => {
                let lang = strip_extension(file_name(&name)).to_string();
                if !unit.languages.contains(&lang) {
                    unit.languages.push(lang);
                }
            }
            _ => {}
        }
    }

    // A test module always gains one aggregator source enumerating every
    // test entry point.
    if unit.attrs.is_test() {
        add_synthesized(unit, "testlist.c", None, None);
    }
    Ok(())
}

/// Synthesizes the outputs requested by an interface definition's flags.
fn derive_idl_outputs(
    ctx: &RunContext,
    unit: &mut BuildUnit,
    idl_name: &str,
    idl_path: Option<PathBuf>,
    file: &Rc<PhysicalFile>,
) -> Result<(), GraphError> {
    if !file.has_flag(FileFlags::IDL_OUTPUTS) {
        return Ok(());
    }
    let stem = strip_extension(idl_name).to_string();
    let header_id = ensure_idl_header(ctx, unit, idl_name, idl_path.clone(), file)?;
    if file.has_flag(FileFlags::IDL_HEADER) {
        unit.mark_source(header_id);
    }
    for (flag, suffix) in IDL_OUTPUT_SUFFIXES {
        if !file.has_flag(flag) {
            continue;
        }
        let synth = format!("{stem}{suffix}");
        let id = add_synthesized(unit, &synth, idl_path.clone(), None);
        if !unit.node(id).children.contains(&header_id) {
            unit.node_mut(id).children.push(header_id);
        }
    }
    // Proxy code feeds the shared cross-unit dlldata aggregator.
    if file.has_flag(FileFlags::IDL_PROXY) {
        add_synthesized(unit, "dlldata.c", None, None);
    }
    Ok(())
}

/// Returns the node for an interface definition's generated header,
/// creating and expanding it if no reference has registered it yet.
fn ensure_idl_header(
    ctx: &RunContext,
    unit: &mut BuildUnit,
    idl_name: &str,
    idl_path: Option<PathBuf>,
    file: &Rc<PhysicalFile>,
) -> Result<NodeId, GraphError> {
    let header_name = replace_extension(idl_name, "h");
    if let Some(id) = unit.lookup(&header_name) {
        return Ok(id);
    }
    let mut node = IncludeNode::new(header_name.clone(), DepKind::Local);
    node.file = Some(Rc::clone(file));
    node.path = Some(unit.obj_path(&header_name));
    node.origin = idl_path;
    node.generated = true;
    let id = unit.insert_node(node);
    expand_node(ctx, unit, id)?;
    Ok(id)
}

/// Synthesizes a generated source that inherits the scanned file's
/// already-resolved include list verbatim; ownership of the list
/// transfers, leaving the original entry's list empty.
fn derive_with_transferred_includes(
    unit: &mut BuildUnit,
    origin_id: NodeId,
    origin_name: &str,
    new_ext: &str,
    origin_path: Option<PathBuf>,
) {
    let synth = replace_extension(origin_name, new_ext);
    if let Some(id) = unit.lookup(&synth) {
        unit.mark_source(id);
        return;
    }
    let children = mem::take(&mut unit.node_mut(origin_id).children);
    let mut node = IncludeNode::new(synth.clone(), DepKind::Local);
    node.path = Some(unit.obj_path(&synth));
    node.origin = origin_path;
    node.generated = true;
    node.children = children;
    let id = unit.insert_node(node);
    unit.mark_source(id);
}

/// Registers a synthesized source with an object-directory output path.
fn add_synthesized(
    unit: &mut BuildUnit,
    name: &str,
    origin: Option<PathBuf>,
    file: Option<Rc<PhysicalFile>>,
) -> NodeId {
    if let Some(id) = unit.lookup(name) {
        unit.mark_source(id);
        return id;
    }
    let mut node = IncludeNode::new(name, DepKind::Local);
    node.path = Some(unit.obj_path(name));
    node.origin = origin;
    node.generated = true;
    node.file = file;
    let id = unit.insert_node(node);
    unit.mark_source(id);
    id
}
