//! Run orchestration: unit discovery, graph loading, and emission.

use std::collections::HashSet;
use std::path::Path;

use makegen_common::normalize;
use makegen_config::{
    load_descriptor, ConfigError, Descriptor, UnitAttrs, VarScope, VarStore,
};
use makegen_emit::{
    emit_unit, ignore_list, language_list, test_registry, EmitError, OutputFile,
};
use makegen_graph::{load_unit_sources, summarize_unit, BuildUnit, GraphError, RunContext};
use makegen_scan::FileCache;

use crate::Cli;

/// Fatal errors for one generator run, each already rendered in the
/// `file:line: error:` or `makegen: error:` form.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A descriptor could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Scanning or resolution failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Generated output could not be written.
    #[error(transparent)]
    Emit(#[from] EmitError),
    /// The graph summary could not be serialized.
    #[error("makegen: error: cannot serialize graph summary: {0}")]
    Summary(#[from] serde_json::Error),
    /// A subdirectory chain re-entered an already discovered unit.
    #[error("makegen: error: subdirectory loop through '{dir}'")]
    SubdirLoop {
        /// The unit directory reached a second time.
        dir: String,
    },
}

/// Executes one generator run with `top` as the top directory.
///
/// Primary mode (no directory arguments) recursively discovers units from
/// the root descriptor's subdirectory list; with directory arguments only
/// the named units are processed.
pub fn run(cli: &Cli, top: &Path) -> Result<(), CliError> {
    let mut ctx = RunContext::new(FileCache::with_root(top));
    ctx.output_name = cli.output.clone();

    let mut dirs: Vec<String> = Vec::new();
    for arg in &cli.args {
        match VarStore::parse_assignment(arg) {
            Some((name, value)) => ctx.cmdline.set(name, value),
            None => dirs.push(arg.clone()),
        }
    }

    let root_descriptor = load_descriptor(&top.join(ctx.descriptor_path(".")))?;
    ctx.root_vars = root_descriptor.vars.clone();

    let mut pending: Vec<(String, Descriptor, UnitAttrs)> = Vec::new();
    if dirs.is_empty() {
        let mut seen = HashSet::new();
        discover(&ctx, top, ".", root_descriptor, &mut seen, &mut pending)?;
    } else {
        for dir in dirs {
            let descriptor = load_descriptor(&top.join(ctx.descriptor_path(&dir)))?;
            let attrs = unit_attrs(&ctx, &descriptor)?;
            pending.push((dir, descriptor, attrs));
        }
    }

    let mut units = Vec::new();
    for (dir, descriptor, attrs) in pending {
        if attrs.disabled {
            continue;
        }
        let mut unit = BuildUnit::new(&dir, descriptor, attrs);
        load_unit_sources(&ctx, &mut unit)?;
        units.push(unit);
    }

    let unit_dirs: Vec<String> = units.iter().map(|u| u.name.clone()).collect();
    for unit in &units {
        let descendants = descendants_of(&unit.name, &unit_dirs);
        let text = emit_unit(&ctx, unit, &descendants);
        let mut out = OutputFile::create(top.join(ctx.build_file_path(&unit.name)))?;
        out.write_str(&text)?;
        out.commit()?;
        write_siblings(top, unit)?;
    }

    if let Some(path) = &cli.dump_graph {
        let summaries: Vec<_> = units.iter().map(summarize_unit).collect();
        let json = serde_json::to_string_pretty(&summaries)?;
        let mut out = OutputFile::create(top.join(path))?;
        out.write_str(&json)?;
        out.write_str("\n")?;
        out.commit()?;
    }
    Ok(())
}

/// Depth-first discovery over declared subdirectory lists.
///
/// `seen` holds every normalized unit directory reached so far; a
/// subdirectory chain that comes back to one of them is a fatal loop.
fn discover(
    ctx: &RunContext,
    top: &Path,
    dir: &str,
    descriptor: Descriptor,
    seen: &mut HashSet<String>,
    out: &mut Vec<(String, Descriptor, UnitAttrs)>,
) -> Result<(), CliError> {
    if !seen.insert(dir.to_string()) {
        return Err(CliError::SubdirLoop {
            dir: dir.to_string(),
        });
    }
    let attrs = unit_attrs(ctx, &descriptor)?;
    let subdirs = attrs.subdirs.clone();
    out.push((dir.to_string(), descriptor, attrs));
    for sub in subdirs {
        let child = if dir == "." {
            sub
        } else {
            format!("{dir}/{sub}")
        };
        let child = normalize(Path::new(&child)).display().to_string();
        let descriptor = load_descriptor(&top.join(ctx.descriptor_path(&child)))?;
        discover(ctx, top, &child, descriptor, seen, out)?;
    }
    Ok(())
}

fn unit_attrs(ctx: &RunContext, descriptor: &Descriptor) -> Result<UnitAttrs, ConfigError> {
    let scope = VarScope::new(&ctx.cmdline, &descriptor.vars, &ctx.root_vars);
    UnitAttrs::from_scope(&scope)
}

/// Processed unit directories strictly below `dir`.
fn descendants_of(dir: &str, all: &[String]) -> Vec<String> {
    let prefix = format!("{dir}/");
    all.iter()
        .filter(|other| {
            if dir == "." {
                other.as_str() != "."
            } else {
                other.starts_with(&prefix)
            }
        })
        .cloned()
        .collect()
}

/// Writes the per-unit sibling artifacts, skipping renames when content is
/// unchanged so reruns stay idempotent.
fn write_siblings(top: &Path, unit: &BuildUnit) -> Result<(), CliError> {
    if unit.attrs.is_test() {
        let mut out = OutputFile::create(top.join(unit.obj_path("testlist.c")))?;
        out.write_str(&test_registry(unit))?;
        out.commit_if_changed()?;
    }
    if !unit.languages.is_empty() {
        let mut out = OutputFile::create(top.join(unit.base_dir.join("LINGUAS")))?;
        out.write_str(&language_list(unit))?;
        out.commit_if_changed()?;
    }
    let ignore = ignore_list(unit);
    if !ignore.is_empty() {
        let mut out = OutputFile::create(top.join(unit.base_dir.join(".gitignore")))?;
        out.write_str(&ignore)?;
        out.commit_if_changed()?;
    }
    Ok(())
}
