//! Serializable per-unit graph summaries.
//!
//! Backs the `--dump-graph` option: a stable JSON view of what the graph
//! builder resolved, useful when a generated build file disagrees with
//! expectations.

use std::path::PathBuf;

use serde::Serialize;

use crate::unit::BuildUnit;

/// Snapshot of one unit's resolved dependency graph.
#[derive(Serialize, Debug)]
pub struct UnitSummary {
    /// Unit directory relative to the top directory.
    pub unit: String,
    /// Declared and synthesized sources, in order.
    pub sources: Vec<SourceSummary>,
    /// Language codes registered by translation catalogs.
    pub languages: Vec<String>,
}

/// Snapshot of one source and its flattened prerequisites.
#[derive(Serialize, Debug)]
pub struct SourceSummary {
    /// The source's name within the unit.
    pub name: String,
    /// Resolved path, absent for path-less aggregators.
    pub path: Option<PathBuf>,
    /// Generator source when the file is synthesized.
    pub origin: Option<PathBuf>,
    /// Whether the source is generated rather than found on disk.
    pub generated: bool,
    /// Flattened transitive prerequisites, in discovery order.
    pub prereqs: Vec<PathBuf>,
}

/// Builds the serializable summary of a fully loaded unit.
pub fn summarize_unit(unit: &BuildUnit) -> UnitSummary {
    let sources = unit
        .sources
        .iter()
        .map(|&id| {
            let node = unit.node(id);
            SourceSummary {
                name: node.name.clone(),
                path: node.path.clone(),
                origin: node.origin.clone(),
                generated: node.generated,
                prereqs: unit.prereqs(id),
            }
        })
        .collect();
    UnitSummary {
        unit: unit.name.clone(),
        sources,
        languages: unit.languages.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::load_unit_sources;
    use crate::context::RunContext;
    use makegen_config::{parse_descriptor, UnitAttrs, VarScope, VarStore};
    use makegen_scan::FileCache;
    use std::path::Path;

    #[test]
    fn summary_reflects_graph() {
        let mut cache = FileCache::new();
        cache.add_source("dlls/foo/main.c", "#include \"util.h\"\n");
        cache.add_source("dlls/foo/util.h", "");
        let ctx = RunContext::new(cache);
        let parsed = parse_descriptor(Path::new("Makefile.in"), "SOURCES = main.c\n").unwrap();
        let empty = VarStore::new();
        let scope = VarScope::new(&ctx.cmdline, &parsed.vars, &empty);
        let attrs = UnitAttrs::from_scope(&scope).unwrap();
        let mut unit = BuildUnit::new("dlls/foo", parsed, attrs);
        load_unit_sources(&ctx, &mut unit).unwrap();

        let summary = summarize_unit(&unit);
        assert_eq!(summary.unit, "dlls/foo");
        assert_eq!(summary.sources.len(), 1);
        let src = &summary.sources[0];
        assert_eq!(src.name, "main.c");
        assert_eq!(src.prereqs, vec![PathBuf::from("dlls/foo/util.h")]);
        assert!(!src.generated);

        let json = serde_json::to_string_pretty(&summary).unwrap();
        assert!(json.contains("\"dlls/foo/util.h\""));
    }
}
