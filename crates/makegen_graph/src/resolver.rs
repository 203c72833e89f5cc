//! The ordered-strategy include resolver.
//!
//! Generated-file heuristics run before plain lookups: a generated header's
//! true dependency is its generator source, not a same-named header that
//! may not yet exist on disk.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use makegen_common::paths::normalize;
use makegen_common::replace_extension;
use makegen_scan::ScanError;
use makegen_source::{DepKind, PhysicalFile};

use crate::context::RunContext;
use crate::unit::BuildUnit;

/// A successful resolution: the scanned file (if any content backs the
/// reference), the path downstream rules should use, and the generator
/// source when the reference is a to-be-generated output.
pub struct Resolved {
    /// The scanned backing file.
    pub file: Option<Rc<PhysicalFile>>,
    /// The reference path for emitted rules.
    pub path: PathBuf,
    /// The generator's source file, when generated.
    pub origin: Option<PathBuf>,
    /// Whether the reference is synthesized rather than found on disk.
    pub generated: bool,
}

/// Resolves `name` (referenced as `kind` from `includer_path`) in the
/// context of `unit`.
///
/// Returns `Ok(None)` when every strategy misses; the caller decides
/// whether that is tolerated (system includes) or fatal.
pub fn resolve(
    ctx: &RunContext,
    unit: &BuildUnit,
    name: &str,
    kind: DepKind,
    includer_path: Option<&Path>,
) -> Result<Option<Resolved>, ScanError> {
    // 1-2. Generated-file heuristics against the unit's source directory.
    if let Some(resolved) = try_generated(ctx, name, &unit.src_dir, &unit.obj_dir)? {
        return Ok(Some(resolved));
    }

    // 3. Literal lookup in the local source directory, then the configured
    // parent directory.
    let local = unit.src_path(name);
    if ctx.cache.exists(&local) {
        return Ok(Some(literal(ctx, local)?));
    }
    if let Some(parent) = &unit.attrs.parent_src {
        let candidate = normalize(&unit.base_dir.join(parent).join(name));
        if ctx.cache.exists(&candidate) {
            return Ok(Some(literal(ctx, candidate)?));
        }
    }

    // 4. Generated-file heuristics against the global include tree,
    // including the template-to-header substitution.
    if let Some(resolved) = try_generated(ctx, name, &ctx.include_dir, &ctx.include_dir)? {
        return Ok(Some(resolved));
    }
    if name.ends_with(".h") {
        let template = ctx.include_dir.join(format!("{name}.in"));
        if ctx.cache.exists(&template) {
            return Ok(Some(Resolved {
                file: Some(ctx.cache.load(&template)?),
                path: ctx.include_dir.join(name),
                origin: Some(template),
                generated: true,
            }));
        }
    }

    // 5. Literal lookup in the global include tree.
    let global = normalize(&ctx.include_dir.join(name));
    if ctx.cache.exists(&global) {
        return Ok(Some(literal(ctx, global)?));
    }

    // 6. Alternate C runtime subtree.
    if unit.attrs.use_msvcrt {
        let msvcrt = ctx.include_dir.join("msvcrt").join(name);
        if ctx.cache.exists(&msvcrt) {
            return Ok(Some(literal(ctx, msvcrt)?));
        }
    }

    // 7. Extra include paths, in declaration order. Paths inside the global
    // include root go through the global resolution so a shared header is
    // never resolved into the wrong variant.
    for raw in &unit.attrs.include_paths {
        let dir = normalize(Path::new(raw.trim_start_matches("-I")));
        if dir.starts_with(&ctx.include_dir) {
            if let Some(resolved) = try_generated(ctx, name, &dir, &dir)? {
                return Ok(Some(resolved));
            }
        }
        let candidate = normalize(&dir.join(name));
        if ctx.cache.exists(&candidate) {
            return Ok(Some(literal(ctx, candidate)?));
        }
    }

    // 8. Last resort for quoted includes: the including file's directory.
    if matches!(kind, DepKind::Local | DepKind::CppQuoted) {
        if let Some(dir) = includer_path.and_then(Path::parent) {
            let candidate = normalize(&dir.join(name));
            if ctx.cache.exists(&candidate) {
                return Ok(Some(literal(ctx, candidate)?));
            }
        }
    }

    Ok(None)
}

/// Generated-file heuristics for one source/object directory pair:
/// `*.tab.h` from a grammar source, headers and type libraries from a
/// same-stem interface definition.
fn try_generated(
    ctx: &RunContext,
    name: &str,
    src_dir: &Path,
    obj_dir: &Path,
) -> Result<Option<Resolved>, ScanError> {
    if let Some(stem) = name.strip_suffix(".tab.h") {
        let grammar = normalize(&src_dir.join(format!("{stem}.y")));
        if ctx.cache.exists(&grammar) {
            return Ok(Some(Resolved {
                file: Some(ctx.cache.load(&grammar)?),
                path: normalize(&obj_dir.join(name)),
                origin: Some(grammar),
                generated: true,
            }));
        }
    }
    if name.ends_with(".h") || name.ends_with(".tlb") {
        let idl = normalize(&src_dir.join(replace_extension(name, "idl")));
        if ctx.cache.exists(&idl) {
            return Ok(Some(Resolved {
                file: Some(ctx.cache.load(&idl)?),
                path: normalize(&obj_dir.join(name)),
                origin: Some(idl),
                generated: true,
            }));
        }
    }
    Ok(None)
}

fn literal(ctx: &RunContext, path: PathBuf) -> Result<Resolved, ScanError> {
    Ok(Resolved {
        file: Some(ctx.cache.load(&path)?),
        path,
        origin: None,
        generated: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use makegen_config::{Descriptor, UnitAttrs};
    use makegen_scan::FileCache;

    fn setup(files: &[(&str, &str)]) -> (RunContext, BuildUnit) {
        let mut cache = FileCache::new();
        for (path, content) in files {
            cache.add_source(*path, *content);
        }
        let ctx = RunContext::new(cache);
        let unit = BuildUnit::new("dlls/foo", Descriptor::default(), UnitAttrs::default());
        (ctx, unit)
    }

    #[test]
    fn local_literal() {
        let (ctx, unit) = setup(&[("dlls/foo/util.h", "")]);
        let r = resolve(&ctx, &unit, "util.h", DepKind::Local, None)
            .unwrap()
            .unwrap();
        assert_eq!(r.path, PathBuf::from("dlls/foo/util.h"));
        assert!(!r.generated);
    }

    #[test]
    fn grammar_header_heuristic_wins() {
        // Even with a same-named header on disk, the grammar source wins.
        let (ctx, unit) = setup(&[("dlls/foo/parser.y", ""), ("dlls/foo/parser.tab.h", "")]);
        let r = resolve(&ctx, &unit, "parser.tab.h", DepKind::Local, None)
            .unwrap()
            .unwrap();
        assert!(r.generated);
        assert_eq!(r.origin, Some(PathBuf::from("dlls/foo/parser.y")));
        assert_eq!(r.path, PathBuf::from("dlls/foo/parser.tab.h"));
    }

    #[test]
    fn header_from_interface_definition() {
        let (ctx, unit) = setup(&[("dlls/foo/custom.idl", "")]);
        let r = resolve(&ctx, &unit, "custom.h", DepKind::Local, None)
            .unwrap()
            .unwrap();
        assert!(r.generated);
        assert_eq!(r.origin, Some(PathBuf::from("dlls/foo/custom.idl")));
        assert_eq!(
            r.file.unwrap().path,
            PathBuf::from("dlls/foo/custom.idl")
        );
    }

    #[test]
    fn typelib_from_interface_definition() {
        let (ctx, unit) = setup(&[("dlls/foo/app.idl", "")]);
        let r = resolve(&ctx, &unit, "app.tlb", DepKind::Local, None)
            .unwrap()
            .unwrap();
        assert!(r.generated);
        assert_eq!(r.path, PathBuf::from("dlls/foo/app.tlb"));
    }

    #[test]
    fn parent_directory_fallback() {
        let (ctx, mut unit) = setup(&[("dlls/bar/shared.c", "")]);
        unit.attrs.parent_src = Some("../bar".to_string());
        let r = resolve(&ctx, &unit, "shared.c", DepKind::Local, None)
            .unwrap()
            .unwrap();
        assert_eq!(r.path, PathBuf::from("dlls/bar/shared.c"));
    }

    #[test]
    fn global_include_tree() {
        let (ctx, unit) = setup(&[("include/winbase.h", "")]);
        let r = resolve(&ctx, &unit, "winbase.h", DepKind::System, None)
            .unwrap()
            .unwrap();
        assert_eq!(r.path, PathBuf::from("include/winbase.h"));
    }

    #[test]
    fn global_generated_header() {
        let (ctx, unit) = setup(&[("include/oaidl.idl", "")]);
        let r = resolve(&ctx, &unit, "oaidl.h", DepKind::System, None)
            .unwrap()
            .unwrap();
        assert!(r.generated);
        assert_eq!(r.path, PathBuf::from("include/oaidl.h"));
    }

    #[test]
    fn template_to_header_substitution() {
        let (ctx, unit) = setup(&[("include/config.h.in", "")]);
        let r = resolve(&ctx, &unit, "config.h", DepKind::Local, None)
            .unwrap()
            .unwrap();
        assert!(r.generated);
        assert_eq!(r.origin, Some(PathBuf::from("include/config.h.in")));
        assert_eq!(r.path, PathBuf::from("include/config.h"));
    }

    #[test]
    fn msvcrt_subtree_only_with_profile() {
        let (ctx, mut unit) = setup(&[("include/msvcrt/stdio.h", "")]);
        assert!(resolve(&ctx, &unit, "stdio.h", DepKind::System, None)
            .unwrap()
            .is_none());
        unit.attrs.use_msvcrt = true;
        let r = resolve(&ctx, &unit, "stdio.h", DepKind::System, None)
            .unwrap()
            .unwrap();
        assert_eq!(r.path, PathBuf::from("include/msvcrt/stdio.h"));
    }

    #[test]
    fn extra_include_paths_in_order() {
        let (ctx, mut unit) = setup(&[("libs/zlib/zlib.h", "")]);
        unit.attrs.include_paths = vec!["-Ilibs/zlib".to_string()];
        let r = resolve(&ctx, &unit, "zlib.h", DepKind::System, None)
            .unwrap()
            .unwrap();
        assert_eq!(r.path, PathBuf::from("libs/zlib/zlib.h"));
    }

    #[test]
    fn include_path_inside_global_root_uses_generated_lookup() {
        let (ctx, mut unit) = setup(&[("include/ddk/wdm.idl", "")]);
        unit.attrs.include_paths = vec!["include/ddk".to_string()];
        let r = resolve(&ctx, &unit, "wdm.h", DepKind::System, None)
            .unwrap()
            .unwrap();
        assert!(r.generated);
        assert_eq!(r.path, PathBuf::from("include/ddk/wdm.h"));
    }

    #[test]
    fn includer_directory_for_quoted_only() {
        let (ctx, unit) = setup(&[("libs/helper/detail.h", "")]);
        let includer = PathBuf::from("libs/helper/helper.h");
        let r = resolve(
            &ctx,
            &unit,
            "detail.h",
            DepKind::Local,
            Some(&includer),
        )
        .unwrap()
        .unwrap();
        assert_eq!(r.path, PathBuf::from("libs/helper/detail.h"));

        assert!(resolve(
            &ctx,
            &unit,
            "detail.h",
            DepKind::System,
            Some(&includer)
        )
        .unwrap()
        .is_none());
    }

    #[test]
    fn miss_returns_none() {
        let (ctx, unit) = setup(&[]);
        assert!(resolve(&ctx, &unit, "nonexistent.h", DepKind::System, None)
            .unwrap()
            .is_none());
    }
}
