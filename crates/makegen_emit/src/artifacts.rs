//! Sibling artifact content: test registry, language list, ignore file.

use makegen_common::{file_name, strip_extension};
use makegen_graph::BuildUnit;
use makegen_scan::SourceCategory;

/// Builds the content of a test module's generated registry source, one
/// entry point per compiled test source.
pub fn test_registry(unit: &BuildUnit) -> String {
    let mut out = String::from("/* Automatically generated by makegen; DO NOT EDIT!! */\n\n");
    let stems: Vec<String> = unit
        .sources
        .iter()
        .map(|&id| unit.node(id))
        .filter(|node| {
            !node.generated && matches!(SourceCategory::from_name(file_name(&node.name)), SourceCategory::C)
        })
        .map(|node| strip_extension(file_name(&node.name)).to_string())
        .collect();
    for stem in &stems {
        out.push_str(&format!("extern void func_{stem}(void);\n"));
    }
    out.push_str("\nconst struct test_entry test_registry[] =\n{\n");
    for stem in &stems {
        out.push_str(&format!("    {{ \"{stem}\", func_{stem} }},\n"));
    }
    out.push_str("    { 0, 0 }\n};\n");
    out
}

/// Builds the newline-separated list of translation-catalog language codes.
pub fn language_list(unit: &BuildUnit) -> String {
    let mut out = String::new();
    for lang in &unit.languages {
        out.push_str(lang);
        out.push('\n');
    }
    out
}

/// Builds a unit-local ignore file listing every generated artifact.
pub fn ignore_list(unit: &BuildUnit) -> String {
    let mut out = String::new();
    for &id in &unit.sources {
        let node = unit.node(id);
        if node.generated {
            out.push_str(&format!("/{}\n", node.name));
        }
    }
    out
}
