//! Typed build-unit attributes extracted from descriptor variables.

use crate::error::ConfigError;
use crate::vars::VarScope;

/// The declared attributes of one build unit.
///
/// All fields come from descriptor variables, resolved through the normal
/// override chain; a unit's source list is fixed here, before any
/// dependency resolution begins.
#[derive(Clone, Debug, Default)]
pub struct UnitAttrs {
    /// Primary module name (`MODULE`), e.g. `kernel32.dll`.
    pub module: Option<String>,
    /// Static library name (`STATICLIB`).
    pub static_lib: Option<String>,
    /// Import library name (`IMPORTLIB`).
    pub import_lib: Option<String>,
    /// Imported libraries (`IMPORTS`).
    pub imports: Vec<String>,
    /// Delay-loaded imports (`DELAYIMPORTS`).
    pub delay_imports: Vec<String>,
    /// Program names to build (`PROGRAMS`).
    pub programs: Vec<String>,
    /// Scripts to install (`SCRIPTS`).
    pub scripts: Vec<String>,
    /// Program aliases installed as symbolic links (`SYMLINKS`).
    pub symlinks: Vec<String>,
    /// Declared source files (`SOURCES`), in declaration order.
    pub sources: Vec<String>,
    /// Child build-unit directory names (`SUBDIRS`).
    pub subdirs: Vec<String>,
    /// Extra include search paths (`INCLUDES`), in declaration order.
    pub include_paths: Vec<String>,
    /// Extra files for the runtime install class (`INSTALL_LIB`).
    pub install_lib: Vec<String>,
    /// Extra files for the development install class (`INSTALL_DEV`).
    pub install_dev: Vec<String>,
    /// Parent source directory for shared test/helper sources (`PARENTSRC`).
    pub parent_src: Option<String>,
    /// The module under test when this unit is a test module (`TESTDLL`).
    pub testdll: Option<String>,
    /// Secondary target architecture prefix (`CROSSTARGET`).
    pub cross_target: Option<String>,
    /// Whether the unit builds against the alternate C runtime profile.
    pub use_msvcrt: bool,
    /// Whether the unit is disabled entirely (`DISABLED`).
    pub disabled: bool,
}

impl UnitAttrs {
    /// Extracts the attributes visible through `scope`.
    pub fn from_scope(scope: &VarScope<'_>) -> Result<Self, ConfigError> {
        let flags = scope.get_array("EXTRADLLFLAGS")?;
        Ok(Self {
            module: scope.get("MODULE")?,
            static_lib: scope.get("STATICLIB")?,
            import_lib: scope.get("IMPORTLIB")?,
            imports: scope.get_array("IMPORTS")?,
            delay_imports: scope.get_array("DELAYIMPORTS")?,
            programs: scope.get_array("PROGRAMS")?,
            scripts: scope.get_array("SCRIPTS")?,
            symlinks: scope.get_array("SYMLINKS")?,
            sources: scope.get_array("SOURCES")?,
            subdirs: scope.get_array("SUBDIRS")?,
            include_paths: scope.get_array("INCLUDES")?,
            install_lib: scope.get_array("INSTALL_LIB")?,
            install_dev: scope.get_array("INSTALL_DEV")?,
            parent_src: scope.get("PARENTSRC")?,
            testdll: scope.get("TESTDLL")?,
            cross_target: scope.get("CROSSTARGET")?,
            use_msvcrt: flags.iter().any(|f| f == "-mno-cygwin"),
            disabled: scope.get("DISABLED")?.is_some(),
        })
    }

    /// Returns `true` when the unit is a test module.
    pub fn is_test(&self) -> bool {
        self.testdll.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::VarStore;

    #[test]
    fn extraction() {
        let empty = VarStore::new();
        let mut unit = VarStore::new();
        unit.set("MODULE", "comdlg32.dll");
        unit.set("IMPORTLIB", "comdlg32");
        unit.set("IMPORTS", "shell32 user32");
        unit.set("SOURCES", "main.c version.rc");
        unit.set("EXTRADLLFLAGS", "-mno-cygwin -Wb,--prefer-native");
        let scope = VarScope::new(&empty, &unit, &empty);
        let attrs = UnitAttrs::from_scope(&scope).unwrap();
        assert_eq!(attrs.module.as_deref(), Some("comdlg32.dll"));
        assert_eq!(attrs.imports, ["shell32", "user32"]);
        assert_eq!(attrs.sources, ["main.c", "version.rc"]);
        assert!(attrs.use_msvcrt);
        assert!(!attrs.disabled);
        assert!(!attrs.is_test());
    }

    #[test]
    fn program_aliases() {
        let empty = VarStore::new();
        let mut unit = VarStore::new();
        unit.set("PROGRAMS", "conv");
        unit.set("SYMLINKS", "conv2uni uni2conv");
        let scope = VarScope::new(&empty, &unit, &empty);
        let attrs = UnitAttrs::from_scope(&scope).unwrap();
        assert_eq!(attrs.symlinks, ["conv2uni", "uni2conv"]);
    }

    #[test]
    fn test_module_detection() {
        let empty = VarStore::new();
        let mut unit = VarStore::new();
        unit.set("TESTDLL", "ntdll.dll");
        unit.set("SOURCES", "rtl.c");
        let scope = VarScope::new(&empty, &unit, &empty);
        let attrs = UnitAttrs::from_scope(&scope).unwrap();
        assert!(attrs.is_test());
        assert_eq!(attrs.testdll.as_deref(), Some("ntdll.dll"));
    }

    #[test]
    fn sources_use_override_chain() {
        let mut cmdline = VarStore::new();
        let mut unit = VarStore::new();
        let empty = VarStore::new();
        unit.set("SOURCES", "a.c");
        cmdline.set("SOURCES", "b.c");
        let scope = VarScope::new(&cmdline, &unit, &empty);
        let attrs = UnitAttrs::from_scope(&scope).unwrap();
        assert_eq!(attrs.sources, ["b.c"]);
    }

    #[test]
    fn defaults_are_empty() {
        let empty = VarStore::new();
        let scope = VarScope::new(&empty, &empty, &empty);
        let attrs = UnitAttrs::from_scope(&scope).unwrap();
        assert!(attrs.module.is_none());
        assert!(attrs.sources.is_empty());
        assert!(!attrs.use_msvcrt);
    }
}
