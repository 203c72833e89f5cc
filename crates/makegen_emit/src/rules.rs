//! The per-unit rule emitter.
//!
//! Walks a fully loaded unit's source list in declaration order and emits
//! compile/generate rules with flattened transitive prerequisite lists,
//! accumulates clean/install/test lists, then closes with the aggregate
//! targets. The returned text is the complete output file: the descriptor's
//! preamble verbatim, the sentinel line, then the generated rules.

use std::path::Path;

use makegen_common::{file_name, replace_extension, strip_extension};
use makegen_config::SENTINEL;
use makegen_graph::{BuildUnit, NodeId, RunContext};
use makegen_scan::SourceCategory;
use makegen_source::{CategoryMeta, FileFlags};

/// The install class of one recorded install entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InstallClass {
    /// Plain data file.
    Data,
    /// Executable program.
    Program,
    /// Interpreted script.
    Script,
    /// Symbolic link to an already-installed artifact.
    Symlink,
    /// Development header.
    Header,
}

impl InstallClass {
    fn tool(self) -> &'static str {
        match self {
            InstallClass::Data | InstallClass::Header => "$(INSTALL_DATA)",
            InstallClass::Program => "$(INSTALL_PROGRAM)",
            InstallClass::Script => "$(INSTALL_SCRIPT)",
            InstallClass::Symlink => "$(LN_S)",
        }
    }
}

/// One recorded install action.
#[derive(Clone, Debug)]
pub struct InstallEntry {
    /// The built (or source-tree) artifact to install.
    pub artifact: String,
    /// The classified destination path, in `$(dir)` form.
    pub destination: String,
    /// How the artifact is installed.
    pub class: InstallClass,
}

/// Emits the complete output text for one loaded unit.
///
/// `descendants` lists every recursively discovered child unit directory;
/// it is empty for leaf units and in single-directory mode, and drives the
/// parent-only `distclean` and regeneration rules.
pub fn emit_unit(ctx: &RunContext, unit: &BuildUnit, descendants: &[String]) -> String {
    Emitter::new(ctx, unit).run(descendants)
}

struct Emitter<'a> {
    ctx: &'a RunContext,
    unit: &'a BuildUnit,
    rules: String,
    all: Vec<String>,
    clean: Vec<String>,
    objects: Vec<String>,
    cross_objects: Vec<String>,
    implib_objects: Vec<String>,
    install_lib: Vec<InstallEntry>,
    install_dev: Vec<InstallEntry>,
    test_markers: Vec<String>,
}

impl<'a> Emitter<'a> {
    fn new(ctx: &'a RunContext, unit: &'a BuildUnit) -> Self {
        Self {
            ctx,
            unit,
            rules: String::new(),
            all: Vec::new(),
            clean: Vec::new(),
            objects: Vec::new(),
            cross_objects: Vec::new(),
            implib_objects: Vec::new(),
            install_lib: Vec::new(),
            install_dev: Vec::new(),
            test_markers: Vec::new(),
        }
    }

    fn run(mut self, descendants: &[String]) -> String {
        for &id in &self.unit.sources {
            if self.unit.node(id).generated {
                self.emit_generated(id);
            } else {
                self.emit_source(id);
            }
        }
        self.emit_link_rules();

        let mut out = self.unit.preamble.clone();
        out.push_str(SENTINEL);
        out.push_str("\n\n");
        if !self.all.is_empty() {
            out.push_str(&format!("all: {}\n\n", self.all.join(" ")));
        } else {
            out.push_str("all:\n\n");
        }
        out.push_str(&self.rules);
        self.emit_aggregates(&mut out, descendants);
        out
    }

    fn emit_source(&mut self, id: NodeId) {
        let node = self.unit.node(id);
        let name = node.name.clone();
        let src = self.node_path(id);
        match SourceCategory::from_name(file_name(&name)) {
            SourceCategory::C | SourceCategory::ObjC => {
                let implib = node
                    .file
                    .as_deref()
                    .is_some_and(|f| f.has_flag(FileFlags::C_IMPLIB));
                let obj = self.compile_rule(id, &name, &src);
                if implib {
                    self.implib_objects.push(obj);
                }
            }
            SourceCategory::MessageCatalog => {
                let res = self.display(&self.unit.obj_path(&replace_extension(&name, "res")));
                let mut prereqs = vec![src.clone()];
                prereqs.extend(self.prereq_paths(id));
                self.rule(&[res.clone()], &prereqs, &[format!("$(MC) -o $@ {src}")]);
                self.objects.push(res.clone());
                self.clean.push(res);
            }
            SourceCategory::ResourceScript => {
                let res = self.display(&self.unit.obj_path(&replace_extension(&name, "res")));
                let mut prereqs = vec![src.clone()];
                prereqs.extend(self.prereq_paths(id));
                self.rule(&[res.clone()], &prereqs, &[format!("$(RC) -o $@ {src}")]);
                self.objects.push(res.clone());
                self.clean.push(res);
            }
            SourceCategory::Template | SourceCategory::ManTemplate => {
                self.emit_template(id, &name, &src);
            }
            SourceCategory::Header | SourceCategory::Inline | SourceCategory::Idl => {
                if node
                    .file
                    .as_deref()
                    .is_some_and(|f| f.has_flag(FileFlags::INSTALL))
                {
                    self.install_dev.push(InstallEntry {
                        artifact: src,
                        destination: format!("$(includedir)/{name}"),
                        class: InstallClass::Header,
                    });
                }
            }
            // Grammar and lexer sources compile through their generated
            // counterparts; font descriptors and translation catalogs
            // contribute through derived entries and sibling artifacts.
            _ => {}
        }
    }

    fn emit_template(&mut self, id: NodeId, name: &str, src: &str) {
        let node = self.unit.node(id);
        let man = match node.file.as_deref().map(|f| &f.meta) {
            Some(CategoryMeta::ManPage(man)) => Some(man.clone()),
            _ => None,
        };
        let installable = node
            .file
            .as_deref()
            .is_some_and(|f| f.has_flag(FileFlags::INSTALL));
        let output = strip_extension(name).to_string();
        let target = self.display(&self.unit.obj_path(&output));
        let mut prereqs = vec![src.to_string()];
        prereqs.extend(self.prereq_paths(id));
        self.rule(&[target.clone()], &prereqs, &[format!("$(SED_CMD) {src} >$@")]);
        self.clean.push(target.clone());
        if let Some(man) = man {
            self.install_dev.push(InstallEntry {
                artifact: target,
                destination: format!(
                    "$(mandir)/man{}/{}.{}",
                    man.section, man.program, man.section
                ),
                class: InstallClass::Data,
            });
        } else if installable {
            self.install_lib.push(InstallEntry {
                artifact: target,
                destination: format!("$(datadir)/{output}"),
                class: InstallClass::Data,
            });
        }
    }

    fn emit_generated(&mut self, id: NodeId) {
        let node = self.unit.node(id);
        let name = node.name.clone();
        let target = self.node_path(id);
        let origin = node.origin.as_ref().map(|p| self.display(p));

        if let Some(origin) = origin.as_deref() {
            if origin.ends_with(".y") {
                // One generator run produces both the parser source and its
                // side header.
                let header = self.display(&self.unit.obj_path(&replace_extension(&name, "h")));
                self.rule(
                    &[target.clone(), header.clone()],
                    &[origin.to_string()],
                    &[format!("$(BISON) -o {target} {origin}")],
                );
                self.clean.push(header);
                self.clean.push(target.clone());
                self.compile_rule(id, &name, &target);
                return;
            }
            if origin.ends_with(".l") {
                self.rule(
                    &[target.clone()],
                    &[origin.to_string()],
                    &[format!("$(FLEX) -o $@ {origin}")],
                );
                self.clean.push(target.clone());
                self.compile_rule(id, &name, &target);
                return;
            }
            if origin.ends_with(".idl") {
                self.emit_idl_output(id, &name, &target, origin);
                return;
            }
            if origin.ends_with(".x") {
                self.rule(
                    &[target.clone()],
                    &[origin.to_string()],
                    &[format!("$(XGEN) -o $@ {origin}")],
                );
                self.clean.push(target);
                return;
            }
            if origin.ends_with(".sfd") {
                self.emit_font(&name, &target, origin);
                return;
            }
        }

        if name == "dlldata.c" {
            let idls = self.proxy_idl_paths();
            self.rule(
                &[target.clone()],
                &idls,
                &[format!("$(IDLC) --dlldata-only -o $@ {}", idls.join(" "))],
            );
            self.clean.push(target.clone());
            self.compile_rule(id, &name, &target);
            return;
        }
        if name == "rsrc.pot" {
            let rcs = self.po_resource_paths();
            self.rule(
                &[target.clone()],
                &rcs,
                &[format!("$(RC) --pot -o $@ {}", rcs.join(" "))],
            );
            self.clean.push(target);
            return;
        }
        if name == "testlist.c" {
            // Content is written directly as a sibling artifact; only the
            // compile rule is emitted here.
            self.clean.push(target.clone());
            self.compile_rule(id, &name, &target);
        }
    }

    fn emit_idl_output(&mut self, id: NodeId, name: &str, target: &str, origin: &str) {
        let flag = if name.ends_with("_c.c") {
            "-c"
        } else if name.ends_with("_s.c") {
            "-s"
        } else if name.ends_with("_i.c") {
            "-u"
        } else if name.ends_with("_p.c") {
            "-p"
        } else if name.ends_with(".tlb") {
            "-t"
        } else if name.ends_with("_t.res") {
            "-r"
        } else {
            "-h"
        };
        let mut prereqs = vec![origin.to_string()];
        prereqs.extend(self.prereq_paths(id));
        self.rule(
            &[target.to_string()],
            &prereqs,
            &[format!("$(IDLC) {flag} -o $@ {origin}")],
        );
        self.clean.push(target.to_string());
        if name.ends_with(".c") {
            self.compile_rule(id, name, target);
        } else if name.ends_with(".res") {
            self.objects.push(target.to_string());
        } else if name.ends_with(".h") {
            let installable = self
                .unit
                .node(id)
                .file
                .as_deref()
                .is_some_and(|f| f.has_flag(FileFlags::INSTALL));
            if installable {
                self.install_dev.push(InstallEntry {
                    artifact: target.to_string(),
                    destination: format!("$(includedir)/{name}"),
                    class: InstallClass::Header,
                });
            }
        }
    }

    fn emit_font(&mut self, name: &str, target: &str, origin: &str) {
        let args = self
            .unit
            .lookup(file_name(origin))
            .and_then(|sfd| self.unit.node(sfd).file.clone())
            .and_then(|file| match &file.meta {
                CategoryMeta::Fonts(fonts) => fonts
                    .iter()
                    .find(|req| req.target == name)
                    .map(|req| req.args.clone()),
                _ => None,
            })
            .unwrap_or_default();
        self.rule(
            &[target.to_string()],
            &[origin.to_string()],
            &[format!("$(FONTC) -o $@ {origin} {args}")],
        );
        self.clean.push(target.to_string());
        self.install_lib.push(InstallEntry {
            artifact: target.to_string(),
            destination: format!("$(fontdir)/{name}"),
            class: InstallClass::Data,
        });
    }

    /// Emits the compile rule(s) for one C-family source and returns the
    /// primary object path.
    ///
    /// When the unit declares a secondary target architecture, a parallel
    /// cross-compiled object rule is emitted from the same prerequisite
    /// list.
    fn compile_rule(&mut self, id: NodeId, name: &str, src: &str) -> String {
        let obj = self.display(&self.unit.obj_path(&replace_extension(name, "o")));
        let mut prereqs = vec![src.to_string()];
        prereqs.extend(self.prereq_paths(id));
        self.rule(&[obj.clone()], &prereqs, &[format!("$(CC) -c -o $@ {src}")]);
        self.objects.push(obj.clone());
        self.clean.push(obj.clone());
        if self.unit.attrs.cross_target.is_some() {
            let cross = self.display(&self.unit.obj_path(&replace_extension(name, "cross.o")));
            self.rule(
                &[cross.clone()],
                &prereqs,
                &[format!("$(CROSSCC) -c -o $@ {src}")],
            );
            self.cross_objects.push(cross.clone());
            self.clean.push(cross);
        }
        obj
    }

    fn emit_link_rules(&mut self) {
        let attrs = self.unit.attrs.clone();
        let link_flags = self.link_flags();

        if let Some(module) = &attrs.module {
            let target = self.display(&self.unit.obj_path(module));
            let objects = self.objects.clone();
            self.rule(
                &[target.clone()],
                &objects,
                &[format!(
                    "$(LINK) -shared -o $@ {}{link_flags}",
                    objects.join(" ")
                )],
            );
            self.all.push(target.clone());
            self.clean.push(target.clone());
            self.install_lib.push(InstallEntry {
                artifact: target,
                destination: format!("$(libdir)/{module}"),
                class: InstallClass::Program,
            });
            if attrs.cross_target.is_some() && !self.cross_objects.is_empty() {
                let cross_target = self.display(&self.unit.obj_path(&format!("{module}.cross")));
                let cross_objects = self.cross_objects.clone();
                self.rule(
                    &[cross_target.clone()],
                    &cross_objects,
                    &[format!(
                        "$(CROSSLINK) -shared -o $@ {}{link_flags}",
                        cross_objects.join(" ")
                    )],
                );
                self.all.push(cross_target.clone());
                self.clean.push(cross_target);
            }
        }

        if let Some(static_lib) = &attrs.static_lib {
            let target = self.display(&self.unit.obj_path(static_lib));
            let objects = self.objects.clone();
            self.rule(
                &[target.clone()],
                &objects,
                &[
                    format!("$(AR) rc $@ {}", objects.join(" ")),
                    "$(RANLIB) $@".to_string(),
                ],
            );
            self.all.push(target.clone());
            self.clean.push(target.clone());
            self.install_dev.push(InstallEntry {
                artifact: target,
                destination: format!("$(libdir)/{static_lib}"),
                class: InstallClass::Data,
            });
        }

        if let Some(import_lib) = &attrs.import_lib {
            let lib_name = format!("lib{import_lib}.a");
            let target = self.display(&self.unit.obj_path(&lib_name));
            let objects = if self.implib_objects.is_empty() {
                self.objects.clone()
            } else {
                self.implib_objects.clone()
            };
            self.rule(
                &[target.clone()],
                &objects,
                &[
                    format!("$(AR) rc $@ {}", objects.join(" ")),
                    "$(RANLIB) $@".to_string(),
                ],
            );
            self.clean.push(target.clone());
            self.install_dev.push(InstallEntry {
                artifact: target,
                destination: format!("$(libdir)/{lib_name}"),
                class: InstallClass::Data,
            });
        }

        for program in &attrs.programs {
            let target = self.display(&self.unit.obj_path(program));
            let objects = self.objects.clone();
            self.rule(
                &[target.clone()],
                &objects,
                &[format!("$(LINK) -o $@ {}{link_flags}", objects.join(" "))],
            );
            self.all.push(target.clone());
            self.clean.push(target.clone());
            self.install_lib.push(InstallEntry {
                artifact: target,
                destination: format!("$(bindir)/{program}"),
                class: InstallClass::Program,
            });
        }

        // Aliases link to the first program, relative within the install
        // directory.
        if let Some(program) = attrs.programs.first() {
            for alias in &attrs.symlinks {
                self.install_lib.push(InstallEntry {
                    artifact: program.clone(),
                    destination: format!("$(bindir)/{alias}"),
                    class: InstallClass::Symlink,
                });
            }
        }

        for script in &attrs.scripts {
            self.install_lib.push(InstallEntry {
                artifact: self.display(&self.unit.src_path(script)),
                destination: format!("$(bindir)/{script}"),
                class: InstallClass::Script,
            });
        }

        for extra in &attrs.install_lib {
            self.install_lib.push(InstallEntry {
                artifact: self.display(&self.unit.src_path(extra)),
                destination: format!("$(datadir)/{extra}"),
                class: InstallClass::Data,
            });
        }
        for extra in &attrs.install_dev {
            self.install_dev.push(InstallEntry {
                artifact: self.display(&self.unit.src_path(extra)),
                destination: format!("$(datadir)/{extra}"),
                class: InstallClass::Data,
            });
        }

        if let Some(testdll) = &attrs.testdll {
            self.emit_test_rules(testdll, &link_flags);
        }
    }

    fn emit_test_rules(&mut self, testdll: &str, link_flags: &str) {
        let stem = strip_extension(testdll).to_string();
        let binary = self.display(&self.unit.obj_path(&format!("{stem}_test")));
        let objects = self.objects.clone();
        self.rule(
            &[binary.clone()],
            &objects,
            &[format!("$(LINK) -o $@ {}{link_flags}", objects.join(" "))],
        );
        self.all.push(binary.clone());
        self.clean.push(binary.clone());

        let test_stems: Vec<String> = self
            .unit
            .sources
            .iter()
            .map(|&id| self.unit.node(id))
            .filter(|node| {
                !node.generated
                    && matches!(
                        SourceCategory::from_name(file_name(&node.name)),
                        SourceCategory::C
                    )
            })
            .map(|node| strip_extension(file_name(&node.name)).to_string())
            .collect();
        for test in test_stems {
            let marker = self.display(&self.unit.obj_path(&format!("{test}.ok")));
            self.rule(
                &[marker.clone()],
                &[binary.clone()],
                &[format!("$(RUNTEST) {binary} {test} && touch $@")],
            );
            self.clean.push(marker.clone());
            self.test_markers.push(marker);
        }
    }

    fn emit_aggregates(&self, out: &mut String, descendants: &[String]) {
        let mut phony = vec!["all", "clean", "install", "install-lib", "install-dev", "uninstall"];

        out.push_str("clean:\n");
        if !self.clean.is_empty() {
            out.push_str(&format!("\t$(RM) {}\n", self.clean.join(" ")));
        }
        out.push('\n');

        for (target, entries) in [
            ("install-lib", &self.install_lib),
            ("install-dev", &self.install_dev),
        ] {
            out.push_str(&format!("{target}:\n"));
            for entry in entries {
                out.push_str(&format!(
                    "\t{} {} $(DESTDIR){}\n",
                    entry.class.tool(),
                    entry.artifact,
                    entry.destination
                ));
            }
            out.push('\n');
        }
        out.push_str("install: install-lib install-dev\n\n");

        out.push_str("uninstall:\n");
        let destinations: Vec<String> = self
            .install_lib
            .iter()
            .chain(self.install_dev.iter())
            .map(|e| format!("$(DESTDIR){}", e.destination))
            .collect();
        if !destinations.is_empty() {
            out.push_str(&format!("\t$(RM) {}\n", destinations.join(" ")));
        }
        out.push('\n');

        if !self.test_markers.is_empty() {
            out.push_str(&format!("check test: {}\n\n", self.test_markers.join(" ")));
            phony.push("check");
            phony.push("test");
        }

        if !descendants.is_empty() {
            let build_files: Vec<String> = std::iter::once(self.unit.name.clone())
                .chain(descendants.iter().cloned())
                .map(|dir| self.display(&self.ctx.build_file_path(&dir)))
                .collect();
            out.push_str(&format!("distclean: clean\n\t$(RM) {}\n\n", build_files.join(" ")));
            phony.push("distclean");

            let descriptors: Vec<String> = std::iter::once(self.unit.name.clone())
                .chain(descendants.iter().cloned())
                .map(|dir| self.display(&self.ctx.descriptor_path(&dir)))
                .collect();
            out.push_str(&format!(
                "{}: {}\n\t$(MAKEGEN) -f {}\n\n",
                self.ctx.output_name,
                descriptors.join(" "),
                self.ctx.output_name
            ));
        }

        out.push_str(&format!(".PHONY: {}\n", phony.join(" ")));
    }

    fn rule(&mut self, targets: &[String], prereqs: &[String], commands: &[String]) {
        self.rules.push_str(&targets.join(" "));
        self.rules.push(':');
        for prereq in prereqs {
            self.rules.push(' ');
            self.rules.push_str(prereq);
        }
        self.rules.push('\n');
        for command in commands {
            self.rules.push('\t');
            self.rules.push_str(command);
            self.rules.push('\n');
        }
        self.rules.push('\n');
    }

    fn link_flags(&self) -> String {
        let mut flags = String::new();
        for import in &self.unit.attrs.imports {
            flags.push_str(&format!(" -l{import}"));
        }
        for delay in &self.unit.attrs.delay_imports {
            flags.push_str(&format!(" -Wl,--delayload=-l{delay}"));
        }
        flags
    }

    fn prereq_paths(&self, id: NodeId) -> Vec<String> {
        self.unit
            .prereqs(id)
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    fn node_path(&self, id: NodeId) -> String {
        match &self.unit.node(id).path {
            Some(path) => path.display().to_string(),
            None => self.unit.node(id).name.clone(),
        }
    }

    fn display(&self, path: &Path) -> String {
        path.display().to_string()
    }

    fn proxy_idl_paths(&self) -> Vec<String> {
        self.unit
            .sources
            .iter()
            .map(|&id| self.unit.node(id))
            .filter(|node| {
                !node.generated
                    && node
                        .file
                        .as_deref()
                        .is_some_and(|f| f.has_flag(FileFlags::IDL_PROXY))
            })
            .filter_map(|node| node.path.as_ref().map(|p| p.display().to_string()))
            .collect()
    }

    fn po_resource_paths(&self) -> Vec<String> {
        self.unit
            .sources
            .iter()
            .map(|&id| self.unit.node(id))
            .filter(|node| {
                !node.generated
                    && node
                        .file
                        .as_deref()
                        .is_some_and(|f| f.has_flag(FileFlags::RC_PO))
            })
            .filter_map(|node| node.path.as_ref().map(|p| p.display().to_string()))
            .collect()
    }
}
