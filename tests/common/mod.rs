// Shared helpers for integration tests.
//
// Provides a pair of temporary directories (framework template and target
// project) and a fluent builder so each integration test can lay out both
// trees without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use framework_installer::config::ComponentRegistry;
use framework_installer::error::InstallError;
use framework_installer::install::{InstallReport, Installer};
use framework_installer::logging::Logger;
use framework_installer::merge::{
    Choice, ConflictResolver, DiffTool, PromptTranscript, ScriptedPrompt,
};

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// A template tree and a project tree inside one [`tempfile::TempDir`].
///
/// Both directories are deleted when the context is dropped.
pub struct InstallTestContext {
    tmp: tempfile::TempDir,
    /// Framework template root.
    pub source: PathBuf,
    /// Project root receiving the components.
    pub dest: PathBuf,
}

impl InstallTestContext {
    /// Create empty template and project directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let source = tmp.path().join("template");
        let dest = tmp.path().join("project");
        std::fs::create_dir_all(&source).expect("create template dir");
        std::fs::create_dir_all(&dest).expect("create project dir");
        Self { tmp, source, dest }
    }

    /// Read a project file relative to the project root.
    pub fn read_dest(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dest.join(rel)).expect("read project file")
    }

    /// Overwrite a project file, creating parents as needed.
    pub fn edit_dest(&self, rel: &str, content: &str) {
        write(&self.dest.join(rel), content);
    }

    /// Every file under the project root mapped to its content.
    pub fn dest_snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
            for entry in std::fs::read_dir(dir).expect("read dir") {
                let path = entry.expect("dir entry").path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    let rel = path.strip_prefix(root).expect("under root").to_path_buf();
                    out.insert(rel, std::fs::read(&path).expect("read file"));
                }
            }
        }
        let mut out = BTreeMap::new();
        walk(&self.dest, &self.dest, &mut out);
        out
    }

    /// Install `requested` using a scripted set of prompt answers.
    pub fn install(
        &self,
        requested: &[&str],
        answers: &[Choice],
    ) -> (Result<InstallReport, InstallError>, PromptTranscript) {
        let prompt = ScriptedPrompt::new(answers.iter().copied());
        let transcript = prompt.transcript();
        let mut resolver = ConflictResolver::new(Box::new(prompt));
        (self.install_with(requested, &mut resolver, false), transcript)
    }

    /// Install `requested` with a caller-supplied resolver.
    pub fn install_with(
        &self,
        requested: &[&str],
        resolver: &mut ConflictResolver,
        dry_run: bool,
    ) -> Result<InstallReport, InstallError> {
        let registry =
            ComponentRegistry::for_source_root(&self.source).expect("load component registry");
        let diff = DiffTool::default();
        let log = Logger::with_log_file(None);
        Installer::new(&registry, &self.source, &self.dest, &diff)
            .dry_run(dry_run)
            .install(requested, resolver, &log)
    }

    /// Path of the underlying temporary directory.
    pub fn tmp_path(&self) -> &Path {
        self.tmp.path()
    }
}

/// Fluent builder for [`InstallTestContext`].
pub struct InstallTestBuilder {
    ctx: InstallTestContext,
}

impl InstallTestBuilder {
    /// Begin building with empty template and project trees.
    pub fn new() -> Self {
        Self {
            ctx: InstallTestContext::new(),
        }
    }

    /// Write `content` to `rel` inside the template.
    pub fn with_source_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.source.join(rel), content);
        self
    }

    /// Write `content` to `rel` inside the project.
    pub fn with_dest_file(self, rel: &str, content: &str) -> Self {
        write(&self.ctx.dest.join(rel), content);
        self
    }

    /// Replace the built-in registry with a `components.toml` in the template.
    pub fn with_registry(self, toml: &str) -> Self {
        write(&self.ctx.source.join("components.toml"), toml);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> InstallTestContext {
        self.ctx
    }
}
