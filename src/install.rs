//! Install driver: resolves component names and merges each source path.
use std::path::{Component as PathComponent, Path, PathBuf};

use crate::config::{Component, ComponentRegistry};
use crate::error::{InstallError, MergeError};
use crate::logging::{self, ComponentStatus, Log};
use crate::merge::{Comparator, ConflictResolver, MergeFailure, MergeReport, TreeMerger};

/// Outcome of a completed (not cancelled) install run.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Requested names that are not registered.
    pub unknown: Vec<String>,
    /// Source paths that did not exist and were skipped.
    pub missing_sources: Vec<PathBuf>,
    /// Names of components with at least one failed entry.
    pub failed_components: Vec<String>,
    /// Entry counters summed over every merged path.
    pub merged: MergeReport,
}

/// Installs components from a source root into a destination root.
pub struct Installer<'a> {
    registry: &'a ComponentRegistry,
    source_root: PathBuf,
    dest_root: PathBuf,
    comparator: &'a dyn Comparator,
    dry_run: bool,
}

impl std::fmt::Debug for Installer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("source_root", &self.source_root)
            .field("dest_root", &self.dest_root)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl<'a> Installer<'a> {
    /// Create an installer for `registry` between the two roots.
    #[must_use]
    pub fn new(
        registry: &'a ComponentRegistry,
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        comparator: &'a dyn Comparator,
    ) -> Self {
        Self {
            registry,
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            comparator,
            dry_run: false,
        }
    }

    /// Preview instead of writing.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Install the `requested` components.
    ///
    /// Components are processed in selection order and each of their paths
    /// in declaration order, all sharing `resolver` so an "all" answer
    /// carries over to later components.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::SameRoot`] if both roots are one directory,
    /// and [`InstallError::Cancelled`] as soon as the operator quits.
    pub fn install<S: AsRef<str>>(
        &self,
        requested: &[S],
        resolver: &mut ConflictResolver,
        log: &dyn Log,
    ) -> Result<InstallReport, InstallError> {
        self.check_roots()?;

        let selection = self.registry.select(requested);
        for name in &selection.unknown {
            log.warn(&format!("Unknown component '{name}', skipping"));
        }

        let merger = TreeMerger::new(self.comparator, log).dry_run(self.dry_run);
        let mut report = InstallReport {
            unknown: selection.unknown,
            ..InstallReport::default()
        };

        for component in selection.components {
            log.stage(&format!("Installing component: {}", component.name));
            let _scope = logging::component_span(&component.name).entered();
            let merged = self.install_component(component, &merger, resolver, log, &mut report)?;
            self.record(component, merged, &mut report, log);
        }

        Ok(report)
    }

    /// Merge every path of `component`; `None` when no source path exists.
    fn install_component(
        &self,
        component: &Component,
        merger: &TreeMerger<'_>,
        resolver: &mut ConflictResolver,
        log: &dyn Log,
        report: &mut InstallReport,
    ) -> Result<Option<MergeReport>, InstallError> {
        let mut merged: Option<MergeReport> = None;
        for rel in &component.paths {
            let rel = normalize(rel);
            let src = self.source_root.join(&rel);
            let dest = self.dest_root.join(&rel);
            if !src.exists() {
                log.warn(&format!("Source not found: {}, skipping", src.display()));
                report.missing_sources.push(src);
                continue;
            }
            log.debug(&format!("merging {} -> {}", src.display(), dest.display()));
            let path_report = match merger.merge(&src, &dest, resolver) {
                Ok(path_report) => path_report,
                Err(MergeError::Aborted) => return Err(InstallError::Cancelled),
                Err(MergeError::Io { path, source }) => MergeReport {
                    failures: vec![MergeFailure {
                        path,
                        message: source.to_string(),
                    }],
                    ..MergeReport::default()
                },
            };
            merged.get_or_insert_with(MergeReport::default).absorb(path_report);
        }
        Ok(merged)
    }

    fn record(
        &self,
        component: &Component,
        merged: Option<MergeReport>,
        report: &mut InstallReport,
        log: &dyn Log,
    ) {
        let Some(merged) = merged else {
            log.record_component(
                &component.name,
                ComponentStatus::Skipped,
                Some("source not found"),
            );
            return;
        };

        let detail = merged.describe();
        let status = if !merged.is_clean() {
            report.failed_components.push(component.name.clone());
            ComponentStatus::Failed
        } else if self.dry_run {
            ComponentStatus::DryRun
        } else {
            ComponentStatus::Ok
        };
        log.record_component(&component.name, status, Some(&detail));
        report.merged.absorb(merged);
    }

    fn check_roots(&self) -> Result<(), InstallError> {
        if let (Ok(src), Ok(dest)) = (
            dunce::canonicalize(&self.source_root),
            dunce::canonicalize(&self.dest_root),
        ) && src == dest
        {
            return Err(InstallError::SameRoot(src));
        }
        Ok(())
    }
}

/// Drop `.` segments and trailing separators from a registry path.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|part| !matches!(part, PathComponent::CurDir))
        .collect()
}
