//! Recursive tree merge of a source path into a destination path.
//!
//! Per entry:
//!
//! - destination missing: copy a file, or create the directory and walk
//!   its children the same way;
//! - both directories: merge child by child, leaving destination-only
//!   entries alone;
//! - both files: compare, then ask the [`ConflictResolver`] if they differ;
//! - file vs directory: report the mismatch and leave the entry untouched.
//!
//! Filesystem failures are recorded per entry and the walk carries on with
//! siblings.  Only an operator abort unwinds the walk.  Source symlinks are
//! followed; a link that leads back into a directory already being walked is
//! recorded as a failure instead of being descended.
pub mod compare;
pub mod fs;
pub mod resolve;

use std::path::{Path, PathBuf};

use crate::error::MergeError;
use crate::logging::Log;

pub use compare::{Comparator, DIFF_UNAVAILABLE, DiffResult, DiffTool};
pub use fs::EntryKind;
pub use resolve::{
    Choice, ConflictResolver, Decision, FixedPrompt, Prompt, PromptTranscript,
    ResolutionPolicy, ScriptedPrompt, TerminalPrompt,
};

/// An entry that could not be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFailure {
    /// Path the failing operation touched.
    pub path: PathBuf,
    /// Error description.
    pub message: String,
}

/// Per-entry counters for one or more merges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Missing destinations copied from the source (in dry-run: would be).
    pub installed: usize,
    /// Conflicting files replaced by the source.
    pub overwritten: usize,
    /// Files already identical to the source.
    pub identical: usize,
    /// Conflicting files left as they were.
    pub skipped: usize,
    /// Conflicting files found during a dry run (no decision taken).
    pub pending: usize,
    /// Entries whose kind differs between source and destination.
    pub kind_mismatches: usize,
    /// Entries that failed with a filesystem error.
    pub failures: Vec<MergeFailure>,
}

impl MergeReport {
    /// Add the counters of `other` to this report.
    pub fn absorb(&mut self, other: Self) {
        self.installed += other.installed;
        self.overwritten += other.overwritten;
        self.identical += other.identical;
        self.skipped += other.skipped;
        self.pending += other.pending;
        self.kind_mismatches += other.kind_mismatches;
        self.failures.extend(other.failures);
    }

    /// Whether anything in the destination was (or would be) written.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.installed + self.overwritten > 0
    }

    /// Whether every entry was handled without a filesystem error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line description for the summary, e.g. `2 installed, 1 identical`.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [
            (self.installed, "installed"),
            (self.overwritten, "overwritten"),
            (self.identical, "identical"),
            (self.skipped, "skipped"),
            (self.pending, "conflicting"),
            (self.kind_mismatches, "type conflicts"),
            (self.failures.len(), "failed"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();
        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// The recursive merge engine.
///
/// Holds the collaborators that stay fixed for a run; the mutable
/// [`ConflictResolver`] is passed into every call instead so its policy is
/// visibly shared across all entries and source paths.
pub struct TreeMerger<'a> {
    comparator: &'a dyn Comparator,
    log: &'a dyn Log,
    dry_run: bool,
}

/// Mutable state of one [`TreeMerger::merge`] call.
struct Walk<'r> {
    resolver: &'r mut ConflictResolver,
    report: MergeReport,
    /// Canonical source directories currently being walked, outermost first.
    ancestors: Vec<PathBuf>,
}

impl std::fmt::Debug for TreeMerger<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeMerger")
            .field("comparator", &"<dyn Comparator>")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl<'a> TreeMerger<'a> {
    /// Create a merger that writes to the destination.
    #[must_use]
    pub fn new(comparator: &'a dyn Comparator, log: &'a dyn Log) -> Self {
        Self {
            comparator,
            log,
            dry_run: false,
        }
    }

    /// Report what would change instead of writing.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Merge `src` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Aborted`] if the operator quits at a conflict.
    /// Filesystem errors never escape; they are collected in
    /// [`MergeReport::failures`].
    pub fn merge(
        &self,
        src: &Path,
        dest: &Path,
        resolver: &mut ConflictResolver,
    ) -> Result<MergeReport, MergeError> {
        let mut walk = Walk {
            resolver,
            report: MergeReport::default(),
            ancestors: Vec::new(),
        };
        self.merge_entry(src, dest, &mut walk)?;
        Ok(walk.report)
    }

    fn merge_entry(&self, src: &Path, dest: &Path, walk: &mut Walk<'_>) -> Result<(), MergeError> {
        match self.reconcile(src, dest, walk) {
            Err(MergeError::Io { path, source }) => {
                self.log
                    .error(&format!("could not merge {}: {source}", path.display()));
                walk.report.failures.push(MergeFailure {
                    path,
                    message: source.to_string(),
                });
                Ok(())
            }
            other => other,
        }
    }

    fn reconcile(&self, src: &Path, dest: &Path, walk: &mut Walk<'_>) -> Result<(), MergeError> {
        let Some(src_kind) = fs::entry_kind(src)? else {
            return Err(MergeError::io(
                src,
                std::io::Error::new(std::io::ErrorKind::NotFound, "source vanished"),
            ));
        };

        match (src_kind, fs::entry_kind(dest)?) {
            (EntryKind::Directory, dest_kind @ (None | Some(EntryKind::Directory))) => {
                self.walk_dir(src, dest, dest_kind.is_some(), walk)
            }
            (EntryKind::File, None) => self.install_file(src, dest, &mut walk.report),
            (EntryKind::File, Some(EntryKind::File)) => self.merge_file(src, dest, walk),
            (src_kind, Some(dest_kind)) => {
                self.log.warn(&format!(
                    "type conflict: {} is a {} but {} is a {}; leaving it untouched",
                    src.display(),
                    src_kind.noun(),
                    dest.display(),
                    dest_kind.noun()
                ));
                walk.report.kind_mismatches += 1;
                Ok(())
            }
        }
    }

    /// Merge the children of source directory `src` into `dest`, creating
    /// `dest` first unless it `exists`.
    ///
    /// A missing destination directory goes through the same per-child walk
    /// as an existing one, so a failing child never hides its siblings.
    fn walk_dir(
        &self,
        src: &Path,
        dest: &Path,
        exists: bool,
        walk: &mut Walk<'_>,
    ) -> Result<(), MergeError> {
        let canonical = dunce::canonicalize(src).map_err(|e| MergeError::io(src, e))?;
        if walk.ancestors.contains(&canonical) {
            return Err(MergeError::io(
                src,
                std::io::Error::other(format!("symlink cycle back to {}", canonical.display())),
            ));
        }

        if exists {
            self.log.debug(&format!(
                "directory {} already exists, merging contents",
                dest.display()
            ));
        } else if self.dry_run {
            self.log
                .dry_run(&format!("would create directory {}", dest.display()));
        } else {
            std::fs::create_dir_all(dest).map_err(|e| MergeError::io(dest, e))?;
            self.log.debug(&format!("created directory {}", dest.display()));
        }

        let names = fs::child_names(src)?;
        walk.ancestors.push(canonical);
        let mut result = Ok(());
        for name in names {
            result = self.merge_entry(&src.join(&name), &dest.join(&name), walk);
            if result.is_err() {
                break;
            }
        }
        walk.ancestors.pop();
        result
    }

    fn install_file(
        &self,
        src: &Path,
        dest: &Path,
        report: &mut MergeReport,
    ) -> Result<(), MergeError> {
        if self.dry_run {
            self.log
                .dry_run(&format!("would install file {}", dest.display()));
            report.installed += 1;
            return Ok(());
        }

        fs::ensure_parent_dir(dest)?;
        fs::copy_file(src, dest)?;
        self.log
            .info(&format!("'{}' \x1b[32minstalled\x1b[0m", dest.display()));
        report.installed += 1;
        Ok(())
    }

    fn merge_file(&self, src: &Path, dest: &Path, walk: &mut Walk<'_>) -> Result<(), MergeError> {
        let diff = self.comparator.compare(dest, src);
        if diff.identical {
            self.log
                .info(&format!("'{}' is identical, skipping", dest.display()));
            walk.report.identical += 1;
            return Ok(());
        }

        if self.dry_run {
            self.log
                .dry_run(&format!("would prompt to overwrite {}", dest.display()));
            walk.report.pending += 1;
            return Ok(());
        }

        let decision = walk
            .resolver
            .resolve(dest, &diff)
            .map_err(|e| MergeError::io(dest, e))?;
        match decision {
            Decision::Overwrite => {
                fs::copy_file(src, dest)?;
                self.log
                    .info(&format!("'{}' \x1b[32moverwritten\x1b[0m", dest.display()));
                walk.report.overwritten += 1;
            }
            Decision::Skip => {
                self.log
                    .info(&format!("'{}' \x1b[33mskipped\x1b[0m", dest.display()));
                walk.report.skipped += 1;
            }
            Decision::Abort => return Err(MergeError::Aborted),
        }
        Ok(())
    }
}
