//! File comparison: identical-content detection and unified diffs.
use std::ffi::OsStr;
use std::path::Path;

use crate::exec;

/// Body used when the diff program cannot be run.
pub const DIFF_UNAVAILABLE: &str = "Cannot generate diff. Is 'diff' installed?";

/// Outcome of comparing a destination file with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Whether the two files have the same content.
    pub identical: bool,
    /// Unified diff (or a diagnostic placeholder) when the files differ.
    pub body: Option<String>,
}

impl DiffResult {
    /// The files are identical.
    #[must_use]
    pub const fn identical() -> Self {
        Self {
            identical: true,
            body: None,
        }
    }

    /// The files differ; `body` describes how.
    #[must_use]
    pub fn different(body: impl Into<String>) -> Self {
        Self {
            identical: false,
            body: Some(body.into()),
        }
    }

    /// The diff could not be produced; treat the files as different.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::different(DIFF_UNAVAILABLE)
    }

    /// Diff text for display, empty when identical.
    #[must_use]
    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Compares two existing regular files.
///
/// Implementations never fail: anything that prevents a real comparison
/// degrades to "different".
#[cfg_attr(test, mockall::automock)]
pub trait Comparator {
    /// Compare `dest` against `src`.
    fn compare(&self, dest: &Path, src: &Path) -> DiffResult;
}

/// [`Comparator`] backed by an external `diff -u`.
#[derive(Debug, Clone)]
pub struct DiffTool {
    program: String,
}

impl Default for DiffTool {
    fn default() -> Self {
        Self::new("diff")
    }
}

impl DiffTool {
    /// Use `program` as the diff executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Name of the diff executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the diff executable can be found on `PATH`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        exec::which(&self.program)
    }
}

impl Comparator for DiffTool {
    fn compare(&self, dest: &Path, src: &Path) -> DiffResult {
        if same_bytes(dest, src) {
            return DiffResult::identical();
        }

        let args = [OsStr::new("-u"), dest.as_os_str(), src.as_os_str()];
        let Ok(result) = exec::run_unchecked(&self.program, &args) else {
            return DiffResult::unavailable();
        };

        if !result.stdout.is_empty() {
            DiffResult::different(result.stdout)
        } else if result.code == Some(0) {
            DiffResult::identical()
        } else {
            DiffResult::different(format!(
                "{} exited with {}: {}",
                self.program,
                result
                    .code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                result.stderr.trim()
            ))
        }
    }
}

/// Whether both files can be read and hold the same bytes.
fn same_bytes(a: &Path, b: &Path) -> bool {
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(ma), Ok(mb)) if ma.len() == mb.len() => {}
        _ => return false,
    }
    matches!(
        (std::fs::read(a), std::fs::read(b)),
        (Ok(x), Ok(y)) if x == y
    )
}
