//! Thin wrapper around [`std::process::Command`] for external tools.
use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Run a command, allowing a non-zero exit (returns the result without bailing).
///
/// # Errors
///
/// Returns an error only if the process cannot be spawned at all (e.g. the
/// program is not installed).
pub fn run_unchecked<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<ExecResult> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to execute: {program}"))?;

    Ok(ExecResult::from(output))
}

/// Check if a program is available on PATH.
#[must_use]
pub fn which(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_unchecked_captures_stdout() {
        #[cfg(windows)]
        let result = run_unchecked("cmd", &["/C", "echo", "hello"]).unwrap();
        #[cfg(not(windows))]
        let result = run_unchecked("echo", &["hello"]).unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[cfg(not(windows))]
    #[test]
    fn run_unchecked_failure_is_not_an_error() {
        let result = run_unchecked::<&str>("false", &[]).unwrap();
        assert!(!result.success, "non-zero exit should set success=false");
        assert_eq!(result.code, Some(1));
    }

    #[test]
    fn run_unchecked_missing_program_is_an_error() {
        let result = run_unchecked::<&str>("this-program-does-not-exist-12345", &[]);
        assert!(result.is_err(), "spawn failure should produce an error");
    }

    #[test]
    fn which_missing_program() {
        assert!(
            !which("this-program-does-not-exist-12345"),
            "non-existent program should not be found"
        );
    }
}
