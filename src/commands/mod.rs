pub mod completions;
pub mod install;
pub mod list;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;

/// Environment variable naming the framework template root.
pub const ROOT_ENV: &str = "FRAMEWORK_ROOT";

/// Directory whose presence marks a framework template root.
const ROOT_MARKER: &str = ".claude";

/// Resolve the framework template root from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if the root cannot be determined or is not a directory.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    resolve_root_from(
        global.root.as_deref(),
        std::env::var_os(ROOT_ENV),
        std::env::current_exe().ok(),
    )
}

/// Resolve the root from an explicit path, then the environment value, then
/// the executable location (the directory holding the binary or, for
/// `target/<profile>/` builds, one of its ancestors).
fn resolve_root_from(
    explicit: Option<&Path>,
    env: Option<OsString>,
    exe: Option<PathBuf>,
) -> Result<PathBuf> {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from));

    if let Some(root) = candidate {
        if !root.is_dir() {
            anyhow::bail!("framework root {} is not a directory", root.display());
        }
        return dunce::canonicalize(&root)
            .with_context(|| format!("cannot resolve framework root {}", root.display()));
    }

    if let Some(exe) = exe
        && let Some(parent) = exe.parent()
        && let Some(found) = parent
            .ancestors()
            .find(|dir| dir.join(ROOT_MARKER).is_dir())
    {
        return Ok(found.to_path_buf());
    }

    anyhow::bail!("cannot determine framework root. Use --root or set {ROOT_ENV}");
}

/// Resolve the destination project root: `--dest` or the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_dest(global: &GlobalOpts) -> Result<PathBuf> {
    match &global.dest {
        Some(dest) => Ok(dest.clone()),
        None => std::env::current_dir().context("cannot read current directory"),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins_over_environment() {
        let explicit = tempfile::tempdir().unwrap();
        let env = tempfile::tempdir().unwrap();
        let root = resolve_root_from(
            Some(explicit.path()),
            Some(env.path().as_os_str().to_owned()),
            None,
        )
        .unwrap();
        assert_eq!(root, dunce::canonicalize(explicit.path()).unwrap());
    }

    #[test]
    fn environment_root_is_used_without_flag() {
        let env = tempfile::tempdir().unwrap();
        let root = resolve_root_from(None, Some(env.path().as_os_str().to_owned()), None).unwrap();
        assert_eq!(root, dunce::canonicalize(env.path()).unwrap());
    }

    #[test]
    fn missing_explicit_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_root_from(Some(&dir.path().join("nope")), None, None).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn root_detected_from_executable_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        let exe = dir.path().join("target/release/framework-install");
        let root = resolve_root_from(None, None, Some(exe)).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let err = resolve_root_from(None, Some(OsString::new()), None).unwrap_err();
        assert!(err.to_string().contains(ROOT_ENV));
    }

    #[test]
    fn dest_defaults_to_current_directory() {
        let dest = resolve_dest(&GlobalOpts::default()).unwrap();
        assert_eq!(dest, std::env::current_dir().unwrap());
    }

    #[test]
    fn dest_uses_flag() {
        let global = GlobalOpts {
            dest: Some(PathBuf::from("/some/project")),
            ..GlobalOpts::default()
        };
        assert_eq!(resolve_dest(&global).unwrap(), PathBuf::from("/some/project"));
    }
}
