//! Domain-specific error types for the framework installer.
//!
//! Internal modules return typed errors built with [`thiserror`]; the command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! InstallError
//! ├── Cancelled                operator answered "quit"
//! ├── SameRoot                 source and destination are one directory
//! └── Config(ConfigError)      components.toml loading and validation
//!
//! MergeError
//! ├── Aborted                  propagated up to the installer
//! └── Io { path, source }      recorded per entry, never aborts the run
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Message shown when the operator cancels the run.
pub const CANCELLED_MESSAGE: &str = "Operation cancelled by user.";

/// Errors that end an install run.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The operator chose to quit at a conflict prompt.
    #[error("Operation cancelled by user.")]
    Cancelled,

    /// Source and destination roots resolve to the same directory.
    #[error("source and destination are the same directory: {0}")]
    SameRoot(PathBuf),

    /// The component registry could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that arise from loading or validating `components.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the registry file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The registry file is not valid TOML or does not match the schema.
    #[error("Invalid TOML in {file}: {message}")]
    Parse {
        /// File that failed to parse.
        file: String,
        /// Parser message.
        message: String,
    },

    /// Two components share a name.
    #[error("Duplicate component '{0}'")]
    DuplicateComponent(String),

    /// A component uses the keyword that selects every component.
    #[error("Component name '{0}' is reserved")]
    ReservedName(String),

    /// A component declares no paths.
    #[error("Component '{0}' has no paths")]
    EmptyComponent(String),

    /// A component path is absolute or escapes the root.
    #[error("Invalid path '{path}' in component '{component}': {reason}")]
    InvalidPath {
        /// Component that declares the path.
        component: String,
        /// Offending path as written.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },
}

/// Errors raised while merging a source path into a destination path.
#[derive(Error, Debug)]
pub enum MergeError {
    /// The operator chose to quit; stops every remaining entry.
    #[error("Operation cancelled by user.")]
    Aborted,

    /// A filesystem operation failed for a single entry.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl MergeError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn cancelled_display() {
        assert_eq!(
            InstallError::Cancelled.to_string(),
            "Operation cancelled by user."
        );
    }

    #[test]
    fn same_root_display() {
        let e = InstallError::SameRoot(PathBuf::from("/work/project"));
        assert!(e.to_string().contains("/work/project"));
    }

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: "/tmpl/components.toml".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("/tmpl/components.toml"));
        assert!(e.to_string().contains("IO error reading config file"));
    }

    #[test]
    fn config_error_invalid_path_display() {
        let e = ConfigError::InvalidPath {
            component: "docs".to_string(),
            path: "../outside".to_string(),
            reason: "must not contain '..'".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid path '../outside' in component 'docs': must not contain '..'"
        );
    }

    #[test]
    fn install_error_from_config_error() {
        let e: InstallError = ConfigError::DuplicateComponent("hooks".to_string()).into();
        assert!(e.to_string().contains("Configuration error"));
        assert!(e.to_string().contains("hooks"));
    }

    #[test]
    fn merge_io_error_names_path() {
        let e = MergeError::io(
            "/dest/.claude/hooks/foo.py",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(e.to_string().starts_with("/dest/.claude/hooks/foo.py"));
        assert!(e.to_string().contains("permission denied"));
    }

    #[test]
    fn merge_io_error_has_source() {
        use std::error::Error as StdError;
        let e = MergeError::io("/x", io::Error::other("boom"));
        assert!(e.source().is_some());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<InstallError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<MergeError>();
    }

    #[test]
    fn install_error_converts_to_anyhow() {
        let _anyhow_err: anyhow::Error = InstallError::Cancelled.into();
    }
}
