//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{ComponentEntry, ComponentStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages are emitted as [`tracing`] events; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) renders them on the console
/// and appends them to `$XDG_CACHE_HOME/framework-installer/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    components: Mutex<Vec<ComponentEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only stores the log file path for display in the summary; the file
    /// itself is written by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            components: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded component entries.
    #[must_use]
    pub fn component_entries(&self) -> Vec<ComponentEntry> {
        self.components.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only with `--verbose`).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a component result for the summary.
    pub fn record_component(&self, name: &str, status: ComponentStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.components.lock() {
            guard.push(ComponentEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed components.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.components.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|c| c.status == ComponentStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded components.
    pub fn print_summary(&self) {
        let components = self.component_entries();
        if components.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for component in &components {
            let (icon, color) = match component.status {
                ComponentStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                ComponentStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                ComponentStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                ComponentStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = component
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", component.name));
        }

        println!();
        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} components: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_component(&self, name: &str, status: ComponentStatus, message: Option<&str>) {
        self.record_component(name, status, message);
    }
}
