//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{component_span, init_subscriber};
pub use types::{ComponentEntry, ComponentStatus, Log};
pub use utils::terminal_columns;

/// Create a Logger backed by an isolated per-thread tracing subscriber
/// with a [`subscriber::FileLayer`] writing into a temporary directory, so
/// that tracing events emitted by logger methods reach a log file during tests.
/// Component spans are tagged as in the real subscriber.
///
/// The returned [`tracing::dispatcher::DefaultGuard`] must be kept alive for
/// the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = subscriber::FileLayer::at(&path).expect("failed to create file layer");
    let log = Logger::with_log_file(Some(path));
    let subscriber = tracing_subscriber::registry()
        .with(subscriber::ComponentScope)
        .with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// In-memory [`Log`] that captures every message for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryLog {
    lines: std::sync::Mutex<Vec<String>>,
    components: std::sync::Mutex<Vec<ComponentEntry>>,
}

#[cfg(test)]
impl MemoryLog {
    fn push(&self, tag: &str, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{tag}: {msg}"));
        }
    }

    /// All captured lines, each prefixed with its level tag.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Captured lines with the given tag (`warn`, `info`, ...).
    pub(crate) fn tagged(&self, tag: &str) -> Vec<String> {
        let prefix = format!("{tag}: ");
        self.lines()
            .into_iter()
            .filter_map(|l| l.strip_prefix(&prefix).map(String::from))
            .collect()
    }

    /// Recorded component results.
    pub(crate) fn components(&self) -> Vec<ComponentEntry> {
        self.components.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[cfg(test)]
impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record_component(&self, name: &str, status: ComponentStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.components.lock() {
            guard.push(ComponentEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
