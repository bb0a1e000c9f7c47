//! Core logging types: component entries, status, and the [`Log`] trait.

/// Component install result for summary reporting.
#[derive(Debug, Clone)]
pub struct ComponentEntry {
    /// Component name as registered.
    pub name: String,
    /// Final status of the component.
    pub status: ComponentStatus,
    /// Optional detail message (e.g., skip reason or entry counts).
    pub message: Option<String>,
}

/// Status of a processed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    /// Every source path was merged without entry failures.
    Ok,
    /// Nothing was merged because none of the component's sources exist.
    Skipped,
    /// Dry run; no changes were applied.
    DryRun,
    /// At least one entry could not be written.
    Failed,
}

/// Abstraction over logging backends.
///
/// The merge engine and installer only talk to this trait, so tests can swap
/// in a capturing implementation.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a component result for the summary.
    fn record_component(&self, name: &str, status: ComponentStatus, message: Option<&str>);
}
