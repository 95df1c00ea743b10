//! Core logging types: step entries, status, and the [`Log`] trait.

/// Step result for summary reporting.
#[derive(Debug, Clone)]
pub struct StepEntry {
    /// Human-readable step name, e.g. `remove platform android`.
    pub name: String,
    /// Final status of the step.
    pub status: StepStatus,
    /// Optional detail message (warning reason or error description).
    pub message: Option<String>,
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully.
    Ok,
    /// Step completed but the tool reported something worth a warning.
    Warning,
    /// Step ran in dry-run mode; nothing was invoked.
    DryRun,
    /// Step failed and the run stopped.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`; tests
/// substitute recording implementations to assert on exact console lines.
pub trait Log: Send + Sync {
    /// Log the run header.
    fn header(&self, msg: &str);
    /// Log a step that succeeded.
    fn success(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>);
    /// Show a spinner with `msg` until [`end_progress`](Self::end_progress).
    fn begin_progress(&self, _msg: &str) {}
    /// Remove the spinner, if any.
    fn end_progress(&self) {}
}
