//! Structured logger with step recording and a console spinner.
use std::path::PathBuf;
use std::sync::Mutex;

use super::progress::Spinner;
use super::subscriber::{DRY_RUN_TARGET, HEADER_TARGET, SUCCESS_TARGET};
use super::types::{Log, StepEntry, StepStatus};
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

/// Structured logger backed by `tracing`.
///
/// All messages are also written to a persistent log file at
/// `$XDG_CACHE_HOME/cordova-reset/<command>.log` by the
/// [`FileLayer`](super::subscriber::FileLayer) that
/// [`init_subscriber`](super::subscriber::init_subscriber) installs.
#[derive(Debug)]
pub struct Logger {
    steps: Mutex<Vec<StepEntry>>,
    log_file: Option<PathBuf>,
    spinner: Spinner,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            log_file,
            spinner: Spinner::default(),
        }
    }

    /// Return a clone of all recorded step entries.
    #[must_use]
    pub fn step_entries(&self) -> Vec<StepEntry> {
        self.steps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log the run header.
    pub fn header(&self, msg: &str) {
        tracing::info!(target: HEADER_TARGET, "{msg}");
    }

    /// Log a successful step.
    pub fn success(&self, msg: &str) {
        tracing::info!(target: SUCCESS_TARGET, "{msg}");
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a step result for the summary.
    pub fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.steps.lock() {
            guard.push(StepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count recorded steps with `status`.
    #[must_use]
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps
            .lock()
            .map_or(0, |guard| guard.iter().filter(|s| s.status == status).count())
    }

    /// Emit the per-step summary at debug level.
    pub fn log_summary(&self) {
        let steps = self.step_entries();
        if steps.is_empty() {
            return;
        }
        for step in &steps {
            let suffix = step
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.debug(&format!("{:?}: {}{suffix}", step.status, step.name));
        }
        self.debug(&format!(
            "{} steps: {} ok, {} warning, {} dry-run, {} failed",
            steps.len(),
            self.count(StepStatus::Ok),
            self.count(StepStatus::Warning),
            self.count(StepStatus::DryRun),
            self.count(StepStatus::Failed),
        ));
        if let Some(path) = &self.log_file {
            self.debug(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(header, success, info, debug, warn, error, dry_run);

    fn record_step(&self, name: &str, status: StepStatus, message: Option<&str>) {
        self.record_step(name, status, message);
    }

    fn begin_progress(&self, msg: &str) {
        self.spinner.start(msg);
    }

    fn end_progress(&self) {
        self.spinner.stop();
    }
}
