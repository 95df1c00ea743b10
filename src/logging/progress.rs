//! Console spinner shown while the build tool runs.
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "|/-\\ ";
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// A single replaceable spinner line.
///
/// Draws to stderr and stays hidden when stderr is not a terminal, so
/// redirected output only contains status lines.
#[derive(Debug, Default)]
pub(super) struct Spinner {
    bar: Mutex<Option<ProgressBar>>,
}

impl Spinner {
    /// Start (or restart) the spinner with `msg`.
    pub(super) fn start(&self, msg: &str) {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.yellow}  {msg:.yellow}") {
            bar.set_style(style.tick_chars(TICK_CHARS));
        }
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);

        let previous = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(bar);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    /// Clear the spinner line. No-op when no spinner is shown.
    pub(super) fn stop(&self) {
        let current = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(bar) = current {
            bar.finish_and_clear();
        }
    }

    /// Whether a spinner is currently active.
    #[cfg(test)]
    pub(super) fn is_active(&self) -> bool {
        self.bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
