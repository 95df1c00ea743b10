//! The run state machine: load, snapshot, remove, add, clean up.
use std::fmt;

use super::{Context, Stage, StepTally, plan, run_steps};
use crate::config::{manifest, snapshot};
use crate::error::ResetError;

/// Header printed before any status line.
pub const HEADER: &str = "Reset Cordova Platforms & Plugins";

/// Where a run currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet.
    Idle,
    /// Working through `Stage`.
    Running(Stage),
    /// Every stage finished (cleanup may have warned).
    Done,
    /// A fatal error stopped the run.
    Failed {
        /// Stage that failed.
        stage: Stage,
        /// Error description.
        reason: String,
    },
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Running(stage) => write!(f, "{stage}"),
            Self::Done => f.write_str("done"),
            Self::Failed { stage, reason } => write!(f, "failed while {stage}: {reason}"),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Steps executed (or previewed in a dry run).
    pub steps: usize,
    /// Steps that ended with a warning.
    pub warnings: usize,
    /// Why the recovery snapshot could not be deleted, if it could not.
    pub cleanup_warning: Option<String>,
}

/// Drives a single reset run and records every state it passes through.
#[derive(Debug)]
pub struct Pipeline<'a> {
    ctx: &'a Context,
    state: RunState,
    transitions: Vec<RunState>,
}

impl<'a> Pipeline<'a> {
    /// Create an idle pipeline.
    #[must_use]
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            state: RunState::Idle,
            transitions: vec![RunState::Idle],
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Every state entered so far, starting with [`RunState::Idle`].
    #[must_use]
    pub fn transitions(&self) -> &[RunState] {
        &self.transitions
    }

    fn set(&mut self, state: RunState) {
        self.ctx.log.debug(&format!("state: {state}"));
        self.transitions.push(state.clone());
        self.state = state;
    }

    /// Move forward to `target`, entering every stage in between.
    fn enter(&mut self, target: Stage) {
        let current = match self.state {
            RunState::Running(stage) => Some(stage),
            _ => None,
        };
        for stage in Stage::ALL {
            if current.is_none_or(|c| stage > c) && stage <= target {
                self.set(RunState::Running(stage));
            }
        }
    }

    /// Run every stage.
    ///
    /// A failed cleanup is logged as a warning and does not fail the run.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`ResetError`]; the pipeline is then in
    /// [`RunState::Failed`] and the snapshot, if written, is left on disk.
    pub fn run(&mut self) -> Result<RunReport, ResetError> {
        match self.run_stages() {
            Ok(report) => {
                self.set(RunState::Done);
                Ok(report)
            }
            Err(err) => {
                self.set(RunState::Failed {
                    stage: err.stage(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn run_stages(&mut self) -> Result<RunReport, ResetError> {
        let ctx = self.ctx;
        let config = &ctx.config;
        ctx.log.header(HEADER);

        self.enter(Stage::Loading);
        let manifest = manifest::load(&config.manifest_path, ctx.fs_ops.as_ref())?;
        ctx.log.debug(&format!(
            "loaded {}: {} platform(s), {} plugin(s)",
            config.manifest_path.display(),
            manifest.platforms.len(),
            manifest.plugins.len()
        ));

        self.enter(Stage::SnapshotSaving);
        if ctx.dry_run {
            ctx.log.debug(&format!(
                "dry run: not writing {}",
                config.snapshot_path.display()
            ));
        } else {
            if !ctx.executor.which(&config.tool) {
                return Err(ResetError::ToolNotFound(config.tool.clone()));
            }
            snapshot::write(&manifest, &config.snapshot_path, ctx.fs_ops.as_ref())
                .map_err(ResetError::Write)?;
            ctx.log
                .debug(&format!("saved {}", config.snapshot_path.display()));
        }

        let steps = plan(&manifest);
        let StepTally { executed, warnings } =
            run_steps(&steps, ctx, |step| self.enter(step.stage()))?;

        self.enter(Stage::SnapshotCleaning);
        let cleanup_warning = if ctx.dry_run {
            None
        } else {
            match snapshot::clean(&config.snapshot_path, ctx.fs_ops.as_ref()) {
                Ok(()) => {
                    ctx.log
                        .debug(&format!("deleted {}", config.snapshot_path.display()));
                    None
                }
                Err(source) => {
                    let err = ResetError::Cleanup(source);
                    ctx.log.warn(&format!("{err:#}"));
                    Some(err.to_string())
                }
            }
        };

        Ok(RunReport {
            steps: executed,
            warnings,
            cleanup_warning,
        })
    }
}
