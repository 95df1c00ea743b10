//! Command: remove and re-add every platform and plugin.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Config, Overrides};
use crate::error::ResetError;
use crate::logging::{Log, Logger};
use crate::operations::SystemFileSystemOps;
use crate::tasks::{Context, Pipeline, RunReport};

/// Run the reset command.
///
/// # Errors
///
/// Returns an error if the settings file is invalid or the pipeline stops on
/// a fatal failure. A recovery snapshot that could not be deleted is only a
/// warning.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let root = resolve_root(global)?;
    log.debug(&format!("cordova-reset {}", super::version_string()));
    log.debug(&format!("project: {}", root.display()));

    let config = Config::load(&root, &overrides(global), &SystemFileSystemOps)
        .map_err(ResetError::from)?;
    log.debug(&format!("tool: {}", config.tool));

    let ctx = Context::new(config, Arc::clone(log) as Arc<dyn Log>, global.dry_run);
    let report = execute(&ctx);
    log.log_summary();
    let report = report?;

    log.debug(&format!(
        "{} step(s), {} warning(s)",
        report.steps, report.warnings
    ));
    Ok(())
}

/// Run the pipeline for an already-built context.
///
/// # Errors
///
/// Returns the first fatal [`ResetError`].
pub fn execute(ctx: &Context) -> Result<RunReport, ResetError> {
    Pipeline::new(ctx).run()
}

fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        tool: global.tool.clone(),
        manifest: global.manifest.clone(),
        snapshot: global.snapshot.clone(),
    }
}

/// Resolve the project directory from `--root` or the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }
    std::env::current_dir().context("cannot determine the project directory; use --root")
}
