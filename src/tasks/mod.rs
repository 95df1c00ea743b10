//! The ordered step plan and the loop that executes it.
mod context;
pub mod pipeline;

pub use context::Context;
pub use pipeline::{Pipeline, RunReport, RunState};

use std::fmt;

use anyhow::Result;

use crate::config::manifest::{Manifest, Variable};
use crate::error::{ResetError, StepFailure};
use crate::exec::{CommandFailed, Invocation};
use crate::logging::StepStatus;
use crate::resources::platform::PlatformResource;
use crate::resources::plugin::PluginResource;
use crate::resources::{Action, Applicable, ResourceChange};

/// Non-terminal stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Reading settings and the manifest.
    Loading,
    /// Checking the tool and writing the recovery snapshot.
    SnapshotSaving,
    /// Removing every platform.
    RemovingPlatforms,
    /// Removing every plugin.
    RemovingPlugins,
    /// Adding every platform.
    AddingPlatforms,
    /// Adding every plugin.
    AddingPlugins,
    /// Deleting the recovery snapshot.
    SnapshotCleaning,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Self; 7] = [
        Self::Loading,
        Self::SnapshotSaving,
        Self::RemovingPlatforms,
        Self::RemovingPlugins,
        Self::AddingPlatforms,
        Self::AddingPlugins,
        Self::SnapshotCleaning,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::SnapshotSaving => "saving snapshot",
            Self::RemovingPlatforms => "removing platforms",
            Self::RemovingPlugins => "removing plugins",
            Self::AddingPlatforms => "adding platforms",
            Self::AddingPlugins => "adding plugins",
            Self::SnapshotCleaning => "cleaning snapshot",
        })
    }
}

/// One tool invocation in the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `<tool> platform remove <name>`
    RemovePlatform(String),
    /// `<tool> plugin remove <name>`
    RemovePlugin(String),
    /// `<tool> platform add <name>`
    AddPlatform(String),
    /// `<tool> plugin add <name> --variable K=V ...`
    AddPlugin {
        /// Plugin identifier.
        name: String,
        /// Variables in declared order.
        variables: Vec<Variable>,
    },
}

/// Result of executing one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The tool reported success.
    Succeeded,
    /// The step did not succeed but the run continues.
    SucceededWithWarning(String),
    /// The step failed and the run stops.
    Failed(String),
}

impl Step {
    /// Stage this step belongs to.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::RemovePlatform(_) => Stage::RemovingPlatforms,
            Self::RemovePlugin(_) => Stage::RemovingPlugins,
            Self::AddPlatform(_) => Stage::AddingPlatforms,
            Self::AddPlugin { .. } => Stage::AddingPlugins,
        }
    }

    /// Whether the step adds or removes.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::RemovePlatform(_) | Self::RemovePlugin(_) => Action::Remove,
            Self::AddPlatform(_) | Self::AddPlugin { .. } => Action::Add,
        }
    }

    /// `platform` or `plugin`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RemovePlatform(_) | Self::AddPlatform(_) => "platform",
            Self::RemovePlugin(_) | Self::AddPlugin { .. } => "plugin",
        }
    }

    /// Platform or plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::RemovePlatform(name)
            | Self::RemovePlugin(name)
            | Self::AddPlatform(name)
            | Self::AddPlugin { name, .. } => name,
        }
    }

    /// Short description, e.g. `remove platform android`.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} {} {}", self.action().verb(), self.kind(), self.name())
    }

    /// The command this step runs.
    #[must_use]
    pub fn invocation(&self, ctx: &Context) -> Invocation {
        self.resource(ctx).invocation(self.action())
    }

    fn resource<'a>(&'a self, ctx: &'a Context) -> Box<dyn Applicable + 'a> {
        let executor = ctx.executor.as_ref();
        match self {
            Self::RemovePlatform(name) | Self::AddPlatform(name) => {
                Box::new(PlatformResource::new(name.clone(), ctx.tool(), executor))
            }
            Self::RemovePlugin(name) => Box::new(PluginResource::new(
                name.clone(),
                &[],
                ctx.tool(),
                ctx.config.not_installed_exit_code,
                executor,
            )),
            Self::AddPlugin { name, variables } => Box::new(PluginResource::new(
                name.clone(),
                variables,
                ctx.tool(),
                ctx.config.not_installed_exit_code,
                executor,
            )),
        }
    }

    /// Wrap a failure reason into the error that aborts the run.
    #[must_use]
    pub fn failure(&self, reason: String) -> ResetError {
        let failure = StepFailure {
            stage: self.stage(),
            step: self.description(),
            reason,
        };
        match self.action() {
            Action::Remove => ResetError::Removal(failure),
            Action::Add => ResetError::Addition(failure),
        }
    }
}

/// Build the ordered plan: platform removals, plugin removals, platform
/// adds, plugin adds, each in manifest order.
#[must_use]
pub fn plan(manifest: &Manifest) -> Vec<Step> {
    let remove_platforms = manifest
        .platforms
        .iter()
        .map(|name| Step::RemovePlatform(name.clone()));
    let remove_plugins = manifest
        .plugins
        .iter()
        .map(|plugin| Step::RemovePlugin(plugin.name.clone()));
    let add_platforms = manifest
        .platforms
        .iter()
        .map(|name| Step::AddPlatform(name.clone()));
    let add_plugins = manifest.plugins.iter().map(|plugin| Step::AddPlugin {
        name: plugin.name.clone(),
        variables: plugin.variables.clone(),
    });
    remove_platforms
        .chain(remove_plugins)
        .chain(add_platforms)
        .chain(add_plugins)
        .collect()
}

/// Execute one step, print its single status line, and record it.
pub fn execute_step(step: &Step, ctx: &Context) -> StepOutcome {
    let description = step.description();

    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would run: {}", step.invocation(ctx)));
        ctx.log.record_step(&description, StepStatus::DryRun, None);
        return StepOutcome::Succeeded;
    }

    ctx.log.begin_progress(&format!(
        "{} {} {}",
        step.action().progressive(),
        step.kind(),
        step.name()
    ));
    let result = run_resource(step, ctx);
    ctx.log.end_progress();
    if let Err(e) = &result
        && let Some(failed) = e.downcast_ref::<CommandFailed>()
        && !failed.output.is_empty()
    {
        ctx.log
            .debug(&format!("{} output:\n{}", failed.program, failed.output));
    }

    let outcome = classify(step, result);
    report(step, &outcome, ctx);
    outcome
}

fn run_resource(step: &Step, ctx: &Context) -> Result<ResourceChange> {
    let resource = step.resource(ctx);
    match step.action() {
        Action::Add => resource.apply(),
        Action::Remove => resource.remove(),
    }
}

fn classify(step: &Step, result: Result<ResourceChange>) -> StepOutcome {
    match (step, result) {
        (_, Ok(ResourceChange::Applied | ResourceChange::Removed)) => StepOutcome::Succeeded,
        (_, Ok(ResourceChange::NotPresent { detail })) => {
            StepOutcome::SucceededWithWarning(format!("not installed ({detail})"))
        }
        (Step::RemovePlatform(_), Err(e)) => StepOutcome::SucceededWithWarning(format!("{e:#}")),
        (_, Err(e)) => StepOutcome::Failed(format!("{e:#}")),
    }
}

fn report(step: &Step, outcome: &StepOutcome, ctx: &Context) {
    let (kind, name) = (step.kind(), step.name());
    let description = step.description();
    match outcome {
        StepOutcome::Succeeded => {
            let done = match step.action() {
                Action::Add => "Added",
                Action::Remove => "Removed",
            };
            ctx.log.success(&format!("{done} {kind} {name}"));
            ctx.log.record_step(&description, StepStatus::Ok, None);
        }
        StepOutcome::SucceededWithWarning(reason) => {
            let line = if matches!(step, Step::RemovePlugin(_)) {
                format!("Plugin {name} is not present")
            } else {
                format!("Could not remove {kind} {name}: {reason}")
            };
            ctx.log.warn(&line);
            ctx.log
                .record_step(&description, StepStatus::Warning, Some(reason));
        }
        StepOutcome::Failed(reason) => {
            ctx.log
                .error(&format!("Failed to {description}: {reason}"));
            ctx.log
                .record_step(&description, StepStatus::Failed, Some(reason));
        }
    }
}

/// Totals for a completed plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTally {
    /// Steps executed.
    pub executed: usize,
    /// Steps that ended with a warning.
    pub warnings: usize,
}

/// Run `steps` in order, stopping at the first fatal outcome.
///
/// `on_step` is called with each step before it runs.
///
/// # Errors
///
/// Returns [`ResetError::Removal`] or [`ResetError::Addition`] for the first
/// step that fails; later steps are not run.
pub fn run_steps(
    steps: &[Step],
    ctx: &Context,
    mut on_step: impl FnMut(&Step),
) -> Result<StepTally, ResetError> {
    steps.iter().try_fold(StepTally::default(), |mut tally, step| {
        on_step(step);
        match execute_step(step, ctx) {
            StepOutcome::Succeeded => {}
            StepOutcome::SucceededWithWarning(_) => tally.warnings += 1,
            StepOutcome::Failed(reason) => return Err(step.failure(reason)),
        }
        tally.executed += 1;
        Ok(tally)
    })
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::manifest::{self, Manifest};
    use crate::operations::MockFileSystemOps;
    use crate::resources::test_helpers::{MockExecutor, Response};
    use std::path::Path;
    use std::sync::Arc;
    use test_helpers::make_context;

    fn manifest() -> Manifest {
        manifest::parse(
            Path::new("package.json"),
            r#"{"cordova": {
                "platforms": ["ios", "android"],
                "plugins": {
                    "cordova-plugin-camera": {},
                    "cordova-plugin-facebook4": {"APP_ID": "123", "APP_NAME": "Demo App"}
                }
            }}"#,
        )
        .unwrap()
    }

    fn context(exec: &Arc<MockExecutor>, dry_run: bool) -> (Context, Arc<test_helpers::RecordingLog>) {
        make_context(
            Arc::clone(exec) as Arc<dyn crate::exec::Executor>,
            Arc::new(MockFileSystemOps::new()),
            dry_run,
        )
    }

    #[test]
    fn plan_orders_removals_before_adds() {
        let steps = plan(&manifest());
        let described: Vec<String> = steps.iter().map(Step::description).collect();
        assert_eq!(
            described,
            vec![
                "remove platform ios",
                "remove platform android",
                "remove plugin cordova-plugin-camera",
                "remove plugin cordova-plugin-facebook4",
                "add platform ios",
                "add platform android",
                "add plugin cordova-plugin-camera",
                "add plugin cordova-plugin-facebook4",
            ]
        );
    }

    #[test]
    fn plan_for_empty_manifest_is_empty() {
        let empty = manifest::parse(Path::new("m.json"), r#"{"platforms": [], "plugins": {}}"#)
            .unwrap();
        assert!(plan(&empty).is_empty());
    }

    #[test]
    fn stages_are_ordered() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
        assert!(Stage::RemovingPlugins < Stage::AddingPlatforms);
    }

    #[test]
    fn dry_run_renders_every_command() {
        let exec = Arc::new(MockExecutor::default());
        let (ctx, log) = context(&exec, true);
        let tally = run_steps(&plan(&manifest()), &ctx, |_| {}).unwrap();
        assert_eq!(tally.executed, 8);
        assert!(exec.calls().is_empty(), "dry run must not invoke the tool");
        insta::assert_snapshot!(log.console().join("\n"), @r#"
        dry-run would run: cordova platform remove ios
        dry-run would run: cordova platform remove android
        dry-run would run: cordova plugin remove cordova-plugin-camera
        dry-run would run: cordova plugin remove cordova-plugin-facebook4
        dry-run would run: cordova platform add ios
        dry-run would run: cordova platform add android
        dry-run would run: cordova plugin add cordova-plugin-camera
        dry-run would run: cordova plugin add cordova-plugin-facebook4 --variable APP_ID="123" --variable APP_NAME="Demo App"
        "#);
    }

    #[test]
    fn successful_steps_print_one_line_each() {
        let exec = Arc::new(MockExecutor::default());
        let (ctx, log) = context(&exec, false);
        let tally = run_steps(&plan(&manifest()), &ctx, |_| {}).unwrap();
        assert_eq!(tally, StepTally { executed: 8, warnings: 0 });
        insta::assert_snapshot!(log.console().join("\n"), @r"
        ok Removed platform ios
        ok Removed platform android
        ok Removed plugin cordova-plugin-camera
        ok Removed plugin cordova-plugin-facebook4
        ok Added platform ios
        ok Added platform android
        ok Added plugin cordova-plugin-camera
        ok Added plugin cordova-plugin-facebook4
        ");
    }

    #[test]
    fn platform_removal_failure_is_a_warning() {
        let exec = Arc::new(MockExecutor::with_responses(vec![Response::exit(
            1,
            "Platform ios not installed",
        )]));
        let (ctx, log) = context(&exec, false);
        let tally = run_steps(&plan(&manifest()), &ctx, |_| {}).unwrap();
        assert_eq!(tally, StepTally { executed: 8, warnings: 1 });
        let console = log.console();
        assert_eq!(console.len(), 8);
        assert!(console[0].starts_with("warn Could not remove platform ios"), "got {console:?}");
        assert_eq!(log.steps()[0].1, StepStatus::Warning);
    }

    #[test]
    fn platform_spawn_error_is_a_warning() {
        let exec = Arc::new(MockExecutor::with_responses(vec![Response::SpawnError(
            "boom".into(),
        )]));
        let (ctx, _log) = context(&exec, false);
        let outcome = execute_step(&Step::RemovePlatform("ios".into()), &ctx);
        assert!(matches!(outcome, StepOutcome::SucceededWithWarning(_)));
    }

    #[test]
    fn plugin_not_installed_is_a_warning() {
        let exec = Arc::new(MockExecutor::with_responses(vec![
            Response::ok(),
            Response::ok(),
            Response::exit(1, "Plugin not installed"),
        ]));
        let (ctx, log) = context(&exec, false);
        let tally = run_steps(&plan(&manifest()), &ctx, |_| {}).unwrap();
        assert_eq!(tally.warnings, 1);
        assert_eq!(log.console()[2], "warn Plugin cordova-plugin-camera is not present");
        assert_eq!(exec.calls().len(), 8);
    }

    #[test]
    fn plugin_removal_other_failure_aborts() {
        let exec = Arc::new(MockExecutor::with_responses(vec![
            Response::ok(),
            Response::ok(),
            Response::exit(2, "locked"),
        ]));
        let (ctx, log) = context(&exec, false);
        let err = run_steps(&plan(&manifest()), &ctx, |_| {}).unwrap_err();
        assert!(matches!(err, ResetError::Removal(_)));
        assert_eq!(err.stage(), Stage::RemovingPlugins);
        assert_eq!(exec.calls().len(), 3, "no step may run after a fatal failure");
        assert!(log.console()[2].starts_with("error Failed to remove plugin cordova-plugin-camera"));
    }

    #[test]
    fn add_failure_aborts_remaining_steps() {
        let mut responses = vec![Response::ok(); 4];
        responses.push(Response::exit(1, "Unknown platform"));
        let exec = Arc::new(MockExecutor::with_responses(responses));
        let (ctx, log) = context(&exec, false);
        let err = run_steps(&plan(&manifest()), &ctx, |_| {}).unwrap_err();
        assert!(matches!(err, ResetError::Addition(_)));
        assert_eq!(err.stage(), Stage::AddingPlatforms);
        assert_eq!(exec.calls().len(), 5);
        assert_eq!(log.console().len(), 5);
        assert!(err.to_string().starts_with("failed to add platform ios"), "got {err}");
    }

    #[test]
    fn multiline_tool_output_stays_on_one_status_line() {
        let output = "Using cordova-fetch for cordova-android\n\
                      Error: Platform android already added.\n\
                      at /usr/lib/node_modules/cordova/bin/cordova:43";
        let exec = Arc::new(MockExecutor::with_responses(vec![
            Response::exit(1, output),
            Response::exit(2, output),
        ]));
        let (ctx, log) = context(&exec, false);

        execute_step(&Step::RemovePlatform("android".into()), &ctx);
        let outcome = execute_step(&Step::AddPlatform("android".into()), &ctx);
        assert!(matches!(outcome, StepOutcome::Failed(_)));

        let console = log.console();
        assert_eq!(
            console,
            vec![
                "warn Could not remove platform android: cordova failed \
                 (exit 1: Error: Platform android already added.)",
                "error Failed to add platform android: cordova failed \
                 (exit 2: Error: Platform android already added.)",
            ]
        );
        let debug: Vec<String> = log
            .lines()
            .into_iter()
            .filter(|l| l.starts_with("debug cordova output:"))
            .collect();
        assert_eq!(debug.len(), 2);
        assert!(debug[0].contains("bin/cordova:43"), "got {debug:?}");
    }

    #[test]
    fn plugin_add_passes_variables_in_order() {
        let exec = Arc::new(MockExecutor::default());
        let (ctx, _log) = context(&exec, false);
        let steps = plan(&manifest());
        run_steps(&steps, &ctx, |_| {}).unwrap();
        assert_eq!(
            exec.calls()[7],
            "cordova plugin add cordova-plugin-facebook4 --variable APP_ID=123 --variable APP_NAME=Demo App"
        );
    }

    #[test]
    fn on_step_sees_every_step_until_failure() {
        let exec = Arc::new(MockExecutor::with_responses(vec![
            Response::ok(),
            Response::ok(),
            Response::ok(),
            Response::ok(),
            Response::ok(),
            Response::ok(),
            Response::exit(1, "registry down"),
        ]));
        let (ctx, _log) = context(&exec, false);
        let mut seen = Vec::new();
        let result = run_steps(&plan(&manifest()), &ctx, |step| seen.push(step.stage()));
        assert!(result.is_err());
        assert_eq!(seen.len(), 7);
        assert_eq!(seen.last(), Some(&Stage::AddingPlugins));
    }
}
