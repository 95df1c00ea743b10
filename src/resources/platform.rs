//! Native platform resource (`<tool> platform add|remove <name>`).
use anyhow::Result;

use super::{Action, Applicable, ResourceChange};
use crate::exec::{Executor, Invocation};

/// A platform that the build tool can add and remove.
#[derive(Debug)]
pub struct PlatformResource<'a> {
    /// Platform name, e.g. `android`.
    pub name: String,
    tool: &'a str,
    executor: &'a dyn Executor,
}

impl<'a> PlatformResource<'a> {
    /// Create a new platform resource.
    #[must_use]
    pub const fn new(name: String, tool: &'a str, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            tool,
            executor,
        }
    }

    fn execute(&self, action: Action) -> Result<()> {
        let invocation = self.invocation(action);
        self.executor
            .run(&invocation.program, &invocation.arg_refs())?;
        Ok(())
    }
}

impl Applicable for PlatformResource<'_> {
    fn description(&self) -> String {
        format!("platform {}", self.name)
    }

    fn invocation(&self, action: Action) -> Invocation {
        Invocation::new(
            self.tool,
            vec![
                "platform".to_string(),
                action.verb().to_string(),
                self.name.clone(),
            ],
        )
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.execute(Action::Add)?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        self.execute(Action::Remove)?;
        Ok(ResourceChange::Removed)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::{MockExecutor, Response};

    #[test]
    fn description_names_platform() {
        let exec = MockExecutor::default();
        let r = PlatformResource::new("android".into(), "cordova", &exec);
        assert_eq!(r.description(), "platform android");
    }

    #[test]
    fn invocation_for_each_action() {
        let exec = MockExecutor::default();
        let r = PlatformResource::new("ios".into(), "cordova", &exec);
        assert_eq!(r.invocation(Action::Add).to_string(), "cordova platform add ios");
        assert_eq!(
            r.invocation(Action::Remove).to_string(),
            "cordova platform remove ios"
        );
    }

    #[test]
    fn apply_runs_add() {
        let exec = MockExecutor::default();
        let r = PlatformResource::new("android".into(), "cordova", &exec);
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(exec.calls(), vec!["cordova platform add android"]);
    }

    #[test]
    fn remove_runs_remove() {
        let exec = MockExecutor::default();
        let r = PlatformResource::new("android".into(), "cordova", &exec);
        assert_eq!(r.remove().unwrap(), ResourceChange::Removed);
        assert_eq!(exec.calls(), vec!["cordova platform remove android"]);
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let exec = MockExecutor::with_responses(vec![Response::exit(1, "Platform not installed")]);
        let r = PlatformResource::new("android".into(), "cordova", &exec);
        let err = r.remove().unwrap_err();
        assert!(err.to_string().contains("Platform not installed"), "got: {err}");
    }

    #[test]
    fn spawn_error_is_an_error() {
        let exec = MockExecutor::with_responses(vec![Response::SpawnError("no cordova".into())]);
        let r = PlatformResource::new("android".into(), "cordova", &exec);
        assert!(r.apply().is_err());
    }
}
