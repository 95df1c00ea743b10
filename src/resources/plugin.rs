//! Plugin resource (`<tool> plugin add|remove <name> [--variable K=V]...`).
use anyhow::Result;

use super::{Action, Applicable, ResourceChange};
use crate::config::manifest::Variable;
use crate::exec::{CommandFailed, Executor, Invocation};

/// A plugin that the build tool can add (with variables) and remove.
#[derive(Debug)]
pub struct PluginResource<'a> {
    /// Plugin identifier.
    pub name: String,
    variables: &'a [Variable],
    tool: &'a str,
    not_installed_exit_code: i32,
    executor: &'a dyn Executor,
}

impl<'a> PluginResource<'a> {
    /// Create a new plugin resource.
    ///
    /// `not_installed_exit_code` is the exit status the tool uses when asked
    /// to remove a plugin that is not installed.
    #[must_use]
    pub const fn new(
        name: String,
        variables: &'a [Variable],
        tool: &'a str,
        not_installed_exit_code: i32,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name,
            variables,
            tool,
            not_installed_exit_code,
            executor,
        }
    }
}

/// Expand variables into `--variable KEY=value` argument pairs, in order.
#[must_use]
pub fn variable_args(variables: &[Variable]) -> Vec<String> {
    variables
        .iter()
        .flat_map(|v| ["--variable".to_string(), format!("{}={}", v.key, v.value)])
        .collect()
}

impl Applicable for PluginResource<'_> {
    fn description(&self) -> String {
        format!("plugin {}", self.name)
    }

    fn invocation(&self, action: Action) -> Invocation {
        let mut args = vec![
            "plugin".to_string(),
            action.verb().to_string(),
            self.name.clone(),
        ];
        if action == Action::Add {
            args.extend(variable_args(self.variables));
        }
        Invocation::new(self.tool, args)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let invocation = self.invocation(Action::Add);
        self.executor
            .run(&invocation.program, &invocation.arg_refs())?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        let invocation = self.invocation(Action::Remove);
        let result = self
            .executor
            .run_unchecked(&invocation.program, &invocation.arg_refs())?;
        if result.success {
            return Ok(ResourceChange::Removed);
        }
        if result.code == Some(self.not_installed_exit_code) {
            return Ok(ResourceChange::NotPresent {
                detail: result.failure_detail(),
            });
        }
        Err(CommandFailed::new(&invocation.program, &result).into())
    }
}
