//! Platform and plugin resources managed through the build tool.
pub mod platform;
pub mod plugin;

use anyhow::Result;

use crate::exec::Invocation;

/// Direction of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `<tool> <kind> add <name>`
    Add,
    /// `<tool> <kind> remove <name>`
    Remove,
}

impl Action {
    /// Tool sub-command word.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    /// Present participle used in progress messages.
    #[must_use]
    pub const fn progressive(self) -> &'static str {
        match self {
            Self::Add => "Adding",
            Self::Remove => "Removing",
        }
    }
}

/// Result of a successful add or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The resource was added.
    Applied,
    /// The resource was removed.
    Removed,
    /// Removal was requested but the tool reported the resource absent.
    NotPresent {
        /// Detail reported by the tool.
        detail: String,
    },
}

/// A resource the build tool can add and remove.
pub trait Applicable {
    /// Human-readable description, e.g. `platform android`.
    fn description(&self) -> String;

    /// The exact command for `action`.
    fn invocation(&self, action: Action) -> Invocation;

    /// Add the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or exits non-zero.
    fn apply(&self) -> Result<ResourceChange>;

    /// Remove the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or reports a failure
    /// the resource does not recognise as "already absent".
    fn remove(&self) -> Result<ResourceChange>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_words() {
        assert_eq!(Action::Add.verb(), "add");
        assert_eq!(Action::Remove.verb(), "remove");
        assert_eq!(Action::Add.progressive(), "Adding");
        assert_eq!(Action::Remove.progressive(), "Removing");
    }
}
