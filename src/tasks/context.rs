use std::sync::Arc;

use crate::config::Config;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Shared context for a reset run.
pub struct Context {
    /// Resolved configuration.
    pub config: Config,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Preview the plan without writing the snapshot or invoking the tool.
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .finish()
    }
}

impl Context {
    /// Create a context that runs the tool in the project root and touches
    /// the real filesystem.
    #[must_use]
    pub fn new(config: Config, log: Arc<dyn Log>, dry_run: bool) -> Self {
        let executor = Arc::new(SystemExecutor::in_dir(&config.root));
        Self {
            config,
            log,
            dry_run,
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
        }
    }

    /// Replace the executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the filesystem operations.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Build tool executable.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.config.tool
    }
}
