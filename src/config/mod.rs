//! Run configuration: settings file, manifest and recovery snapshot.
pub mod manifest;
pub mod settings;
pub mod snapshot;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

/// Default build tool executable.
pub const DEFAULT_TOOL: &str = "cordova";
/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "package.json";
/// Default recovery snapshot file name.
pub const DEFAULT_SNAPSHOT: &str = "temp.json";
/// Exit code `cordova plugin remove` returns for a plugin that is not installed.
pub const DEFAULT_NOT_INSTALLED_EXIT_CODE: i32 = 1;

/// Values given on the command line; they take precedence over the
/// settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--tool`
    pub tool: Option<String>,
    /// `--manifest`
    pub manifest: Option<PathBuf>,
    /// `--snapshot`
    pub snapshot: Option<PathBuf>,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project directory; the tool runs here.
    pub root: PathBuf,
    /// Manifest path (absolute or joined onto `root`).
    pub manifest_path: PathBuf,
    /// Recovery snapshot path (absolute or joined onto `root`).
    pub snapshot_path: PathBuf,
    /// Build tool executable.
    pub tool: String,
    /// Exit code treated as "plugin not installed" during plugin removal.
    pub not_installed_exit_code: i32,
}

impl Config {
    /// Resolve configuration for the project at `root`.
    ///
    /// Precedence: command-line override, then `cordova-reset.toml`, then the
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is invalid.
    pub fn load(
        root: &Path,
        overrides: &Overrides,
        fs: &dyn FileSystemOps,
    ) -> Result<Self, ConfigError> {
        let file = settings::load(&root.join(settings::SETTINGS_FILE), fs)?;

        let manifest = overrides
            .manifest
            .clone()
            .or(file.manifest)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
        let snapshot = overrides
            .snapshot
            .clone()
            .or(file.snapshot)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));
        let tool = overrides
            .tool
            .clone()
            .or(file.tool)
            .unwrap_or_else(|| DEFAULT_TOOL.to_string());

        Ok(Self {
            root: root.to_path_buf(),
            manifest_path: root.join(manifest),
            snapshot_path: root.join(snapshot),
            tool,
            not_installed_exit_code: file
                .not_installed_exit_code
                .unwrap_or(DEFAULT_NOT_INSTALLED_EXIT_CODE),
        })
    }
}
