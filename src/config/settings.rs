//! Optional `cordova-reset.toml` settings file.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

/// File name looked up in the project root.
pub const SETTINGS_FILE: &str = "cordova-reset.toml";

/// Values read from [`SETTINGS_FILE`]. Every key is optional.
///
/// ```toml
/// tool = "cordova"
/// manifest = "package.json"
/// snapshot = "temp.json"
/// not_installed_exit_code = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Build tool executable.
    pub tool: Option<String>,
    /// Manifest path, relative to the project root.
    pub manifest: Option<PathBuf>,
    /// Recovery snapshot path, relative to the project root.
    pub snapshot: Option<PathBuf>,
    /// Exit code the tool uses for "plugin not installed".
    pub not_installed_exit_code: Option<i32>,
}

/// Load settings from `path`, returning defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path, fs: &dyn FileSystemOps) -> Result<Settings, ConfigError> {
    if !fs.exists(path) {
        return Ok(Settings::default());
    }

    let content = fs.read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
