//! Domain-specific error types for the reset pipeline.
//!
//! Internal modules return typed errors while the command handler at the CLI
//! boundary converts them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ResetError
//! ├── Config(ConfigError)     cordova-reset.toml unreadable or invalid
//! ├── Load(ManifestError)     manifest missing, unparseable, wrong shape
//! ├── ToolNotFound            build tool not on PATH
//! ├── Write(SnapshotError)    recovery snapshot could not be saved
//! ├── Removal(StepFailure)    fatal plugin removal
//! ├── Addition(StepFailure)   any platform/plugin addition
//! └── Cleanup(SnapshotError)  recovery snapshot could not be deleted
//! ```
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::tasks::Stage;

/// Top-level error type for a reset run.
#[derive(Error, Debug)]
pub enum ResetError {
    /// The settings file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The manifest could not be loaded.
    #[error("Failed to load manifest: {0}")]
    Load(#[from] ManifestError),

    /// The external build tool is not available.
    #[error("Build tool '{0}' not found on PATH")]
    ToolNotFound(String),

    /// The recovery snapshot could not be written.
    #[error("Failed to save recovery snapshot: {0}")]
    Write(#[source] SnapshotError),

    /// A removal failed in a way that aborts the run.
    #[error("{0}")]
    Removal(StepFailure),

    /// An addition failed.
    #[error("{0}")]
    Addition(StepFailure),

    /// The recovery snapshot could not be deleted after a successful run.
    #[error("Failed to remove recovery snapshot: {0}")]
    Cleanup(#[source] SnapshotError),
}

impl ResetError {
    /// Pipeline stage at which this error occurred.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Config(_) | Self::Load(_) => Stage::Loading,
            Self::ToolNotFound(_) | Self::Write(_) => Stage::SnapshotSaving,
            Self::Removal(failure) | Self::Addition(failure) => failure.stage,
            Self::Cleanup(_) => Stage::SnapshotCleaning,
        }
    }

    /// Whether this error ends the run in a failure state.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cleanup(_))
    }
}

/// Errors from loading the optional `cordova-reset.toml` settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the settings file.
    #[error("IO error reading settings file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or contains unknown keys.
    #[error("Invalid settings in {}: {source}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Errors from loading the manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest could not be read (missing, permissions, ...).
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid JSON.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        /// Manifest path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A required field is absent.
    #[error("missing required field '{field}' in {}", .path.display())]
    MissingField {
        /// Manifest path.
        path: PathBuf,
        /// Dotted field name, e.g. `cordova.platforms`.
        field: String,
    },

    /// A field is present but has the wrong shape.
    #[error("invalid field '{field}' in {}: {message}", .path.display())]
    InvalidField {
        /// Manifest path.
        path: PathBuf,
        /// Dotted field name.
        field: String,
        /// What was expected.
        message: String,
    },
}

/// Errors from writing or deleting the recovery snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The document could not be serialized.
    #[error("cannot serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The snapshot file could not be written or removed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// A single failed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Stage the step belongs to.
    pub stage: Stage,
    /// Human-readable step description, e.g. `add plugin cordova-plugin-camera`.
    pub step: String,
    /// Failure detail reported by the tool.
    pub reason: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to {}: {}", self.step, self.reason)
    }
}
