//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the manifest loader and the
//! snapshot writer can be unit-tested without touching the real filesystem.
//! Production code uses [`SystemFileSystemOps`]; tests use
//! `MockFileSystemOps`.

use std::path::Path;

/// Abstraction over the file operations used by a reset run.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not UTF-8.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Create or truncate `path` and write `contents` to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()>;

    /// Delete the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails (including when the file is absent).
    fn remove(&self, path: &Path) -> std::io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }

    fn remove(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Pre-load files with [`with_file`](Self::with_file); make writes or
/// removals fail with [`read_only`](Self::read_only) and
/// [`undeletable`](Self::undeletable).
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, String>>,
    read_only: bool,
    undeletable: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file at `path` with `contents`.
    #[must_use]
    pub fn with_file(self, path: impl Into<std::path::PathBuf>, contents: &str) -> Self {
        self.files
            .lock()
            .expect("mock files poisoned")
            .insert(path.into(), contents.to_string());
        self
    }

    /// Make every [`FileSystemOps::write`] fail with `PermissionDenied`.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Make every [`FileSystemOps::remove`] fail with `PermissionDenied`.
    #[must_use]
    pub const fn undeletable(mut self) -> Self {
        self.undeletable = true;
        self
    }

    /// Return the current contents of `path`, if present.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .expect("mock files poisoned")
            .get(path)
            .cloned()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.contents(path).is_some()
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.contents(path)
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }

    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        if self.read_only {
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        }
        self.files
            .lock()
            .expect("mock files poisoned")
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> std::io::Result<()> {
        if self.undeletable {
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        }
        self.files
            .lock()
            .expect("mock files poisoned")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }
}
