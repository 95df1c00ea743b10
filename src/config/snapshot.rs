//! Recovery snapshot: a copy of the manifest written before anything is
//! removed, and deleted once the run completes.
use std::path::Path;

use super::manifest::Manifest;
use crate::error::SnapshotError;
use crate::operations::FileSystemOps;

/// Render the snapshot contents (pretty JSON, two-space indent).
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn render(manifest: &Manifest) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(&manifest.document)?)
}

/// Write the snapshot to `path`, overwriting any previous one.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write(manifest: &Manifest, path: &Path, fs: &dyn FileSystemOps) -> Result<(), SnapshotError> {
    let contents = render(manifest)?;
    fs.write(path, &contents).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Delete the snapshot at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be removed.
pub fn clean(path: &Path, fs: &dyn FileSystemOps) -> Result<(), SnapshotError> {
    fs.remove(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}
