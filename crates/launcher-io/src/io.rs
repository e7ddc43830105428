//! Atomic file persistence for the cached application descriptor.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};

/// Write content atomically, creating parent directories as needed.
///
/// Uses write-to-temp-then-rename so a crash mid-write never leaves a
/// truncated descriptor behind. An exclusive advisory lock guards the
/// temp file against concurrent launcher runs.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory, so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    FileExt::lock_exclusive(&temp_file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    // Lock released on drop; the rename publishes the new content
    drop(temp_file);
    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}
