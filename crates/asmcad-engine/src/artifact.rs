//! Atomic output of the generated program

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};

/// Sibling path the artifact is staged at before the rename
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace the file at `path` with `text`.
///
/// The text is written next to the target and renamed over it, so readers
/// see either the old program or the new one in full.
pub fn write_artifact(path: &Path, text: &str) -> Result<()> {
    let staged = staging_path(path);
    let written = fs::write(&staged, text).and_then(|()| fs::rename(&staged, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&staged);
        return Err(EditorError::Artifact {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!("Wrote {} ({} bytes)", path.display(), text.len());
    Ok(())
}
