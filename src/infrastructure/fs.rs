//! Local file system helpers

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::SdkResult;

/// Write `content` to `path` via a temp file in the same directory, so
/// readers never see a partially written file.
pub fn write_atomic(path: &Path, content: &[u8]) -> SdkResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Remove a directory tree. Returns `false` when there was nothing to remove.
pub fn remove_dir_if_exists(path: &Path) -> SdkResult<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
