use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `data` in one step: the bytes go to a sibling temp
/// file which is flushed and then renamed over the target, so readers see
/// either the old content or the new, never a prefix.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    Ok(std::fs::create_dir_all(path)?)
}

/// Create `path` with `data` unless something is already there. Existing
/// files are never touched. Returns whether the file was created.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "exists, left unchanged");
        return Ok(false);
    }
    atomic_write(path, data).map(|()| true)
}

/// Read a file as UTF-8, treating any failure (missing, unreadable,
/// not UTF-8) as empty content.
pub fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
