use std::fs;
use std::io::Write;
use std::path::Path;

use drbo_model::{DrboError, Result};
use tempfile::NamedTempFile;

/// Write `contents` to `path` atomically.
///
/// Creates the parent directory if needed, writes into a temporary file in
/// that directory and renames it over `path`. A failure leaves no file at
/// `path` (or the previous one untouched).
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DrboError::filesystem(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DrboError::filesystem(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| DrboError::filesystem(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| DrboError::filesystem(path, e.error))?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote document");
    Ok(())
}
