//! JSON output file writing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Writes `value` as indented JSON to `path`, replacing any existing file.
///
/// The document goes to a sibling `.tmp` file first and is renamed into
/// place, so a failed write never leaves a truncated file at `path`.
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if serialization, directory creation, the write or the
/// rename fails.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut body = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    body.push('\n');

    let tmp = tmp_path(path)?;
    std::fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} to {}", tmp.display(), path.display()))
}

/// `{path}.tmp` next to the target.
fn tmp_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("output path has no file name: {}", path.display()))?;
    let mut tmp_name = OsString::from(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
