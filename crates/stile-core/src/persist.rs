//! Durable record helpers shared by the lockout and session stores.
//!
//! Records are written to a sibling temp file and renamed into place,
//! so a crash mid-write leaves the previous record intact.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Atomically replaces the file at `path` with `contents`.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = stage(path, contents, false)?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))
}

/// Like [`write_atomic`], but the file ends up with 0600 permissions on Unix.
pub(crate) fn write_atomic_private(path: &Path, contents: &str) -> Result<()> {
    let tmp = stage(path, contents, true)?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))
}

fn stage(path: &Path, contents: &str, private: bool) -> Result<std::path::PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp = path.with_extension("tmp");

    #[cfg(unix)]
    if private {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&tmp)
            .with_context(|| format!("Failed to open {} for writing", tmp.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", tmp.display()))?;
        return Ok(tmp);
    }

    #[cfg(not(unix))]
    let _ = private;

    fs::write(&tmp, contents)
        .with_context(|| format!("Failed to write to {}", tmp.display()))?;
    Ok(tmp)
}
