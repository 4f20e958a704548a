//! Filesystem utilities.
//!
//! Crash-tolerant writes for session snapshots and settings: data goes to a
//! sibling `<name>.tmp` file, is flushed and synced, then renamed over the
//! destination. A reader never observes a half-written file.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::core::{CoreError, CoreResult};

/// Writes bytes atomically, creating parent directories as needed.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = sibling_path(path, "tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    replace_with(path, &tmp_path)
}

/// Writes UTF-8 text atomically.
pub fn atomic_write_text(path: &Path, text: &str) -> CoreResult<()> {
    atomic_write_bytes(path, text.as_bytes())
}

/// Writes a JSON file atomically with pretty formatting.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}

/// Reads a text file, returning `None` when it does not exist.
pub fn read_text_if_exists(path: &Path) -> CoreResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::IoError(e)),
    }
}

/// `dir/name.ext` -> `dir/name.ext.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().to_string());
    path.with_file_name(format!("{file_name}.{suffix}"))
}

fn replace_with(dest: &Path, tmp: &Path) -> CoreResult<()> {
    if !dest.exists() {
        std::fs::rename(tmp, dest)?;
        return Ok(());
    }

    // Rename-over-existing is not atomic everywhere; swap through a backup.
    let bak = sibling_path(dest, "bak");
    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(tmp);
            Err(CoreError::IoError(e))
        }
    }
}
