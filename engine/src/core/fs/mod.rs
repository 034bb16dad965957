//! Filesystem utilities.
//!
//! Crash-tolerant writes for settings and saved subtitle files, and
//! reading of subtitle text.
//!
//! A partial write (power loss, crash) must never leave a half-written
//! subtitle file behind. Windows semantics differ from Unix for
//! rename-over-existing; we handle both.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{CoreError, CoreResult};

const UTF8_BOM: char = '\u{FEFF}';

// =============================================================================
// Reading
// =============================================================================

/// Reads a subtitle file as UTF-8, dropping a leading byte-order mark.
pub fn read_subtitle_file(path: &Path) -> CoreResult<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(strip_bom(&text).to_string())
}

/// Returns `text` without a leading UTF-8 byte-order mark.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(UTF8_BOM).unwrap_or(text)
}

/// Validates a user-supplied output path for a subtitle file.
///
/// Rejects empty paths and paths naming an existing directory.
pub fn validate_output_path(path: &str, label: &str) -> CoreResult<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(format!("{label} is empty")));
    }
    let pb = PathBuf::from(trimmed);
    if pb.is_dir() {
        return Err(CoreError::ValidationError(format!(
            "{label} is a directory: {}",
            pb.display()
        )));
    }
    Ok(pb)
}

// =============================================================================
// Atomic Writes
// =============================================================================

/// Write bytes to `path` using an atomic replace pattern.
///
/// Implementation notes:
/// - Write to a sibling temporary file.
/// - Flush and sync the temp file.
/// - Swap into place by renaming.
/// - If the destination exists, it is first moved aside as a `.bak` file, then removed.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = tmp_path_for(path);
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    atomic_replace(path, &tmp_path)
}

/// Write a text file atomically.
pub fn atomic_write_text(path: &Path, text: &str) -> CoreResult<()> {
    atomic_write_bytes(path, text.as_bytes())
}

/// Write a JSON file atomically with pretty formatting.
pub fn atomic_write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    atomic_write_bytes(path, &bytes)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "tmp")
}

fn bak_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "bak")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_file_name(format!("{file_name}.{suffix}"));
    sibling
}

fn atomic_replace(dest: &Path, src_tmp: &Path) -> CoreResult<()> {
    if !dest.exists() {
        std::fs::rename(src_tmp, dest)?;
        return Ok(());
    }

    let bak = bak_path_for(dest);
    if bak.exists() {
        let _ = std::fs::remove_file(&bak);
    }

    std::fs::rename(dest, &bak)?;
    match std::fs::rename(src_tmp, dest) {
        Ok(()) => {
            let _ = std::fs::remove_file(&bak);
            Ok(())
        }
        Err(e) => {
            // Restore the previous file.
            let _ = std::fs::rename(&bak, dest);
            let _ = std::fs::remove_file(src_tmp);
            Err(CoreError::IoError(e))
        }
    }
}
