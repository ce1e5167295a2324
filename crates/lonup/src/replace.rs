//! Backup and atomic-replace engine for the installed executable
//!
//! The replace is two-phase: copy into a sibling temporary file, then a
//! single rename onto the destination. The rename is the only step that
//! touches the destination, so observers see wholly-old or wholly-new
//! content at every instant, whatever happens during the copy.

use crate::errors::UpdateError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Copy `installed` into `backup_dir` under a timestamped name
/// (`<stem>_<YYYYMMDD_HHMMSS><.ext>`), creating the directory if needed.
/// No partial backup file is left behind on failure.
pub fn backup_file(installed: &Path, backup_dir: &Path) -> Result<PathBuf, UpdateError> {
    fs::create_dir_all(backup_dir).map_err(|e| {
        UpdateError::BackupFailed(format!("cannot create {}: {}", backup_dir.display(), e))
    })?;

    let stem = installed
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("backup");
    let ext = installed
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = backup_dir.join(format!("{}_{}{}", stem, timestamp, ext));

    if let Err(e) = fs::copy(installed, &backup_path) {
        let _ = fs::remove_file(&backup_path);
        return Err(UpdateError::BackupFailed(format!(
            "copy {} to {} failed: {}",
            installed.display(),
            backup_path.display(),
            e
        )));
    }

    Ok(backup_path)
}

/// Replace `dest` with the contents of `src`: copy to `<dest>.new`, then
/// one atomic rename. On failure the temporary is removed and `dest` is
/// guaranteed untouched.
pub fn atomic_replace(src: &Path, dest: &Path) -> Result<(), UpdateError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            UpdateError::ReplaceFailed(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let staging = staging_path(dest);
    if let Err(e) = fs::copy(src, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(UpdateError::ReplaceFailed(format!(
            "copy to {} failed: {}",
            staging.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&staging, dest) {
        let _ = fs::remove_file(&staging);
        return Err(UpdateError::ReplaceFailed(format!(
            "rename onto {} failed: {}",
            dest.display(),
            e
        )));
    }

    Ok(())
}

/// Best-effort restore of `backup` over `dest` after a failed replace.
/// Runs only when the system is already known degraded, so plain copy
/// semantics are acceptable; the distinct error lets the orchestrator
/// escalate a failed restore as most severe.
pub fn rollback_from(backup: &Path, dest: &Path) -> Result<(), UpdateError> {
    fs::copy(backup, dest).map(|_| ()).map_err(|e| {
        UpdateError::RollbackFailed(format!(
            "restore {} over {} failed: {}",
            backup.display(),
            dest.display(),
            e
        ))
    })
}

fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "update".into());
    name.push(".new");
    dest.with_file_name(name)
}
