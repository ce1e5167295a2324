//! Append-only update log
//!
//! One `YYYY-MM-DD HH:MM:SS - message` line per state transition and per
//! terminal outcome, mirrored to the tracing subscriber for the console.
//! The log is an explicitly constructed instance handed to the
//! orchestrator, not a process-wide singleton. Log I/O failures never
//! fail the update.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// Log file name inside the configured log directory
pub const LOG_FILE_NAME: &str = "updater.log";

pub struct UpdateLog {
    file: Option<Mutex<File>>,
}

impl UpdateLog {
    /// Open the append-only log file, creating the directory if needed.
    /// Falls back to console-only logging when the file cannot be opened.
    pub fn open(log_dir: &Path) -> Self {
        let file = fs::create_dir_all(log_dir)
            .ok()
            .and_then(|_| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(log_dir.join(LOG_FILE_NAME))
                    .ok()
            })
            .map(Mutex::new);

        if file.is_none() {
            warn!(
                "Could not open {} in {}; logging to console only",
                LOG_FILE_NAME,
                log_dir.display()
            );
        }

        Self { file }
    }

    /// Console-only log, for tests and degraded startup
    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Append one timestamped line, flushed immediately
    pub fn log(&self, message: &str) {
        info!("{}", message);

        if let Some(file) = &self.file {
            let line = format!("{} - {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
            if let Ok(mut f) = file.lock() {
                let _ = f.write_all(line.as_bytes());
                let _ = f.flush();
            }
        }
    }
}
