//! Error taxonomy and exit codes for lonup
//!
//! Every fallible operation reports a specific failure kind through a
//! result value; the orchestrator is the sole decision point for
//! abort vs. continue vs. rollback.

use thiserror::Error;

/// Exit code for success (including already-up-to-date)
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general/unexpected errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when configuration is missing or invalid
pub const EXIT_CONFIG: i32 = 64;

/// Exit code when the checksum reference cannot be fetched or parsed
pub const EXIT_REFERENCE_UNAVAILABLE: i32 = 65;

/// Exit code when the candidate download fails
pub const EXIT_DOWNLOAD_FAILED: i32 = 66;

/// Exit code when the candidate fails checksum verification
pub const EXIT_CHECKSUM_MISMATCH: i32 = 67;

/// Exit code when the user declines the update
pub const EXIT_USER_DECLINED: i32 = 68;

/// Exit code when the protected process could not be stopped in time
pub const EXIT_PROCESS_NOT_STOPPED: i32 = 69;

/// Exit code when the pre-replace backup fails
pub const EXIT_BACKUP_FAILED: i32 = 70;

/// Exit code when the replace failed and the install path is intact
/// (either nothing was touched or the backup was restored)
pub const EXIT_REPLACE_FAILED: i32 = 71;

/// Exit code when the replace failed and the rollback failed too;
/// the installation may be left without a working binary
pub const EXIT_ROLLBACK_FAILED: i32 = 72;

/// Failure kinds for a single update attempt
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("checksum reference unavailable: {0}")]
    ReferenceUnavailable(String),

    #[error("checksum reference is empty or malformed")]
    MalformedReference,

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("{name} is still running after {waited_secs}s")]
    ProcessNotStopped { name: String, waited_secs: u64 },

    #[error("backup failed: {0}")]
    BackupFailed(String),

    #[error("replace failed: {0}")]
    ReplaceFailed(String),

    #[error("rollback failed: {0}")]
    RollbackFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
