//! Terminal outcomes of an update attempt

use crate::errors::{self, UpdateError};

/// Terminal state of one update attempt
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The new binary was installed
    Success,

    /// The installed binary already matches the verified candidate
    AlreadyUpToDate,

    /// The user answered no at the confirmation prompt
    UserDeclined,

    /// The run stopped before the install path was touched
    Aborted(UpdateError),

    /// The replace failed and the previous binary was restored from backup
    RolledBack(UpdateError),

    /// The replace failed and the restore from backup failed too.
    /// Most severe outcome: the install path may hold no working binary.
    RollbackFailed {
        replace: UpdateError,
        rollback: UpdateError,
    },
}

impl UpdateOutcome {
    /// Success and already-up-to-date are both treated as success
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            UpdateOutcome::Success | UpdateOutcome::AlreadyUpToDate
        )
    }

    /// Process exit code, one distinct value per terminal condition
    pub fn exit_code(&self) -> i32 {
        match self {
            UpdateOutcome::Success | UpdateOutcome::AlreadyUpToDate => errors::EXIT_SUCCESS,
            UpdateOutcome::UserDeclined => errors::EXIT_USER_DECLINED,
            UpdateOutcome::Aborted(e) => match e {
                UpdateError::Config(_) => errors::EXIT_CONFIG,
                UpdateError::ReferenceUnavailable(_) | UpdateError::MalformedReference => {
                    errors::EXIT_REFERENCE_UNAVAILABLE
                }
                UpdateError::DownloadFailed(_) => errors::EXIT_DOWNLOAD_FAILED,
                UpdateError::ChecksumMismatch { .. } => errors::EXIT_CHECKSUM_MISMATCH,
                UpdateError::ProcessNotStopped { .. } => errors::EXIT_PROCESS_NOT_STOPPED,
                UpdateError::BackupFailed(_) => errors::EXIT_BACKUP_FAILED,
                UpdateError::ReplaceFailed(_) => errors::EXIT_REPLACE_FAILED,
                UpdateError::RollbackFailed(_) => errors::EXIT_ROLLBACK_FAILED,
                UpdateError::Io(_) => errors::EXIT_GENERAL_ERROR,
            },
            UpdateOutcome::RolledBack(_) => errors::EXIT_REPLACE_FAILED,
            UpdateOutcome::RollbackFailed { .. } => errors::EXIT_ROLLBACK_FAILED,
        }
    }

    /// One human-readable line summarizing the outcome
    pub fn summary(&self) -> String {
        match self {
            UpdateOutcome::Success => "Update completed successfully".to_string(),
            UpdateOutcome::AlreadyUpToDate => {
                "Installed binary is already up to date. No update necessary".to_string()
            }
            UpdateOutcome::UserDeclined => "User declined update".to_string(),
            UpdateOutcome::Aborted(e) => format!("Update aborted: {}", e),
            UpdateOutcome::RolledBack(e) => {
                format!("Update failed ({}). Previous binary restored from backup", e)
            }
            UpdateOutcome::RollbackFailed { replace, rollback } => format!(
                "Update failed ({}) and rollback failed ({}). Manual recovery required",
                replace, rollback
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_outcomes_share_exit_zero() {
        assert_eq!(UpdateOutcome::Success.exit_code(), errors::EXIT_SUCCESS);
        assert_eq!(
            UpdateOutcome::AlreadyUpToDate.exit_code(),
            errors::EXIT_SUCCESS
        );
        assert!(UpdateOutcome::Success.is_success());
        assert!(UpdateOutcome::AlreadyUpToDate.is_success());
        assert!(!UpdateOutcome::UserDeclined.is_success());
    }

    #[test]
    fn test_abort_reasons_have_distinct_exit_codes() {
        let outcomes = [
            UpdateOutcome::UserDeclined,
            UpdateOutcome::Aborted(UpdateError::Config("x".into())),
            UpdateOutcome::Aborted(UpdateError::ReferenceUnavailable("x".into())),
            UpdateOutcome::Aborted(UpdateError::DownloadFailed("x".into())),
            UpdateOutcome::Aborted(UpdateError::ChecksumMismatch {
                expected: "a".into(),
                actual: "b".into(),
            }),
            UpdateOutcome::Aborted(UpdateError::ProcessNotStopped {
                name: "Lon.exe".into(),
                waited_secs: 5,
            }),
            UpdateOutcome::Aborted(UpdateError::BackupFailed("x".into())),
            UpdateOutcome::RolledBack(UpdateError::ReplaceFailed("x".into())),
            UpdateOutcome::RollbackFailed {
                replace: UpdateError::ReplaceFailed("x".into()),
                rollback: UpdateError::RollbackFailed("y".into()),
            },
        ];

        let mut codes: Vec<i32> = outcomes.iter().map(|o| o.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), outcomes.len(), "exit codes must be distinct");
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_rollback_failed_is_most_severe() {
        let rolled_back = UpdateOutcome::RolledBack(UpdateError::ReplaceFailed("x".into()));
        let rollback_failed = UpdateOutcome::RollbackFailed {
            replace: UpdateError::ReplaceFailed("x".into()),
            rollback: UpdateError::RollbackFailed("y".into()),
        };
        assert!(rollback_failed.exit_code() > rolled_back.exit_code());
    }

    #[test]
    fn test_summary_names_the_precipitating_condition() {
        let outcome = UpdateOutcome::Aborted(UpdateError::ChecksumMismatch {
            expected: "aaa".into(),
            actual: "bbb".into(),
        });
        let summary = outcome.summary();
        assert!(summary.contains("checksum mismatch"));
        assert!(summary.contains("aaa"));
        assert!(summary.contains("bbb"));
    }
}
