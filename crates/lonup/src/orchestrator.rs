//! The update state machine
//!
//! Sequences reference fetch, download, verification, user confirmation,
//! process stop, backup and atomic replace, and decides abort vs. proceed
//! vs. rollback. This is the only component that knows the end-to-end
//! flow; everything it touches comes in as a capability.
//!
//! The candidate lives in a `TempDir` whose guard spans the whole
//! attempt, so its temporary storage is discarded exactly once on every
//! exit path.

use crate::checksum;
use crate::config::UpdaterConfig;
use crate::confirm::Confirm;
use crate::errors::UpdateError;
use crate::fetch::Fetcher;
use crate::logging::UpdateLog;
use crate::outcome::UpdateOutcome;
use crate::process_guard::{ProcessGuard, StopResult};
use crate::replace;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Orchestrator<'a> {
    config: UpdaterConfig,
    fetcher: Box<dyn Fetcher>,
    guard: ProcessGuard,
    confirmer: Box<dyn Confirm>,
    log: &'a UpdateLog,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: UpdaterConfig,
        fetcher: Box<dyn Fetcher>,
        guard: ProcessGuard,
        confirmer: Box<dyn Confirm>,
        log: &'a UpdateLog,
    ) -> Self {
        Self {
            config,
            fetcher,
            guard,
            confirmer,
            log,
        }
    }

    /// Drive one update attempt to a terminal outcome.
    /// Every terminal state produces exactly one summary log line.
    pub async fn run(&mut self) -> UpdateOutcome {
        let outcome = self.attempt().await;
        self.log.log(&outcome.summary());
        outcome
    }

    async fn attempt(&mut self) -> UpdateOutcome {
        // Start -> FetchedReference
        self.log.log(&format!(
            "Fetching checksum reference from {}",
            self.config.checksum_url
        ));
        let reference_bytes = match self.fetcher.fetch_bytes(&self.config.checksum_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return UpdateOutcome::Aborted(UpdateError::ReferenceUnavailable(e.to_string()))
            }
        };
        let expected = match checksum::parse_digest_reference(&reference_bytes) {
            Ok(digest) => digest,
            Err(e) => return UpdateOutcome::Aborted(e),
        };
        self.log.log(&format!("Expected SHA-256: {}", expected));

        // -> Downloaded
        let staging = match TempDir::new() {
            Ok(dir) => dir,
            Err(e) => {
                return UpdateOutcome::Aborted(UpdateError::DownloadFailed(format!(
                    "cannot create temporary directory: {}",
                    e
                )))
            }
        };
        self.log.log(&format!(
            "Downloading candidate from {}",
            self.config.release_url
        ));
        let body = match self.fetcher.fetch_bytes(&self.config.release_url).await {
            Ok(bytes) => bytes,
            Err(e) => return UpdateOutcome::Aborted(UpdateError::DownloadFailed(e.to_string())),
        };
        let candidate_path = staging.path().join("candidate");
        if let Err(e) = fs::write(&candidate_path, &body) {
            return UpdateOutcome::Aborted(UpdateError::DownloadFailed(format!(
                "cannot write candidate: {}",
                e
            )));
        }
        self.log.log(&format!(
            "Downloaded {} bytes to {}",
            body.len(),
            candidate_path.display()
        ));

        // -> Verified. Never install unverified content.
        let actual = match checksum::compute_digest(&candidate_path) {
            Ok(digest) => digest,
            Err(e) => return UpdateOutcome::Aborted(e),
        };
        if !checksum::digests_match(&actual, &expected) {
            return UpdateOutcome::Aborted(UpdateError::ChecksumMismatch { expected, actual });
        }
        self.log.log("Checksum verified");

        // -> UpToDate | NeedsInstall. The installed digest is recomputed
        // every run; the file may have changed since the last invocation.
        let installed_exists = self.config.install_path.is_file();
        if installed_exists {
            match checksum::compute_digest(&self.config.install_path) {
                Ok(installed) if checksum::digests_match(&installed, &actual) => {
                    return UpdateOutcome::AlreadyUpToDate;
                }
                Ok(_) => {}
                Err(e) => {
                    // unreadable installed binary: treat as outdated
                    self.log
                        .log(&format!("Could not hash installed binary: {}", e));
                }
            }
        } else {
            self.log.log(&format!(
                "No existing installation at {}; treating as first install",
                self.config.install_path.display()
            ));
        }

        // -> Confirmed
        if !self.confirmer.confirm("Update available. Proceed?") {
            return UpdateOutcome::UserDeclined;
        }

        // -> Stopped. Never replace a binary backing a live process.
        let stop = self
            .guard
            .ensure_stopped(
                &self.config.process_name,
                self.config.stop_max_wait(),
                self.config.stop_poll_interval(),
            )
            .await;
        if stop == StopResult::StillRunning {
            return UpdateOutcome::Aborted(UpdateError::ProcessNotStopped {
                name: self.config.process_name.clone(),
                waited_secs: self.config.stop_max_wait_secs,
            });
        }
        self.log
            .log(&format!("{} is not running", self.config.process_name));

        // -> BackedUp. Never replace without a safety copy when one is
        // possible; a first install has nothing to back up. The install
        // path is re-checked here: the confirmation prompt can stay open
        // for a long time.
        let backup: Option<PathBuf> = if self.config.install_path.is_file() {
            match replace::backup_file(&self.config.install_path, &self.config.backup_dir) {
                Ok(path) => {
                    self.log
                        .log(&format!("Backed up installed binary to {}", path.display()));
                    Some(path)
                }
                Err(e) => return UpdateOutcome::Aborted(e),
            }
        } else {
            None
        };

        // -> Replaced
        if let Err(replace_err) = replace::atomic_replace(&candidate_path, &self.config.install_path)
        {
            return match backup {
                Some(backup_path) => {
                    self.log.log("Replace failed, attempting rollback");
                    match replace::rollback_from(&backup_path, &self.config.install_path) {
                        Ok(()) => UpdateOutcome::RolledBack(replace_err),
                        Err(rollback_err) => UpdateOutcome::RollbackFailed {
                            replace: replace_err,
                            rollback: rollback_err,
                        },
                    }
                }
                None => UpdateOutcome::Aborted(replace_err),
            };
        }
        self.log.log(&format!(
            "Installed new binary at {}",
            self.config.install_path.display()
        ));

        // -> Done. `staging` drops here, discarding the candidate.
        UpdateOutcome::Success
    }
}
