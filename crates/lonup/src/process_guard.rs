//! Process guard - ensure the protected application is not running
//!
//! Process listing and termination are a capability trait so the guard
//! logic stays platform-neutral: production composes the sysinfo-backed
//! control, platforms without process listing compose `NoProcessControl`
//! (stopping becomes a no-op success), and tests compose fakes.
//!
//! Termination is asynchronous on the host OS, so the guard polls with a
//! hard deadline instead of assuming the kill took effect.

use anyhow::{bail, Result};
use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::{debug, warn};

/// Result of driving the protected process to a stopped state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    Stopped,
    StillRunning,
}

/// OS process-control capability consumed by the guard
pub trait ProcessControl: Send {
    /// Image names of all currently running processes
    fn list_process_names(&mut self) -> Vec<String>;

    /// Forcefully terminate every process whose image name matches
    /// `name` case-insensitively, together with its direct children
    fn terminate_process_tree(&mut self, name: &str) -> Result<()>;
}

/// sysinfo-backed process control
pub struct SystemProcessControl {
    system: System,
}

impl SystemProcessControl {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl Default for SystemProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for SystemProcessControl {
    fn list_process_names(&mut self) -> Vec<String> {
        self.system.refresh_processes();
        self.system
            .processes()
            .values()
            .map(|p| p.name().to_string())
            .collect()
    }

    fn terminate_process_tree(&mut self, name: &str) -> Result<()> {
        self.system.refresh_processes();
        let matching: Vec<sysinfo::Pid> = self
            .system
            .processes()
            .iter()
            .filter(|(_, p)| p.name().eq_ignore_ascii_case(name))
            .map(|(pid, _)| *pid)
            .collect();

        if matching.is_empty() {
            return Ok(());
        }

        let mut refused = 0usize;
        for (pid, process) in self.system.processes() {
            let in_tree = matching.contains(pid)
                || process
                    .parent()
                    .map(|parent| matching.contains(&parent))
                    .unwrap_or(false);
            if in_tree && !process.kill() {
                refused += 1;
            }
        }

        if refused > 0 {
            bail!("{} process(es) refused the kill signal", refused);
        }
        Ok(())
    }
}

/// Process control for platforms (or compositions) without a listing
/// capability: nothing is ever reported running, termination is a no-op.
pub struct NoProcessControl;

impl ProcessControl for NoProcessControl {
    fn list_process_names(&mut self) -> Vec<String> {
        Vec::new()
    }

    fn terminate_process_tree(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// Drives the protected application to a stopped state within a bounded time
pub struct ProcessGuard {
    control: Box<dyn ProcessControl>,
}

impl ProcessGuard {
    pub fn new(control: Box<dyn ProcessControl>) -> Self {
        Self { control }
    }

    /// Whether any running process matches `name` case-insensitively
    pub fn is_running(&mut self, name: &str) -> bool {
        self.control
            .list_process_names()
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Stop `name` if it is running: one forceful terminate request, then
    /// poll at `poll_interval` until the process disappears or `max_wait`
    /// elapses. Termination request failures degrade to `StillRunning`
    /// rather than erroring; the orchestrator decides whether to abort.
    pub async fn ensure_stopped(
        &mut self,
        name: &str,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> StopResult {
        if !self.is_running(name) {
            return StopResult::Stopped;
        }

        debug!("{} is currently running, requesting termination", name);
        if let Err(e) = self.control.terminate_process_tree(name) {
            warn!("Termination request for {} failed: {}", name, e);
        }

        let deadline = Instant::now() + max_wait;
        loop {
            if !self.is_running(name) {
                return StopResult::Stopped;
            }
            let now = Instant::now();
            if now >= deadline {
                return StopResult::StillRunning;
            }
            tokio::time::sleep(poll_interval.min(deadline - now)).await;
        }
    }
}
