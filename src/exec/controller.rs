// src/exec/controller.rs

//! Single-flight action gate.
//!
//! At most one action process runs at a time. Matches arriving while one is
//! in flight are dropped (logged, not queued). The slot re-arms when the
//! running process is reaped, or immediately if a spawn fails.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::backend::{ActionExit, ProcessBackend, ProcessId};

/// What `on_match` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Spawned(ProcessId),
    Suppressed,
    SpawnFailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStats {
    pub spawned: u64,
    pub suppressed: u64,
    pub failed: u64,
    pub reaped: u64,
}

#[derive(Debug)]
pub struct ActionController<P: ProcessBackend> {
    command: PathBuf,
    in_flight: Option<ProcessId>,
    backend: P,
    stats: ActionStats,
}

impl<P: ProcessBackend> ActionController<P> {
    pub fn new(command: impl Into<PathBuf>, backend: P) -> Self {
        Self {
            command: command.into(),
            in_flight: None,
            backend,
            stats: ActionStats::default(),
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn in_flight(&self) -> Option<ProcessId> {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn stats(&self) -> ActionStats {
        self.stats
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// A match was seen: start the action unless one is already running.
    pub fn on_match(&mut self) -> ActionOutcome {
        if let Some(pid) = self.in_flight {
            self.stats.suppressed += 1;
            info!(
                cmd = ?self.command,
                %pid,
                "action still running; match suppressed"
            );
            return ActionOutcome::Suppressed;
        }

        match self.backend.spawn(&self.command) {
            Ok(pid) => {
                self.in_flight = Some(pid);
                self.stats.spawned += 1;
                info!(cmd = ?self.command, %pid, "pattern matched; action started");
                ActionOutcome::Spawned(pid)
            }
            Err(err) => {
                // Nothing started, so nothing will ever be reaped for it.
                self.in_flight = None;
                self.stats.failed += 1;
                error!(cmd = ?self.command, error = %err, "failed to start action");
                ActionOutcome::SpawnFailed
            }
        }
    }

    /// A child exited. Returns true if it was the in-flight action.
    pub fn on_child_exit(&mut self, pid: ProcessId, exit: ActionExit) -> bool {
        self.stats.reaped += 1;
        if self.in_flight != Some(pid) {
            return false;
        }
        self.in_flight = None;
        info!(cmd = ?self.command, %pid, ?exit, "action finished; re-armed");
        true
    }

    /// Drain every pending child exit from the backend.
    pub fn reap(&mut self) -> usize {
        let exited = self.backend.poll_exited();
        let count = exited.len();
        for (pid, exit) in exited {
            self.on_child_exit(pid, exit);
        }
        count
    }
}
