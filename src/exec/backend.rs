// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The action controller talks to a `ProcessBackend` instead of spawning
//! processes itself. This makes it easy to swap in a fake backend in tests
//! while keeping the production implementation here.
//!
//! - `TokioProcessBackend` is the default implementation used by `logwatch`.
//! - Tests can provide their own `ProcessBackend` that records spawns and
//!   lets the test decide when each "process" exits.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// OS-level identity of a spawned action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How an action process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionExit {
    Success,
    /// Non-zero exit code, or `-1` when killed by a signal.
    Failed(i32),
}

impl From<std::process::ExitStatus> for ActionExit {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ActionExit::Success
        } else {
            ActionExit::Failed(status.code().unwrap_or(-1))
        }
    }
}

/// Trait abstracting how actions are started and reaped.
pub trait ProcessBackend: Send {
    /// Start `command` with no arguments, inheriting environment and stdio.
    fn spawn(&mut self, command: &Path) -> io::Result<ProcessId>;

    /// Every child that has exited since the last call. Never blocks.
    fn poll_exited(&mut self) -> Vec<(ProcessId, ActionExit)>;
}

/// Real process backend used in production.
///
/// Children are tracked until `poll_exited` observes their exit. Dropping the
/// backend does not kill running children.
#[derive(Default)]
pub struct TokioProcessBackend {
    children: HashMap<ProcessId, Child>,
}

impl fmt::Debug for TokioProcessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioProcessBackend")
            .field("running", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TokioProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(&self) -> usize {
        self.children.len()
    }
}

impl ProcessBackend for TokioProcessBackend {
    fn spawn(&mut self, command: &Path) -> io::Result<ProcessId> {
        let child = Command::new(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false)
            .spawn()?;

        let pid = child
            .id()
            .map(ProcessId)
            .ok_or_else(|| io::Error::other("spawned child has no pid"))?;

        self.children.insert(pid, child);
        Ok(pid)
    }

    fn poll_exited(&mut self) -> Vec<(ProcessId, ActionExit)> {
        let mut exited = Vec::new();

        self.children.retain(|&pid, child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!(%pid, ?status, "child exited");
                exited.push((pid, ActionExit::from(status)));
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!(%pid, error = %err, "failed to query child status; forgetting it");
                exited.push((pid, ActionExit::Failed(-1)));
                false
            }
        });

        exited
    }
}
