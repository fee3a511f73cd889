// src/engine/mod.rs

//! Event loop for logwatch.
//!
//! This module ties together:
//! - the directory watcher (which bytes became readable, and when the log
//!   was rotated)
//! - the scanner that reads those bytes and runs the streaming matcher
//! - the action controller that turns matches into at most one running
//!   command
//!
//! The synchronous core lives in [`core`]; the async/IO shell that waits on
//! notifications, child exits and shutdown is implemented in [`runtime`].

use crate::exec::ActionStats;
use crate::watch::EventRecord;

/// One wake-up of the event loop.
#[derive(Debug, Clone)]
pub enum LoopEvent {
    /// Notification records drained from the backend (possibly empty on
    /// timeout).
    Notifications(Vec<EventRecord>),
    /// Something told us a child process may have exited.
    ChildExited,
    /// Periodic fallback: reap children and poll a degraded watcher.
    Tick,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Decision returned by the core after handling a single `LoopEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreStep {
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

/// Totals reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matches: u64,
    pub actions: ActionStats,
}

pub mod core;
pub mod runtime;
pub mod scanner;
pub mod shutdown;

pub use core::CoreRuntime;
pub use runtime::Runtime;
pub use scanner::LogScanner;
pub use shutdown::{spawn_signal_listener, ShutdownFlag};
