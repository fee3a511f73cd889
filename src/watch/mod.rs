// src/watch/mod.rs

//! Log file watching and rotation handling.
//!
//! This module is responsible for:
//! - Subscribing to change notifications for the log's directory and the
//!   log itself, behind a swappable [`NotificationBackend`].
//! - Tracking whether the log is currently open, and reopening it from the
//!   start when a log roller recreates it.
//! - Telling a [`LogSink`] when new bytes may be readable.
//!
//! It does **not** look at file content; matching lives in `crate::matcher`.

pub mod backend;
pub mod event;
pub mod mock;
pub mod watcher;

pub use backend::{NotificationBackend, NotifyBackend};
pub use event::{EventRecord, SubscriptionId, WatchEventKind};
pub use mock::MockNotificationBackend;
pub use watcher::{DirectoryWatcher, LogSink, WatchState, WatchTarget};
