// src/watch/backend.rs

//! Pluggable notification backend.
//!
//! The directory watcher only talks to a [`NotificationBackend`], so the
//! kernel facility underneath can be swapped (or faked in tests) without
//! touching the watcher's state machine.
//!
//! - [`NotifyBackend`] is the production implementation on top of `notify`.
//! - [`super::mock::MockNotificationBackend`] is a scripted one for tests.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::{LogwatchError, Result};
use crate::watch::event::{
    classify, EventRecord, SubscriptionId, SubscriptionTable, WatchEventKind,
};

/// Trait abstracting the change-notification facility.
pub trait NotificationBackend: Send {
    /// Start delivering `kinds` for `path` (non-recursive).
    fn subscribe(&mut self, path: &Path, kinds: &[WatchEventKind]) -> Result<SubscriptionId>;

    /// Stop delivering records for `id`. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Every record queued right now, without waiting.
    fn drain(&mut self) -> Vec<EventRecord>;

    /// Wait up to `timeout` for at least one record, then drain the rest of
    /// the queue. An empty result means the timeout elapsed.
    fn wait_for_events(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Vec<EventRecord>> + Send + '_>>;
}

/// Production backend wrapping `notify::RecommendedWatcher`.
///
/// `notify` delivers events on its own thread; the callback only forwards
/// them into a channel. Translation into [`EventRecord`]s happens on the
/// event loop when the channel is drained.
pub struct NotifyBackend {
    watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    subscriptions: SubscriptionTable,
}

impl std::fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyBackend")
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

impl NotifyBackend {
    /// Initialise the notification subsystem.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Err(err) = tx.send(res) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("logwatch: failed to forward notify event: {err}");
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            watcher,
            rx,
            subscriptions: SubscriptionTable::new(),
        })
    }

    fn translate(&self, res: notify::Result<Event>, out: &mut Vec<EventRecord>) {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "file watch error");
                return;
            }
        };

        if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
            // [from, to]
            let kinds = [WatchEventKind::Deleted, WatchEventKind::Created];
            for (path, kind) in event.paths.iter().zip(kinds) {
                out.extend(self.subscriptions.resolve(path, kind));
            }
            return;
        }

        for path in &event.paths {
            let Some(kind) = classify(&event.kind, path) else {
                continue;
            };
            match self.subscriptions.resolve(path, kind) {
                Some(record) => out.push(record),
                None => debug!(?path, ?kind, "notify event with no interested subscription"),
            }
        }
    }
}

impl NotificationBackend for NotifyBackend {
    fn subscribe(&mut self, path: &Path, kinds: &[WatchEventKind]) -> Result<SubscriptionId> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| LogwatchError::Subscribe {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(self.subscriptions.insert(path, kinds))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        let Some(sub) = self.subscriptions.remove(id) else {
            return;
        };
        // Another subscription may share the path; keep the OS watch then.
        if self.subscriptions.is_watching(&sub.path) {
            return;
        }
        if let Err(err) = self.watcher.unwatch(&sub.path) {
            // Expected when the file is already gone.
            debug!(path = ?sub.path, error = %err, "unwatch failed");
        }
    }

    fn drain(&mut self) -> Vec<EventRecord> {
        let mut records = Vec::new();
        while let Ok(res) = self.rx.try_recv() {
            self.translate(res, &mut records);
        }
        records
    }

    fn wait_for_events(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Vec<EventRecord>> + Send + '_>> {
        Box::pin(async move {
            let mut records = self.drain();
            if !records.is_empty() {
                return records;
            }

            if let Ok(Some(res)) = tokio::time::timeout(timeout, self.rx.recv()).await {
                self.translate(res, &mut records);
                records.extend(self.drain());
            }
            records
        })
    }
}
