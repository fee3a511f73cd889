// src/watch/mock.rs

//! Scripted notification backend for tests.
//!
//! Clones share state, so a test can keep one handle to emit events and
//! inspect subscriptions while the watcher owns another.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use super::backend::NotificationBackend;
use super::event::{EventRecord, SubscriptionId, SubscriptionTable, WatchEventKind};
use crate::errors::{LogwatchError, Result};

#[derive(Debug, Default)]
struct MockInner {
    subscriptions: SubscriptionTable,
    queue: VecDeque<EventRecord>,
    failing: HashSet<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct MockNotificationBackend {
    inner: Arc<Mutex<MockInner>>,
    wake: Arc<Notify>,
}

impl MockNotificationBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a change of `kind` at `path`, attributed like the real backend.
    /// Returns false if no subscription wanted it.
    pub fn emit(&self, path: impl AsRef<Path>, kind: WatchEventKind) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.subscriptions.resolve(path.as_ref(), kind) else {
            return false;
        };
        inner.queue.push_back(record);
        drop(inner);
        self.wake.notify_one();
        true
    }

    /// Make `subscribe` fail for `path`.
    pub fn fail_subscriptions_for(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing.insert(path.as_ref().to_path_buf());
    }

    pub fn is_subscribed(&self, path: impl AsRef<Path>) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.subscriptions.is_watching(path.as_ref())
    }

    pub fn subscription_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.subscriptions.len()
    }

    pub fn pending(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.queue.len()
    }
}

impl NotificationBackend for MockNotificationBackend {
    fn subscribe(&mut self, path: &Path, kinds: &[WatchEventKind]) -> Result<SubscriptionId> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing.contains(path) {
            return Err(LogwatchError::Subscribe {
                path: path.to_path_buf(),
                source: notify::Error::generic("scripted subscription failure"),
            });
        }
        Ok(inner.subscriptions.insert(path, kinds))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscriptions.remove(id);
    }

    fn drain(&mut self) -> Vec<EventRecord> {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.drain(..).collect()
    }

    fn wait_for_events(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Vec<EventRecord>> + Send + '_>> {
        Box::pin(async move {
            let records = self.drain();
            if !records.is_empty() {
                return records;
            }
            let _ = tokio::time::timeout(timeout, self.wake.notified()).await;
            self.drain()
        })
    }
}
