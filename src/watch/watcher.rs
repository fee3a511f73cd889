// src/watch/watcher.rs

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::errors::{LogwatchError, Result};
use crate::fs::{FileSystem, LogFile};
use crate::watch::backend::NotificationBackend;
use crate::watch::event::{
    EventRecord, SubscriptionId, WatchEventKind, DIR_EVENTS, FILE_EVENTS,
};

/// Read callback driven by the watcher.
pub trait LogSink {
    /// The watched file was replaced; anything carried from the previous
    /// file's stream no longer applies.
    fn on_reopen(&mut self);

    /// New bytes may be available at `file`'s current offset.
    fn on_readable(&mut self, file: &mut dyn LogFile);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Directory observed, target absent or not openable.
    NoFile,
    /// File handle valid; modifications are delivered.
    Open,
}

/// The watched log split into its directory and entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    dir: PathBuf,
    file_name: OsString,
    path: PathBuf,
}

impl WatchTarget {
    /// Split `logpath` into directory + file name.
    ///
    /// The path must name a file inside an explicit directory
    /// (`/var/log/syslog`, `./app.log`); a bare `app.log` is rejected.
    pub fn parse(logpath: &str) -> Result<Self> {
        let path = Path::new(logpath);
        let invalid = || LogwatchError::InvalidPath(logpath.to_string());

        let file_name = path.file_name().ok_or_else(invalid)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            file_name: file_name.to_os_string(),
            path: dir.join(file_name),
        })
    }

    /// [`WatchTarget::parse`] plus a check that the directory exists.
    pub fn resolve(logpath: &str, fs: &dyn FileSystem) -> Result<Self> {
        let target = Self::parse(logpath)?;
        if !fs.exists(&target.dir) {
            return Err(LogwatchError::DirectoryNotFound(target.dir));
        }
        if !fs.is_dir(&target.dir) {
            return Err(LogwatchError::NotADirectory(target.dir));
        }
        Ok(target)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &OsString {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Watches one log file through its parent directory, reopening it when an
/// external log roller recreates it.
pub struct DirectoryWatcher<B: NotificationBackend> {
    target: WatchTarget,
    state: WatchState,
    fs: Arc<dyn FileSystem>,
    backend: B,
    dir_sub: Option<SubscriptionId>,
    file_sub: Option<SubscriptionId>,
    file: Option<Box<dyn LogFile>>,
}

impl<B: NotificationBackend> fmt::Debug for DirectoryWatcher<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("target", &self.target)
            .field("state", &self.state)
            .field("dir_sub", &self.dir_sub)
            .field("file_sub", &self.file_sub)
            .finish_non_exhaustive()
    }
}

impl<B: NotificationBackend> DirectoryWatcher<B> {
    /// Set up watching for `logpath`.
    ///
    /// Fails only if the path is malformed or its directory is missing.
    /// Subscription failures are logged and leave the watcher degraded.
    /// With `start_at_end`, content already in the file is skipped.
    pub fn init(
        logpath: &str,
        fs: Arc<dyn FileSystem>,
        backend: B,
        start_at_end: bool,
    ) -> Result<Self> {
        let target = WatchTarget::resolve(logpath, fs.as_ref())?;

        let mut watcher = Self {
            target,
            state: WatchState::NoFile,
            fs,
            backend,
            dir_sub: None,
            file_sub: None,
            file: None,
        };

        match watcher.backend.subscribe(&watcher.target.dir, DIR_EVENTS) {
            Ok(id) => watcher.dir_sub = Some(id),
            Err(err) => warn!(
                dir = ?watcher.target.dir,
                error = %err,
                "directory watch failed; file recreation will go unnoticed"
            ),
        }

        if watcher.fs.exists(&watcher.target.path) {
            watcher.reopen();
            if start_at_end {
                if let Some(file) = watcher.file.as_mut() {
                    match file.seek_to_end() {
                        Ok(offset) => debug!(offset, "skipping existing log content"),
                        Err(err) => warn!(error = %err, "seek to end failed"),
                    }
                }
            }
        }

        info!(
            path = ?watcher.target.path,
            state = ?watcher.state,
            "log watcher started"
        );
        Ok(watcher)
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Offset of the next unread byte, if a file is open.
    pub fn file_offset(&self) -> Option<u64> {
        self.file.as_ref().map(|f| f.offset())
    }

    /// Open but without a file subscription, so modifications must be polled.
    pub fn is_degraded(&self) -> bool {
        self.dir_sub.is_none() || (self.state == WatchState::Open && self.file_sub.is_none())
    }

    /// Replace the file handle and its subscription with fresh ones.
    ///
    /// The new handle starts at offset 0. Returns true if the file is open.
    fn reopen(&mut self) -> bool {
        if let Some(id) = self.file_sub.take() {
            self.backend.unsubscribe(id);
        }
        self.file = None;

        match self.fs.open_log(&self.target.path) {
            Ok(file) => {
                self.file = Some(file);
                self.state = WatchState::Open;
                match self.backend.subscribe(&self.target.path, FILE_EVENTS) {
                    Ok(id) => self.file_sub = Some(id),
                    Err(err) => warn!(
                        path = ?self.target.path,
                        error = %err,
                        "file watch failed; falling back to polling"
                    ),
                }
                debug!(path = ?self.target.path, "log opened");
                true
            }
            Err(err) => {
                warn!(path = ?self.target.path, error = %err, "reopen failed");
                self.state = WatchState::NoFile;
                false
            }
        }
    }

    /// Wait for the next batch of notification records.
    pub async fn wait_for_events(&mut self, timeout: Duration) -> Vec<EventRecord> {
        self.backend.wait_for_events(timeout).await
    }

    /// Records queued right now, without waiting.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.backend.drain()
    }

    /// Apply a batch of records in order, calling into `sink` as needed.
    pub fn process_events(&mut self, records: Vec<EventRecord>, sink: &mut dyn LogSink) {
        for record in records {
            self.handle_event(record, sink);
        }
    }

    fn handle_event(&mut self, record: EventRecord, sink: &mut dyn LogSink) {
        let is_dir = Some(record.subscription) == self.dir_sub;
        let is_file = Some(record.subscription) == self.file_sub;
        let names_target = record.name.as_ref() == Some(&self.target.file_name);

        match record.kind {
            WatchEventKind::Created if is_dir && names_target => {
                info!(path = ?self.target.path, "log created; reopening");
                if self.reopen() {
                    sink.on_reopen();
                    // Catch bytes written before the file subscription existed.
                    self.notify_readable(sink);
                }
            }
            WatchEventKind::Deleted if is_dir && names_target => {
                // Reads on the old handle keep working until it is replaced.
                debug!(path = ?self.target.path, "log removed");
            }
            WatchEventKind::Modified | WatchEventKind::ClosedAfterWrite if is_file => {
                self.notify_readable(sink);
            }
            _ => {
                debug!(?record, "ignoring notification record");
            }
        }
    }

    fn notify_readable(&mut self, sink: &mut dyn LogSink) {
        if self.state != WatchState::Open {
            return;
        }
        if let Some(file) = self.file.as_mut() {
            sink.on_readable(file.as_mut());
        }
    }

    /// Poll the file when no modification events can be expected.
    pub fn poll(&mut self, sink: &mut dyn LogSink) {
        if self.state == WatchState::Open && self.file_sub.is_none() {
            self.notify_readable(sink);
        }
    }

    /// Release the file handle and both subscriptions.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.file_sub.take() {
            self.backend.unsubscribe(id);
        }
        if let Some(id) = self.dir_sub.take() {
            self.backend.unsubscribe(id);
        }
        self.file = None;
        self.state = WatchState::NoFile;
        debug!(path = ?self.target.path, "log watcher released");
    }
}
