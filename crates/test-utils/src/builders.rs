#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use logwatch::engine::{CoreRuntime, CoreStep, LogScanner, LoopEvent};
use logwatch::exec::ActionController;
use logwatch::fs::mock::MockFileSystem;
use logwatch::fs::LogFile;
use logwatch::matcher::{Pattern, StreamMatcher};
use logwatch::watch::{DirectoryWatcher, LogSink, MockNotificationBackend, WatchEventKind};

use crate::fake_process::FakeProcessBackend;

pub const LOG_DIR: &str = "/var/log/app";
pub const LOG_FILE: &str = "/var/log/app/app.log";

/// Everything a watcher test needs, wired over in-memory fakes.
pub struct Scenario {
    pub fs: MockFileSystem,
    pub notifications: MockNotificationBackend,
    pub processes: FakeProcessBackend,
    pub core: CoreRuntime<MockNotificationBackend, FakeProcessBackend>,
}

impl Scenario {
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(LOG_FILE)
    }

    /// Process every queued notification, as one loop wake-up would.
    pub fn pump(&mut self) -> CoreStep {
        self.core.step(LoopEvent::Notifications(Vec::new()))
    }

    /// Deliver a child-exit wake-up.
    pub fn child_exited(&mut self) -> CoreStep {
        self.core.step(LoopEvent::ChildExited)
    }

    /// Append to the log and emit a modify notification.
    pub fn write(&self, bytes: &[u8]) {
        assert!(self.fs.append(LOG_FILE, bytes), "log file does not exist");
        self.notifications.emit(LOG_FILE, WatchEventKind::Modified);
    }

    /// Unlink the log and emit a delete notification.
    pub fn delete(&self) {
        self.fs.remove_file(LOG_FILE);
        self.notifications.emit(LOG_FILE, WatchEventKind::Deleted);
    }

    /// Recreate the log with `content` and emit a create notification.
    pub fn recreate(&self, content: &[u8]) {
        self.fs.create_file(LOG_FILE, content);
        self.notifications.emit(LOG_FILE, WatchEventKind::Created);
    }
}

/// Builder for [`Scenario`] to simplify test setup.
pub struct ScenarioBuilder {
    pattern: Vec<u8>,
    command: PathBuf,
    chunk_size: usize,
    existing: Option<Vec<u8>>,
    start_at_end: bool,
    fail_dir_watch: bool,
    fail_file_watch: bool,
}

impl ScenarioBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.as_bytes().to_vec(),
            command: PathBuf::from("/usr/local/bin/on-match"),
            chunk_size: 16,
            existing: None,
            start_at_end: true,
            fail_dir_watch: false,
            fail_file_watch: false,
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn command(mut self, command: impl AsRef<Path>) -> Self {
        self.command = command.as_ref().to_path_buf();
        self
    }

    pub fn existing_log(mut self, content: &[u8]) -> Self {
        self.existing = Some(content.to_vec());
        self
    }

    pub fn start_at_end(mut self, val: bool) -> Self {
        self.start_at_end = val;
        self
    }

    pub fn fail_dir_watch(mut self) -> Self {
        self.fail_dir_watch = true;
        self
    }

    pub fn fail_file_watch(mut self) -> Self {
        self.fail_file_watch = true;
        self
    }

    pub fn build(self) -> Scenario {
        let fs = MockFileSystem::new();
        fs.add_dir(LOG_DIR);
        if let Some(content) = self.existing {
            fs.create_file(LOG_FILE, content);
        }

        let notifications = MockNotificationBackend::new();
        if self.fail_dir_watch {
            notifications.fail_subscriptions_for(LOG_DIR);
        }
        if self.fail_file_watch {
            notifications.fail_subscriptions_for(LOG_FILE);
        }
        let processes = FakeProcessBackend::new();

        let watcher = DirectoryWatcher::init(
            LOG_FILE,
            Arc::new(fs.clone()),
            notifications.clone(),
            self.start_at_end,
        )
        .expect("scenario watcher should initialise");

        let pattern = Pattern::compile(self.pattern).expect("scenario pattern must be non-empty");
        let controller = ActionController::new(self.command, processes.clone());
        let scanner = LogScanner::new(StreamMatcher::new(pattern), self.chunk_size, controller);

        Scenario {
            fs,
            notifications,
            processes,
            core: CoreRuntime::new(watcher, scanner),
        }
    }
}

/// A `LogSink` that just records what it was given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub bytes: Vec<u8>,
    pub reads: usize,
    pub reopens: usize,
    pub read_errors: usize,
}

impl LogSink for RecordingSink {
    fn on_reopen(&mut self) {
        self.reopens += 1;
        self.bytes.clear();
    }

    fn on_readable(&mut self, file: &mut dyn LogFile) {
        self.reads += 1;
        let mut buf = [0u8; 64];
        loop {
            match file.read_chunk(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.bytes.extend_from_slice(&buf[..n]),
                Err(_) => {
                    self.read_errors += 1;
                    break;
                }
            }
        }
    }
}
