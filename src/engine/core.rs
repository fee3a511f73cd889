// src/engine/core.rs

//! Synchronous core of the event loop.
//!
//! The core consumes [`LoopEvent`]s and performs the non-blocking work for
//! each: applying notification records to the watcher (which drives reads
//! and matching through the scanner), reaping exited actions, and polling a
//! degraded watcher. It never waits; all waiting happens in
//! [`super::runtime::Runtime`].

use std::time::Duration;

use tracing::debug;

use crate::engine::scanner::LogScanner;
use crate::engine::{CoreStep, LoopEvent, RunSummary};
use crate::exec::ProcessBackend;
use crate::watch::{DirectoryWatcher, EventRecord, NotificationBackend};

#[derive(Debug)]
pub struct CoreRuntime<B: NotificationBackend, P: ProcessBackend> {
    watcher: DirectoryWatcher<B>,
    scanner: LogScanner<P>,
}

impl<B: NotificationBackend, P: ProcessBackend> CoreRuntime<B, P> {
    pub fn new(watcher: DirectoryWatcher<B>, scanner: LogScanner<P>) -> Self {
        Self { watcher, scanner }
    }

    pub fn watcher(&self) -> &DirectoryWatcher<B> {
        &self.watcher
    }

    pub fn scanner(&self) -> &LogScanner<P> {
        &self.scanner
    }

    /// Wait for notification records; see [`NotificationBackend::wait_for_events`].
    pub async fn wait_for_events(&mut self, timeout: Duration) -> Vec<EventRecord> {
        self.watcher.wait_for_events(timeout).await
    }

    /// Handle one wake-up.
    pub fn step(&mut self, event: LoopEvent) -> CoreStep {
        match event {
            LoopEvent::Notifications(records) => {
                self.process_records(records);
                self.reap();
            }
            LoopEvent::ChildExited => {
                self.reap();
            }
            LoopEvent::Tick => {
                self.watcher.poll(&mut self.scanner);
                self.reap();
            }
            LoopEvent::ShutdownRequested => return CoreStep { keep_running: false },
        }
        CoreStep { keep_running: true }
    }

    /// Apply `records`, then keep draining until the backend queue is empty
    /// so the kernel queue cannot overflow while we were busy.
    fn process_records(&mut self, mut records: Vec<EventRecord>) {
        loop {
            records.extend(self.watcher.drain_events());
            if records.is_empty() {
                break;
            }
            debug!(count = records.len(), "processing notification records");
            self.watcher
                .process_events(std::mem::take(&mut records), &mut self.scanner);
        }
    }

    fn reap(&mut self) {
        let reaped = self.scanner.controller_mut().reap();
        if reaped > 0 {
            debug!(reaped, "reaped exited children");
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            matches: self.scanner.matches(),
            actions: self.scanner.controller().stats(),
        }
    }

    /// Release watcher resources. Running actions are left alone.
    pub fn shutdown(&mut self) -> RunSummary {
        self.watcher.shutdown();
        self.summary()
    }
}
