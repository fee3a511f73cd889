use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use logwatch::exec::{ActionExit, ProcessBackend, ProcessId};

#[derive(Debug, Default)]
struct FakeState {
    next_pid: u32,
    spawned: Vec<(ProcessId, PathBuf)>,
    running: Vec<ProcessId>,
    exited: VecDeque<(ProcessId, ActionExit)>,
    fail_spawns: bool,
}

/// A fake process backend that:
/// - records every spawned command and hands out sequential pids
/// - keeps each "process" running until the test calls [`FakeProcessBackend::finish`]
///
/// Clones share state, so the test keeps one handle while the controller
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeProcessBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent spawn fail (or succeed again).
    pub fn set_fail_spawns(&self, fail: bool) {
        self.state.lock().unwrap().fail_spawns = fail;
    }

    /// Mark `pid` as exited; it shows up on the next `poll_exited`.
    pub fn finish(&self, pid: ProcessId, exit: ActionExit) {
        let mut state = self.state.lock().unwrap();
        state.running.retain(|p| *p != pid);
        state.exited.push_back((pid, exit));
    }

    /// Finish every running process successfully.
    pub fn finish_all(&self) {
        let running: Vec<ProcessId> = self.state.lock().unwrap().running.clone();
        for pid in running {
            self.finish(pid, ActionExit::Success);
        }
    }

    pub fn spawned(&self) -> Vec<(ProcessId, PathBuf)> {
        self.state.lock().unwrap().spawned.clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.state.lock().unwrap().spawned.len()
    }

    pub fn running(&self) -> Vec<ProcessId> {
        self.state.lock().unwrap().running.clone()
    }
}

impl ProcessBackend for FakeProcessBackend {
    fn spawn(&mut self, command: &Path) -> io::Result<ProcessId> {
        let mut state = self.state.lock().unwrap();
        if state.fail_spawns {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("fake spawn failure for {:?}", command),
            ));
        }
        state.next_pid += 1;
        let pid = ProcessId(1000 + state.next_pid);
        state.spawned.push((pid, command.to_path_buf()));
        state.running.push(pid);
        Ok(pid)
    }

    fn poll_exited(&mut self) -> Vec<(ProcessId, ActionExit)> {
        self.state.lock().unwrap().exited.drain(..).collect()
    }
}
