// src/engine/scanner.rs

//! Read callback: drains the log into the chunk window, runs the matcher
//! over each new chunk, and hands matches to the action controller.

use tracing::{debug, warn};

use crate::exec::{ActionController, ProcessBackend};
use crate::fs::LogFile;
use crate::matcher::{ChunkWindow, StreamMatcher};
use crate::watch::LogSink;

#[derive(Debug)]
pub struct LogScanner<P: ProcessBackend> {
    matcher: StreamMatcher,
    window: ChunkWindow,
    controller: ActionController<P>,
    matches: u64,
    last_match_offset: Option<u64>,
}

impl<P: ProcessBackend> LogScanner<P> {
    pub fn new(matcher: StreamMatcher, chunk_size: usize, controller: ActionController<P>) -> Self {
        Self {
            matcher,
            window: ChunkWindow::new(chunk_size),
            controller,
            matches: 0,
            last_match_offset: None,
        }
    }

    pub fn matcher(&self) -> &StreamMatcher {
        &self.matcher
    }

    pub fn controller(&self) -> &ActionController<P> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ActionController<P> {
        &mut self.controller
    }

    /// Matches seen since startup, suppressed ones included.
    pub fn matches(&self) -> u64 {
        self.matches
    }

    /// File offset of the last byte of the most recent match.
    pub fn last_match_offset(&self) -> Option<u64> {
        self.last_match_offset
    }

    fn scan_head(&mut self, base: u64) {
        // A needle wider than one read is never reported, even when it
        // happens to fit in head + tail.
        if self.matcher.pattern().len() > self.window.chunk_size() {
            return;
        }

        let mut start = 0;
        while let Some(end) = self.matcher.search(self.window.head(), self.window.tail(), start) {
            let offset = base + end as u64;
            self.matches += 1;
            self.last_match_offset = Some(offset);
            debug!(offset, "pattern matched");

            self.controller.on_match();
            start = end + 1;
        }
    }
}

impl<P: ProcessBackend> LogSink for LogScanner<P> {
    fn on_reopen(&mut self) {
        self.matcher.reset();
        self.window.clear();
    }

    fn on_readable(&mut self, file: &mut dyn LogFile) {
        loop {
            let base = file.offset();
            match self.window.fill_head(file) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    // Typically the log vanished under us mid-rotation.
                    warn!(error = %err, "log read failed");
                    break;
                }
            }

            self.scan_head(base);
            self.window.rotate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ActionExit, ProcessId};
    use crate::fs::mock::MockFileSystem;
    use crate::fs::FileSystem;
    use crate::matcher::Pattern;
    use std::io;
    use std::path::Path;

    #[derive(Debug, Default)]
    struct Counting {
        spawned: u32,
    }

    impl ProcessBackend for Counting {
        fn spawn(&mut self, _command: &Path) -> io::Result<ProcessId> {
            self.spawned += 1;
            Ok(ProcessId(self.spawned))
        }

        fn poll_exited(&mut self) -> Vec<(ProcessId, ActionExit)> {
            Vec::new()
        }
    }

    fn scanner(needle: &str, chunk: usize) -> LogScanner<Counting> {
        LogScanner::new(
            StreamMatcher::new(Pattern::compile(needle).unwrap()),
            chunk,
            ActionController::new("/bin/alert", Counting::default()),
        )
    }

    #[test]
    fn reports_absolute_offset_across_chunks() {
        let fs = MockFileSystem::new();
        fs.create_file("/l/a.log", b"12345ERROR67");
        let mut file = fs.open_log(Path::new("/l/a.log")).unwrap();

        let mut s = scanner("ERROR", 8);
        s.on_readable(file.as_mut());

        assert_eq!(s.matches(), 1);
        assert_eq!(s.last_match_offset(), Some(9));
        assert_eq!(s.controller().backend().spawned, 1);
    }

    #[test]
    fn burst_of_matches_spawns_once() {
        let fs = MockFileSystem::new();
        fs.create_file("/l/a.log", b"ERROR ERROR ERROR");
        let mut file = fs.open_log(Path::new("/l/a.log")).unwrap();

        let mut s = scanner("ERROR", 4);
        s.on_readable(file.as_mut());

        assert_eq!(s.matches(), 3);
        assert_eq!(s.controller().stats().spawned, 1);
        assert_eq!(s.controller().stats().suppressed, 2);
    }

    #[test]
    fn pattern_wider_than_chunk_never_matches() {
        let fs = MockFileSystem::new();
        fs.create_file("/l/a.log", b"ERRORERROR");
        let mut file = fs.open_log(Path::new("/l/a.log")).unwrap();

        let mut s = scanner("ERROR", 4);
        s.on_readable(file.as_mut());

        assert_eq!(s.matches(), 0);
        assert_eq!(file.offset(), 10);
    }

    #[test]
    fn reopen_forgets_previous_stream() {
        let fs = MockFileSystem::new();
        fs.create_file("/l/a.log", b"xxERR");
        let mut old = fs.open_log(Path::new("/l/a.log")).unwrap();

        let mut s = scanner("ERROR", 8);
        s.on_readable(old.as_mut());

        // The new file starts with the rest of the pattern; it must not be
        // glued onto the old file's tail.
        fs.create_file("/l/a.log", b"OR and more");
        let mut new = fs.open_log(Path::new("/l/a.log")).unwrap();
        s.on_reopen();
        s.on_readable(new.as_mut());

        assert_eq!(s.matches(), 0);
    }
}
