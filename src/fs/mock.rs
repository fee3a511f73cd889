// src/fs/mock.rs

//! In-memory filesystem for watcher tests.
//!
//! File contents are shared between the directory entry and every open
//! handle, so appends are visible to readers. Removing an entry only unlinks
//! it: handles opened before the removal keep reading the old contents, the
//! same way an unlinked file behaves on unix.

use super::{FileSystem, LogFile};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Contents = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, Default)]
struct MockState {
    dirs: HashSet<PathBuf>,
    files: HashMap<PathBuf, Contents>,
    unreadable: HashSet<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.dirs.insert(path.as_ref().to_path_buf());
    }

    /// Create (or truncate) a file with the given contents.
    pub fn create_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            state.dirs.insert(parent.to_path_buf());
        }
        state
            .files
            .insert(path, Arc::new(Mutex::new(content.into())));
    }

    /// Append to an existing file. Returns false if the file does not exist.
    pub fn append(&self, path: impl AsRef<Path>, bytes: &[u8]) -> bool {
        let state = self.state.lock().unwrap();
        match state.files.get(path.as_ref()) {
            Some(contents) => {
                contents.lock().unwrap().extend_from_slice(bytes);
                true
            }
            None => false,
        }
    }

    /// Unlink a file. Open handles keep their contents.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.files.remove(path.as_ref());
    }

    /// Make `open_log` fail for `path` even if it exists.
    pub fn set_unreadable(&self, path: impl AsRef<Path>, unreadable: bool) {
        let mut state = self.state.lock().unwrap();
        let path = path.as_ref().to_path_buf();
        if unreadable {
            state.unreadable.insert(path);
        } else {
            state.unreadable.remove(&path);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.contains(path)
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.contains(path) || state.files.contains_key(path)
    }

    fn open_log(&self, path: &Path) -> Result<Box<dyn LogFile>> {
        let state = self.state.lock().unwrap();
        if state.unreadable.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match state.files.get(path) {
            Some(contents) => Ok(Box::new(MockLogFile {
                contents: Arc::clone(contents),
                offset: 0,
            })),
            None if state.dirs.contains(path) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

#[derive(Debug)]
struct MockLogFile {
    contents: Contents,
    offset: u64,
}

impl LogFile for MockLogFile {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let contents = self.contents.lock().unwrap();
        let start = (self.offset as usize).min(contents.len());
        let n = (contents.len() - start).min(buf.len());
        buf[..n].copy_from_slice(&contents[start..start + n]);
        self.offset += n as u64;
        Ok(n)
    }

    fn seek_to_end(&mut self) -> Result<u64> {
        self.offset = self.contents.lock().unwrap().len() as u64;
        Ok(self.offset)
    }

    fn offset(&self) -> u64 {
        self.offset
    }
}
