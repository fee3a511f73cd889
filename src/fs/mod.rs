// src/fs/mod.rs

//! Byte source for the watched log.
//!
//! The watcher opens files through a [`FileSystem`] and hands the
//! resulting [`LogFile`] to its read callback. Reads never block: a read
//! returning `0` means "nothing more right now", not end of stream.

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface used by the directory watcher.
pub trait FileSystem: Send + Sync + Debug {
    fn is_dir(&self, path: &Path) -> bool;
    fn exists(&self, path: &Path) -> bool;

    /// Open `path` read-only, positioned at offset 0.
    fn open_log(&self, path: &Path) -> Result<Box<dyn LogFile>>;
}

/// An open handle on the watched log, positioned at the next unread byte.
pub trait LogFile: Send + Debug {
    /// Read up to `buf.len()` bytes at the current offset and advance it.
    ///
    /// `Ok(0)` means no bytes are available at the moment.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Move to end of file, returning the new offset.
    fn seek_to_end(&mut self) -> Result<u64>;

    /// Offset of the next byte to be read.
    fn offset(&self) -> u64;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn open_log(&self, path: &Path) -> Result<Box<dyn LogFile>> {
        let file = fs::File::open(path).with_context(|| format!("opening log {:?}", path))?;
        Ok(Box::new(RealLogFile { file, offset: 0 }))
    }
}

#[derive(Debug)]
struct RealLogFile {
    file: fs::File,
    offset: u64,
}

impl LogFile for RealLogFile {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.file.read(buf) {
                Ok(n) => {
                    self.offset += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(0),
                Err(e) => return Err(e).context("reading log"),
            }
        }
    }

    fn seek_to_end(&mut self) -> Result<u64> {
        self.offset = self.file.seek(SeekFrom::End(0)).context("seeking log to end")?;
        Ok(self.offset)
    }

    fn offset(&self) -> u64 {
        self.offset
    }
}
