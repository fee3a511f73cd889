// src/matcher/window.rs

use anyhow::Result;

use crate::fs::LogFile;

/// Two fixed-size read buffers whose roles alternate.
///
/// `head` is the slot the next read lands in; `tail` holds the previous read.
/// After scanning a freshly filled head, call [`ChunkWindow::rotate`] so it
/// becomes the tail for the next read.
#[derive(Debug, Clone)]
pub struct ChunkWindow {
    slots: [Vec<u8>; 2],
    lens: [usize; 2],
    head: usize,
}

impl ChunkWindow {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            slots: [vec![0u8; chunk_size], vec![0u8; chunk_size]],
            lens: [0, 0],
            head: 0,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.slots[0].len()
    }

    fn tail_slot(&self) -> usize {
        self.head ^ 1
    }

    /// Bytes of the most recent read.
    pub fn head(&self) -> &[u8] {
        &self.slots[self.head][..self.lens[self.head]]
    }

    /// Bytes of the read before that.
    pub fn tail(&self) -> &[u8] {
        let t = self.tail_slot();
        &self.slots[t][..self.lens[t]]
    }

    /// Read the next chunk from `file` into the head slot.
    ///
    /// Returns the number of bytes read; `0` leaves the window as it was.
    pub fn fill_head(&mut self, file: &mut dyn LogFile) -> Result<usize> {
        let n = file.read_chunk(&mut self.slots[self.head])?;
        if n > 0 {
            self.lens[self.head] = n;
        }
        Ok(n)
    }

    /// Load `bytes` into the head slot directly. Panics if longer than a chunk.
    pub fn load_head(&mut self, bytes: &[u8]) {
        self.slots[self.head][..bytes.len()].copy_from_slice(bytes);
        self.lens[self.head] = bytes.len();
    }

    /// Swap roles: the current head becomes the tail.
    pub fn rotate(&mut self) {
        self.head = self.tail_slot();
        self.lens[self.head] = 0;
    }

    /// Drop both chunks, e.g. after the underlying file was replaced.
    pub fn clear(&mut self) {
        self.lens = [0, 0];
    }
}
