#![allow(dead_code)]

pub use logwatch_test_utils::{init_tracing, with_timeout};

use logwatch::matcher::{ChunkWindow, Pattern, StreamMatcher};

/// Feed `chunks` through a window + matcher the way the scanner does and
/// return the absolute end offset of every match.
pub fn stream_matches(needle: &[u8], chunks: &[&[u8]]) -> (Vec<u64>, StreamMatcher) {
    let max = chunks.iter().map(|c| c.len()).max().unwrap_or(1).max(1);
    let mut window = ChunkWindow::new(max);
    let mut matcher = StreamMatcher::new(Pattern::compile(needle).unwrap());
    let mut base = 0u64;
    let mut hits = Vec::new();

    for chunk in chunks {
        window.load_head(chunk);
        for end in matcher.search_all(window.head(), window.tail()) {
            hits.push(base + end as u64);
        }
        base += chunk.len() as u64;
        window.rotate();
    }

    (hits, matcher)
}

/// Split `stream` at the given chunk sizes (the last chunk takes the rest).
pub fn split<'a>(stream: &'a [u8], sizes: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = stream;
    for &size in sizes {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// End offsets of every (possibly overlapping) occurrence, found naively.
pub fn naive_matches(needle: &[u8], stream: &[u8]) -> Vec<u64> {
    stream
        .windows(needle.len())
        .enumerate()
        .filter(|(_, w)| *w == needle)
        .map(|(i, _)| (i + needle.len() - 1) as u64)
        .collect()
}
