// src/matcher/pattern.rs

use crate::errors::{LogwatchError, Result};

/// A compiled needle with its bad-character skip table.
///
/// The table only covers `[min_byte, max_byte]`; any byte outside that range
/// cannot occur in the needle and skips the full needle length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    needle: Vec<u8>,
    min_byte: u8,
    max_byte: u8,
    skip: Vec<usize>,
}

impl Pattern {
    /// Compile `needle`. Fails with [`LogwatchError::EmptyPattern`] if empty.
    pub fn compile(needle: impl Into<Vec<u8>>) -> Result<Self> {
        let needle = needle.into();
        let len = needle.len();

        let (Some(&min_byte), Some(&max_byte)) = (needle.iter().min(), needle.iter().max())
        else {
            return Err(LogwatchError::EmptyPattern);
        };

        let range = usize::from(max_byte - min_byte) + 1;
        let mut skip = vec![len; range];

        // Later occurrences overwrite earlier ones: rightmost wins.
        for (i, &b) in needle.iter().enumerate() {
            skip[usize::from(b - min_byte)] = len - i - 1;
        }

        Ok(Self {
            needle,
            min_byte,
            max_byte,
            skip,
        })
    }

    pub fn len(&self) -> usize {
        self.needle.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.needle
    }

    pub fn min_byte(&self) -> u8 {
        self.min_byte
    }

    pub fn max_byte(&self) -> u8 {
        self.max_byte
    }

    /// Distance from `byte`'s rightmost occurrence to the end of the needle,
    /// or the needle length if it does not occur.
    pub fn lookup_skip(&self, byte: u8) -> usize {
        if (self.min_byte..=self.max_byte).contains(&byte) {
            self.skip[usize::from(byte - self.min_byte)]
        } else {
            self.needle.len()
        }
    }

    /// Whether a full needle ends at `end_pos` of `head`, where `tail` holds
    /// the bytes immediately preceding `head` in the stream.
    ///
    /// Returns false when `head[..=end_pos]` plus `tail` is shorter than the
    /// needle; that is "not enough data", not an error.
    pub fn match_ends_at(&self, end_pos: usize, head: &[u8], tail: &[u8]) -> bool {
        let n = self.needle.len();
        if end_pos >= head.len() || n > end_pos + 1 + tail.len() {
            return false;
        }

        let eos = end_pos + 1;
        if eos >= n {
            return head[eos - n..eos] == self.needle[..];
        }

        // Needle straddles the boundary: trailing `eos` bytes live in head,
        // the leading `left` bytes at the end of tail.
        let left = n - eos;
        head[..eos] == self.needle[left..] && tail[tail.len() - left..] == self.needle[..left]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_fails_to_compile() {
        assert!(matches!(
            Pattern::compile(Vec::new()),
            Err(LogwatchError::EmptyPattern)
        ));
    }

    #[test]
    fn skip_table_uses_rightmost_occurrence() {
        let p = Pattern::compile("ERROR").unwrap();
        assert_eq!(p.min_byte(), b'E');
        assert_eq!(p.max_byte(), b'R');
        assert_eq!(p.lookup_skip(b'R'), 0);
        assert_eq!(p.lookup_skip(b'O'), 1);
        assert_eq!(p.lookup_skip(b'E'), 4);
        // inside [min, max] but absent
        assert_eq!(p.lookup_skip(b'F'), 5);
        // outside the range
        assert_eq!(p.lookup_skip(b'a'), 5);
        assert_eq!(p.lookup_skip(b'1'), 5);
    }

    #[test]
    fn single_byte_pattern() {
        let p = Pattern::compile("x").unwrap();
        assert_eq!(p.lookup_skip(b'x'), 0);
        assert_eq!(p.lookup_skip(b'y'), 1);
        assert!(p.match_ends_at(0, b"x", b""));
    }

    #[test]
    fn match_entirely_in_head() {
        let p = Pattern::compile("ERROR").unwrap();
        assert!(p.match_ends_at(9, b"12345ERROR67", b""));
        assert!(!p.match_ends_at(8, b"12345ERROR67", b""));
    }

    #[test]
    fn match_straddling_boundary() {
        let p = Pattern::compile("ERROR").unwrap();
        assert!(p.match_ends_at(1, b"OR67", b"12345ERR"));
        assert!(!p.match_ends_at(1, b"OR67", b"12345EXR"));
        assert!(!p.match_ends_at(1, b"XR67", b"12345ERR"));
    }

    #[test]
    fn not_enough_data_is_no_match() {
        let p = Pattern::compile("ERROR").unwrap();
        assert!(!p.match_ends_at(1, b"OR", b"R"));
        assert!(!p.match_ends_at(10, b"OR", b"12345ERR"));
    }
}
