// src/matcher/search.rs

//! Resumable bad-character scan over a `(head, tail)` window.

use super::pattern::Pattern;

/// Per-stream scan state.
///
/// `resume_skip` is the number of leading bytes of the *next* head that are
/// already known not to end a match. It is only meaningful for the stream it
/// was computed on; reset it whenever that stream restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    resume_skip: usize,
    inspected: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume_skip(&self) -> usize {
        self.resume_skip
    }

    /// Total head bytes looked up in the skip table since the last reset.
    pub fn inspected(&self) -> u64 {
        self.inspected
    }

    pub fn reset(&mut self) {
        self.resume_skip = 0;
        self.inspected = 0;
    }
}

/// Scan `head` for a needle ending at or after index `start`.
///
/// On a match, returns the index in `head` where the needle ends and leaves
/// `state` untouched; call again with `start = pos + 1` to continue the same
/// window. Overlapping matches are reported. When the scan runs off the end
/// of `head`, the overshoot is carried into `state` for the next window.
pub fn search(
    pattern: &Pattern,
    state: &mut SearchState,
    head: &[u8],
    tail: &[u8],
    start: usize,
) -> Option<usize> {
    if head.len() < state.resume_skip {
        state.resume_skip -= head.len();
        return None;
    }

    let mut i = start.max(state.resume_skip);
    while i < head.len() {
        state.inspected += 1;
        match pattern.lookup_skip(head[i]) {
            0 => {
                if pattern.match_ends_at(i, head, tail) {
                    return Some(i);
                }
                i += 1;
            }
            skip => i += skip,
        }
    }

    state.resume_skip = i - head.len();
    None
}

/// A compiled [`Pattern`] bound to the [`SearchState`] of one logical stream.
#[derive(Debug, Clone)]
pub struct StreamMatcher {
    pattern: Pattern,
    state: SearchState,
}

impl StreamMatcher {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            state: SearchState::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// See [`search`].
    pub fn search(&mut self, head: &[u8], tail: &[u8], start: usize) -> Option<usize> {
        search(&self.pattern, &mut self.state, head, tail, start)
    }

    /// Every match end index in `head`, continuing after each hit.
    pub fn search_all(&mut self, head: &[u8], tail: &[u8]) -> Vec<usize> {
        let mut hits = Vec::new();
        let mut start = 0;
        while let Some(end) = self.search(head, tail, start) {
            hits.push(end);
            start = end + 1;
        }
        hits
    }

    /// Forget the carried skip; the stream is discontinuous from here on.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(needle: &str) -> StreamMatcher {
        StreamMatcher::new(Pattern::compile(needle).unwrap())
    }

    #[test]
    fn error_split_across_two_reads() {
        let mut m = matcher("ERROR");

        assert_eq!(m.search(b"12345ERR", b"", 0), None);
        assert_ne!(m.state().resume_skip(), 0);

        let end = m.search(b"OR67", b"12345ERR", 0);
        assert_eq!(end, Some(1));
        // absolute offset = bytes before head + index in head
        assert_eq!(8 + end.unwrap(), 9);
    }

    #[test]
    fn match_does_not_touch_resume_skip() {
        let mut m = matcher("ab");
        assert_eq!(m.search(b"xxab", b"", 0), Some(3));
        assert_eq!(m.state().resume_skip(), 0);
    }

    #[test]
    fn overlapping_matches_are_all_reported() {
        let mut m = matcher("aa");
        assert_eq!(m.search_all(b"aaaa", b""), vec![1, 2, 3]);
    }

    #[test]
    fn overlapping_match_across_boundary() {
        let mut m = matcher("aba");
        assert_eq!(m.search_all(b"xxab", b""), Vec::<usize>::new());
        assert_eq!(m.search_all(b"aba", b"xxab"), vec![0, 2]);
    }

    #[test]
    fn short_head_consumes_resume_skip() {
        let mut m = matcher("abcdefgh");
        assert_eq!(m.search(b"zzzzzzzzz", b"", 0), None);
        let carried = m.state().resume_skip();
        assert_eq!(carried, 7);

        assert_eq!(m.search(b"zz", b"zzzzzzzzz", 0), None);
        assert_eq!(m.state().resume_skip(), carried - 2);
    }

    #[test]
    fn reset_clears_carried_skip() {
        let mut m = matcher("ERROR");
        m.search(b"12345ERR", b"", 0);
        m.reset();
        assert_eq!(m.state().resume_skip(), 0);
        assert_eq!(m.state().inspected(), 0);
    }

    #[test]
    fn continuation_past_end_of_head_is_harmless() {
        let mut m = matcher("ab");
        assert_eq!(m.search(b"ab", b"", 0), Some(1));
        assert_eq!(m.search(b"ab", b"", 2), None);
        assert_eq!(m.state().resume_skip(), 0);
    }
}
