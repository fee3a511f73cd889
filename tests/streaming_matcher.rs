// tests/streaming_matcher.rs

mod common;
use crate::common::{naive_matches, split, stream_matches};

use proptest::prelude::*;

#[test]
fn error_split_after_err_is_found_at_offset_nine() {
    let (hits, _) = stream_matches(b"ERROR", &[b"12345ERR", b"OR67"]);
    assert_eq!(hits, vec![9]);
}

#[test]
fn every_boundary_position_is_covered() {
    let needle = b"needle!";
    let mut stream = b"haystack haystack ".to_vec();
    let at = stream.len();
    stream.extend_from_slice(needle);
    stream.extend_from_slice(b" more hay");
    let expected = (at + needle.len() - 1) as u64;

    // First k bytes of the needle land in one chunk, the rest in the next.
    for k in 0..=needle.len() {
        let cut = at + k;
        let chunks = [&stream[..cut], &stream[cut..]];
        let (hits, _) = stream_matches(needle, &chunks);
        assert_eq!(hits, vec![expected], "split after {k} needle bytes");
    }
}

#[test]
fn pattern_longer_than_window_never_matches() {
    // Needle needs 6 bytes; head + tail only ever hold 2 + 2.
    let stream = b"xxABCDEFxx";
    let chunks = split(stream, &[2; 5]);
    let (hits, _) = stream_matches(b"ABCDEF", &chunks);
    assert!(hits.is_empty());
}

#[test]
fn resume_skip_bounds_total_work() {
    let mut stream = Vec::new();
    for i in 0..2000u32 {
        stream.extend_from_slice(format!("line {i}: all good here\n").as_bytes());
        if i % 500 == 0 {
            stream.extend_from_slice(b"ERROR something broke\n");
        }
    }

    for chunk in [5usize, 8, 13, 64, 256] {
        let chunks = split(&stream, &vec![chunk; stream.len() / chunk + 1]);
        let (hits, matcher) = stream_matches(b"ERROR", &chunks);
        assert_eq!(hits, naive_matches(b"ERROR", &stream));
        assert!(
            matcher.state().inspected() <= stream.len() as u64,
            "chunk {chunk}: inspected {} of {} bytes",
            matcher.state().inspected(),
            stream.len()
        );
    }
}

fn stream_with_chunks(
    alphabet: &'static [u8],
    min_chunk: usize,
) -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    (
        proptest::collection::vec(proptest::sample::select(alphabet), 0..300),
        proptest::collection::vec(min_chunk..min_chunk * 3 + 4, 1..120),
    )
}

proptest! {
    #[test]
    fn split_invariance(
        (noise, sizes) in stream_with_chunks(b"ERO x\n", 5),
        at in 0usize..300,
    ) {
        let needle = b"ERROR";
        let at = at.min(noise.len());
        let mut stream = noise[..at].to_vec();
        stream.extend_from_slice(needle);
        stream.extend_from_slice(&noise[at..]);

        let chunks = split(&stream, &sizes);
        let (hits, _) = stream_matches(needle, &chunks);

        prop_assert!(hits.contains(&((at + needle.len() - 1) as u64)));
        prop_assert_eq!(hits, naive_matches(needle, &stream));
    }

    #[test]
    fn no_false_positives(
        (stream, sizes) in stream_with_chunks(b"ERO x\n", 5),
    ) {
        let needle = b"ERROR";
        prop_assume!(naive_matches(needle, &stream).is_empty());

        let chunks = split(&stream, &sizes);
        let (hits, _) = stream_matches(needle, &chunks);
        prop_assert!(hits.is_empty());
    }

    #[test]
    fn overlapping_needles_match_naive_search(
        (stream, sizes) in stream_with_chunks(b"ab", 3),
    ) {
        let needle = b"aba";
        let chunks = split(&stream, &sizes);
        let (hits, _) = stream_matches(needle, &chunks);
        prop_assert_eq!(hits, naive_matches(needle, &stream));
    }
}
