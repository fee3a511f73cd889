// src/matcher/mod.rs

//! Streaming exact-pattern matching.
//!
//! A log is read in bounded chunks, so a pattern occurrence can straddle two
//! reads. The matcher scans the most recent chunk (`head`) while consulting
//! the one before it (`tail`) for the part of a candidate match that spilled
//! over the boundary. A carried skip count lets a scan that ran off the end
//! of one chunk resume at the right byte of the next, so nothing already
//! ruled out gets re-inspected.
//!
//! - [`pattern`] compiles the needle and its bad-character skip table.
//! - [`search`] holds the resumable scan and its per-stream state.
//! - [`window`] is the two-slot buffer the caller reads into.

pub mod pattern;
pub mod search;
pub mod window;

pub use pattern::Pattern;
pub use search::{SearchState, StreamMatcher};
pub use window::ChunkWindow;
