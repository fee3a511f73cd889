// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the production
//!   `TokioProcessBackend` built on `tokio::process::Command`. Tests can
//!   replace it with a fake implementation.
//! - [`controller`] owns the single-flight gate deciding whether a match
//!   starts the configured command or is suppressed.

pub mod backend;
pub mod controller;

pub use backend::{ActionExit, ProcessBackend, ProcessId, TokioProcessBackend};
pub use controller::{ActionController, ActionOutcome, ActionStats};
