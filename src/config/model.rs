// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Default bytes per read from the watched log.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Default fallback interval for polling exited actions.
pub const DEFAULT_REAP_INTERVAL_MS: u64 = 1000;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// chunk_size = 256
/// reap_interval_ms = 1000
/// start_at_end = true
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Bytes read from the log per read call. A match may straddle one read
    /// boundary but never two.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// How often the event loop polls for exited actions when no child
    /// notification arrives.
    #[serde(default = "default_reap_interval_ms")]
    pub reap_interval_ms: u64,

    /// Skip whatever the log already contains when the watcher starts.
    #[serde(default = "default_start_at_end")]
    pub start_at_end: bool,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_reap_interval_ms() -> u64 {
    DEFAULT_REAP_INTERVAL_MS
}

fn default_start_at_end() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            reap_interval_ms: default_reap_interval_ms(),
            start_at_end: default_start_at_end(),
        }
    }
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`)
/// or [`ConfigFile::default`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection) -> Self {
        Self { watch }
    }

    pub fn chunk_size(&self) -> usize {
        self.watch.chunk_size
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_millis(self.watch.reap_interval_ms)
    }

    pub fn start_at_end(&self) -> bool {
        self.watch.start_at_end
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(WatchSection::default())
    }
}
