// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LogwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LogwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.chunk_size == 0 {
        return Err(LogwatchError::ConfigError(
            "[watch].chunk_size must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.watch.reap_interval_ms == 0 {
        return Err(LogwatchError::ConfigError(
            "[watch].reap_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

/// Whether a pattern of `pattern_len` bytes can match at all with the
/// configured chunk size. Longer patterns never match; callers only warn.
pub fn pattern_fits_window(cfg: &ConfigFile, pattern_len: usize) -> bool {
    pattern_len <= cfg.chunk_size()
}
