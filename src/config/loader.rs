// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `path` if given, otherwise fall back to built-in defaults, then apply
/// a CLI `--chunk-size` override and re-validate.
pub fn load_or_default(
    path: Option<&Path>,
    chunk_size_override: Option<usize>,
) -> Result<ConfigFile> {
    let mut raw = match path {
        Some(p) => load_from_path(p)?,
        None => RawConfigFile::default(),
    };

    if let Some(chunk_size) = chunk_size_override {
        raw.watch.chunk_size = chunk_size;
    }

    ConfigFile::try_from(raw)
}
