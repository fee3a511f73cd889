// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("pattern must contain at least one byte")]
    EmptyPattern,

    #[error("Invalid path {0} (must contain a directory component)")]
    InvalidPath(String),

    #[error("directory {0:?} not accessible")]
    DirectoryNotFound(PathBuf),

    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("notification subsystem error: {0}")]
    Notify(#[from] notify::Error),

    #[error("failed to subscribe to {path:?}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LogwatchError>;
