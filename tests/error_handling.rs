// tests/error_handling.rs

use std::io::Write;
use std::sync::Arc;

use logwatch::config::{load_and_validate, load_or_default};
use logwatch::errors::LogwatchError;
use logwatch::fs::RealFileSystem;
use logwatch::matcher::Pattern;
use logwatch::watch::{DirectoryWatcher, MockNotificationBackend, WatchState, WatchTarget};
use tempfile::{tempdir, NamedTempFile};

fn config_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn zero_chunk_size_in_config_is_rejected() {
    let f = config_file("[watch]\nchunk_size = 0\n");
    let err = load_and_validate(f.path()).unwrap_err();
    assert!(matches!(err, LogwatchError::ConfigError(_)), "{err:?}");
}

#[test]
fn malformed_toml_is_reported() {
    let f = config_file("[watch\nchunk_size = ");
    let err = load_and_validate(f.path()).unwrap_err();
    assert!(matches!(err, LogwatchError::TomlError(_)), "{err:?}");
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load_and_validate(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, LogwatchError::IoError(_)), "{err:?}");
}

#[test]
fn cli_override_is_validated_too() {
    let err = load_or_default(None, Some(0)).unwrap_err();
    assert!(matches!(err, LogwatchError::ConfigError(_)));

    let f = config_file("[watch]\nchunk_size = 64\nstart_at_end = false\n");
    let cfg = load_or_default(Some(f.path()), Some(512)).unwrap();
    assert_eq!(cfg.chunk_size(), 512);
    assert!(!cfg.start_at_end());
}

#[test]
fn empty_pattern_is_rejected() {
    assert!(matches!(
        Pattern::compile(Vec::new()),
        Err(LogwatchError::EmptyPattern)
    ));
}

#[test]
fn bare_file_name_is_an_invalid_path() {
    assert!(matches!(
        WatchTarget::parse("syslog"),
        Err(LogwatchError::InvalidPath(_))
    ));
}

#[test]
fn missing_directory_fails_setup() {
    let dir = tempdir().unwrap();
    let logpath = dir.path().join("gone").join("app.log");

    let res = DirectoryWatcher::init(
        logpath.to_str().unwrap(),
        Arc::new(RealFileSystem),
        MockNotificationBackend::new(),
        true,
    );
    assert!(matches!(res, Err(LogwatchError::DirectoryNotFound(_))));
}

#[test]
fn existing_directory_without_file_starts_waiting() {
    let dir = tempdir().unwrap();
    let logpath = dir.path().join("app.log");
    let backend = MockNotificationBackend::new();

    let watcher = DirectoryWatcher::init(
        logpath.to_str().unwrap(),
        Arc::new(RealFileSystem),
        backend.clone(),
        true,
    )
    .unwrap();

    assert_eq!(watcher.state(), WatchState::NoFile);
    assert!(backend.is_subscribed(dir.path()));
}
