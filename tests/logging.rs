//! Logging setup tests
//!
//! Each integration test file is its own process, so installing the global
//! subscriber here does not leak into other test binaries.

use std::fs;

use outline_model::logging::{self, LoggingError};

#[test]
fn test_file_layer_writes_rolling_log() {
    let dir = tempfile::tempdir().unwrap();
    let subscriber = logging::subscriber(Some(dir.path())).unwrap();

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!(target: "outline_model::outline", "outline updated for logging test");
    });

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "Expected one rolling log file: {:?}", entries);

    let name = entries[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("outline"), "Unexpected log file name: {}", name);
    assert!(name.ends_with(".log"), "Unexpected log file name: {}", name);

    let content = fs::read_to_string(&entries[0]).unwrap();
    assert!(content.contains("outline updated for logging test"));
}

#[test]
fn test_subscriber_without_logs_dir_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let subscriber = logging::subscriber(None).unwrap();

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("console only");
    });

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_logs_dir_parent_is_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let result = logging::subscriber(Some(&blocker.join("logs")));
    assert!(matches!(result, Err(LoggingError::FileError(_))));
}

#[test]
fn test_try_init_twice_reports_already_initialized() {
    let dir = tempfile::tempdir().unwrap();

    logging::try_init(Some(dir.path())).unwrap();
    let second = logging::try_init(Some(dir.path()));
    assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
}
