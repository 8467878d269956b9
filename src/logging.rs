//! Tracing setup for hosts embedding the outline
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=outline_model::outline=debug` - fetch cycle logging only
//!
//! # Log Files
//!
//! [`init`] writes to `~/.config/outline-model/logs/outline.<date>.log`,
//! rotated daily, at debug level regardless of RUST_LOG.

use std::fmt;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt as layers, layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "outline";
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
pub enum LoggingError {
    /// The rolling log file could not be created
    FileError(String),
    /// A global subscriber is already installed
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::FileError(e) => write!(f, "Log file error: {}", e),
            LoggingError::AlreadyInitialized(e) => write!(f, "Logging already initialized: {}", e),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Build the outline subscriber without installing it.
///
/// Console output is filtered by RUST_LOG (default `warn`). With a
/// `logs_dir`, debug-level events also go to a daily-rotated file there.
pub fn subscriber(
    logs_dir: Option<&Path>,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = layers::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match logs_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(dir)
                .map_err(|e| LoggingError::FileError(format!("{}: {}", dir.display(), e)))?;
            Some(
                layers::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer))
}

/// Install the outline subscriber globally
pub fn try_init(logs_dir: Option<&Path>) -> Result<(), LoggingError> {
    subscriber(logs_dir)?
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Install console and file logging under the user config dir.
///
/// Falls back to console only when the logs dir is unavailable, and warns
/// on stderr instead of failing.
pub fn init() {
    let logs_dir = match crate::config_paths::ensure_logs_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    if let Err(e) = try_init(logs_dir.as_deref()) {
        eprintln!("Warning: {}", e);
    }
}
