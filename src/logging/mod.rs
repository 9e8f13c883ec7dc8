//! Tracing subscriber initialization.
//!
//! The viewport owns the terminal, so logs always go to a file. Follow them
//! with `tail -f` from another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no UTF-8 filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Initialize the global tracing subscriber, writing to `log_path`.
///
/// Respects `RUST_LOG`, defaulting to [`DEFAULT_FILTER`]. Creates the log
/// directory if it doesn't exist.
///
/// # Errors
///
/// Returns `LoggingError` if the directory cannot be created, the path has
/// no file name, or a global subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let writer = file_writer(log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

/// `RUST_LOG` if set and valid, else [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// A non-rotating appender for `log_path`, creating its directory.
///
/// # Errors
///
/// Returns `LoggingError` if the directory cannot be created or the path has
/// no file name.
pub fn file_writer(log_path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    // A bare file name has an empty parent: log next to the working directory.
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    Ok(tracing_appender::rolling::never(directory, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn file_writer_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("pipeview_test_logs_create");
        let _ = fs::remove_dir_all(&test_dir);

        file_writer(&test_dir.join("nested").join("test.log")).unwrap();

        assert!(test_dir.join("nested").is_dir());
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn file_writer_rejects_path_without_file_name() {
        let err = file_writer(Path::new("/")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidPath(_)));
    }

    #[test]
    fn events_are_written_to_the_file() {
        let test_dir = std::env::temp_dir().join("pipeview_test_logs_write");
        let _ = fs::remove_dir_all(&test_dir);
        let log_file = test_dir.join("app.log");

        let subscriber = tracing_subscriber::fmt()
            .with_writer(file_writer(&log_file).unwrap())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 3, "source grew");
        });

        let contents = fs::read_to_string(&log_file).unwrap();
        assert!(contents.contains("source grew"), "got: {}", contents);
        assert!(contents.contains("count=3"), "got: {}", contents);
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_even_if_subscriber_is_set() {
        let test_dir = std::env::temp_dir().join("pipeview_test_logs_init");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail if another test installed the global subscriber first.
        let _ = init(&test_dir.join("init.log"));

        assert!(test_dir.exists(), "Log directory should be created: {:?}", test_dir);
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let test_dir = std::env::temp_dir().join("pipeview_test_logs_twice");
        let log_file = test_dir.join("twice.log");

        let _ = init(&log_file);
        let err = init(&log_file).unwrap_err();

        assert!(matches!(err, LoggingError::SubscriberAlreadySet));
        let _ = fs::remove_dir_all(&test_dir);
    }
}
