//! Error types for pipeview.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions up to [`AppError`], which the binary reports.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all domain failures
//!   - [`ViewportError`] - Terminal surface and viewport operation failures
//!   - [`InputError`] - Spawned process / stdin reading failures
//!   - [`TemplateError`](crate::template::TemplateError) - Bad line format string
//!   - [`ConfigError`](crate::config::ConfigError) - Unreadable config file
//!   - [`LoggingError`](crate::logging::LoggingError) - Log file setup
//!
//! # Recovery Strategy
//!
//! Viewport operation errors (`OutOfRange`, `BufferOverflow`) are local and
//! non-fatal: state is left unchanged and the caller decides what to show.
//! `Init` and `Terminal` are fatal for the viewport; the caller must not keep
//! drawing after either. Selection moves that hit a boundary are not errors at
//! all: they return `false` and clamp.

use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to set up or drive the terminal viewport.
    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    /// Failed to read lines from the watched command or stdin.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The line format string could not be parsed.
    #[error("Invalid line format: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// The configuration file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Log file initialization failed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),
}

/// Errors reported by the viewport.
#[derive(Debug, Error)]
pub enum ViewportError {
    /// The terminal backend failed to start.
    ///
    /// **Recovery**: none. The viewport must not be used afterward.
    #[error("Failed to initialize terminal: {0}")]
    Init(#[source] std::io::Error),

    /// Writing to the terminal surface failed during a draw pass.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// A selection jump targeted a line the source does not have.
    ///
    /// **Recovery**: selection and window are unchanged.
    #[error("Line {requested} is out of range (source has {count} lines)")]
    OutOfRange {
        /// The requested ordinal.
        requested: usize,
        /// Number of lines in the source at the time of the request.
        count: usize,
    },

    /// The command line buffer is full; the character was not inserted.
    #[error("Command line is full ({capacity} characters)")]
    BufferOverflow {
        /// Maximum number of characters the buffer holds.
        capacity: usize,
    },
}

/// Errors encountered when reading lines from a command or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The command could not be started.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeview::model::error::InputError;
    ///
    /// let err = InputError::Spawn {
    ///     command: "tail".to_string(),
    ///     source: std::io::Error::from(std::io::ErrorKind::NotFound),
    /// };
    /// assert!(err.to_string().contains("tail"));
    /// ```
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        /// Program name (or shell command line).
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An empty argument vector was given as a command.
    #[error("No command given")]
    EmptyCommand,

    /// No command given and stdin is an interactive terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeview::model::error::InputError;
    ///
    /// let msg = InputError::NoInput.to_string();
    /// assert!(msg.contains("pipe data to stdin"));
    /// ```
    #[error("No input source: provide a command or pipe data to stdin")]
    NoInput,

    /// Generic I/O error on the pipe.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
