//! Stdin-based line source for piped input.
//!
//! Provides StdinSource for reading lines from stdin with support for
//! both streaming (live) and complete (EOF reached) modes.

use super::LineReader;
use crate::model::error::InputError;
use std::io::{IsTerminal, Read};

/// Stdin source for piped input.
///
/// Supports both streaming mode (data arriving incrementally, like
/// `tail -f log | pipeview`) and complete mode (EOF reached, like
/// `cat file | pipeview`).
///
/// # Design
///
/// - Detects TTY vs piped input at construction
/// - Lines are read on a background thread; `poll()` never blocks
/// - Tracks EOF state via `complete` flag
#[derive(Debug)]
pub struct StdinSource {
    lines: LineReader,
    complete: bool,
    paused: bool,
}

impl StdinSource {
    /// Create a new StdinSource from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal).
    /// This prevents the viewport from waiting forever when the user forgot
    /// to pipe data.
    pub fn new() -> Result<Self, InputError> {
        if Self::is_tty() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(std::io::stdin()))
    }

    /// Check if stdin is a TTY (interactive terminal).
    fn is_tty() -> bool {
        std::io::stdin().is_terminal()
    }

    /// Create StdinSource from any reader.
    ///
    /// Bypasses the TTY check; used by tests and benches.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self {
            lines: LineReader::spawn(reader, "stdin"),
            complete: false,
            paused: false,
        }
    }

    /// Collect the complete lines read since the last poll.
    ///
    /// Non-blocking: returns an empty vec if nothing new arrived or delivery
    /// is paused. Sets the `complete` flag once EOF is reached.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn poll(&mut self) -> Result<Vec<String>, InputError> {
        if self.paused || self.complete {
            return Ok(Vec::new());
        }
        let (lines, finished) = self.lines.drain()?;
        self.complete = finished;
        Ok(lines)
    }

    /// Check if EOF has been reached (no more data will arrive).
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Hold delivery of new lines.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Release delivery of new lines.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether delivery is held.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
