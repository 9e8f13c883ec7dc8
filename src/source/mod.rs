//! Line sources.
//!
//! This module provides:
//! - The [`LineSource`] trait the viewport reads through (virtual positions,
//!   stepping, text retrieval)
//! - [`LineBuffer`], the growable in-memory store the binary feeds
//! - Input sources that produce raw lines: a spawned process ([`PipeSource`])
//!   or piped stdin ([`StdinSource`]), unified by [`InputSource`]

use crate::model::error::InputError;
use crate::model::VirtualPosition;
use std::cmp::Ordering;
use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

pub mod pipe;
pub mod stdin;

pub use pipe::PipeSource;
pub use stdin::StdinSource;

/// Tab stop width used when expanding tabs in incoming lines.
const TAB_WIDTH: usize = 8;

/// An ordered sequence of text lines addressed by virtual position.
///
/// Only [`len`](LineSource::len) and [`line`](LineSource::line) are required;
/// the stepping operations are provided. The viewport never mutates a source.
pub trait LineSource {
    /// Current number of lines.
    fn len(&self) -> usize;

    /// Text of the line at `vid`, if it exists.
    fn line(&self, vid: usize) -> Option<&str>;

    /// Whether the source has no lines.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the first line (invalid when the source is empty).
    fn begin(&self) -> VirtualPosition {
        VirtualPosition::at(0, self.len())
    }

    /// The past-the-end position; its ordinal is the line count.
    fn end(&self) -> VirtualPosition {
        VirtualPosition::invalid(self.len())
    }

    /// Step `pos` forward by `n` lines. Stepping past the last line leaves an
    /// invalid position.
    fn next(&self, pos: &mut VirtualPosition, n: usize) {
        *pos = VirtualPosition::at(pos.vid.saturating_add(n), self.len());
    }

    /// Step `pos` backward by `n` lines. Stepping before the first line leaves
    /// an invalid position at ordinal 0.
    fn prev(&self, pos: &mut VirtualPosition, n: usize) {
        *pos = match pos.vid.checked_sub(n) {
            Some(vid) => VirtualPosition::at(vid, self.len()),
            None => VirtualPosition::invalid(0),
        };
    }

    /// Compare two positions of this source.
    fn compare(&self, a: &VirtualPosition, b: &VirtualPosition) -> Ordering {
        a.order(b)
    }

    /// Text at `pos`, empty when the position is invalid.
    fn text_at(&self, pos: VirtualPosition) -> &str {
        if !pos.valid {
            return "";
        }
        self.line(pos.vid).unwrap_or("")
    }
}

impl<T: AsRef<str>> LineSource for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn line(&self, vid: usize) -> Option<&str> {
        self.get(vid).map(AsRef::as_ref)
    }
}

/// Growable in-memory line store.
///
/// Lines are appended as input arrives and may be cleared wholesale; the
/// viewport learns about either through its count-changed notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl<S: Into<String>> Extend<S> for LineBuffer {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.lines.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for LineBuffer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for LineBuffer {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, vid: usize) -> Option<&str> {
        self.lines.get(vid).map(String::as_str)
    }
}

/// Unified input source feeding raw lines to the application.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// Output of a spawned command.
    Process(PipeSource),
    /// Piped stdin.
    Stdin(StdinSource),
}

impl InputSource {
    /// Collect the lines that arrived since the last poll.
    ///
    /// Non-blocking. Returns nothing while delivery is paused.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader thread hit an I/O error.
    pub fn poll(&mut self) -> Result<Vec<String>, InputError> {
        match self {
            InputSource::Process(p) => p.poll(),
            InputSource::Stdin(s) => s.poll(),
        }
    }

    /// Whether more lines can still arrive.
    pub fn is_live(&mut self) -> bool {
        match self {
            InputSource::Process(p) => !p.has_ended(),
            InputSource::Stdin(s) => !s.is_complete(),
        }
    }

    /// Hold delivery of new lines.
    pub fn pause(&mut self) {
        match self {
            InputSource::Process(p) => p.pause(),
            InputSource::Stdin(s) => s.pause(),
        }
    }

    /// Release held lines on the next poll.
    pub fn resume(&mut self) {
        match self {
            InputSource::Process(p) => p.resume(),
            InputSource::Stdin(s) => s.resume(),
        }
    }

    /// Whether delivery is currently held.
    pub fn is_paused(&self) -> bool {
        match self {
            InputSource::Process(p) => p.is_paused(),
            InputSource::Stdin(s) => s.is_paused(),
        }
    }

    /// Short human-readable description for the top bar.
    pub fn describe(&self) -> String {
        match self {
            InputSource::Process(p) => p.command().to_string(),
            InputSource::Stdin(_) => "<stdin>".to_string(),
        }
    }
}

/// Detect and create the appropriate input source.
///
/// # Logic:
/// 1. If a command is given: spawn it and read its stdout
/// 2. Else if stdin is piped: read stdin
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `InputError::Spawn` if the command cannot be started, or
/// `InputError::NoInput` when there is nothing to read.
pub fn detect_input_source(command: &[String]) -> Result<InputSource, InputError> {
    if command.is_empty() {
        Ok(InputSource::Stdin(StdinSource::new()?))
    } else {
        Ok(InputSource::Process(PipeSource::spawn(command)?))
    }
}

/// Lines a reader thread may queue ahead of the event loop.
///
/// Once the queue is full the reader blocks, the pipe fills up and the
/// producer stalls until lines are taken again.
pub(crate) const READER_QUEUE_CAPACITY: usize = 4096;

/// Message sent from a reader thread.
#[derive(Debug)]
pub(crate) enum ReaderMessage {
    Line(String),
    Error(std::io::Error),
    Eof,
}

/// Receiving end of a background line reader.
#[derive(Debug)]
pub(crate) struct LineReader {
    rx: Receiver<ReaderMessage>,
    /// Error that arrived after lines already taken in the same drain.
    pending_error: Option<std::io::Error>,
}

impl LineReader {
    /// Read `reader` line by line on a background thread.
    pub(crate) fn spawn<R>(reader: R, label: &str) -> Self
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(READER_QUEUE_CAPACITY);
        let label = label.to_string();
        thread::spawn(move || {
            let mut reader = BufReader::new(reader);
            let mut raw = Vec::new();
            loop {
                raw.clear();
                match reader.read_until(b'\n', &mut raw) {
                    Ok(0) => {
                        debug!(source = %label, "reader reached EOF");
                        let _ = tx.send(ReaderMessage::Eof);
                        break;
                    }
                    Ok(_) => {
                        let line = sanitize_line(&String::from_utf8_lossy(&raw));
                        // Blocks while the queue is full.
                        if tx.send(ReaderMessage::Line(line)).is_err() {
                            // Receiver dropped; nobody is listening anymore.
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = tx.send(ReaderMessage::Error(e));
                        break;
                    }
                }
            }
        });
        Self {
            rx,
            pending_error: None,
        }
    }

    /// Take what is currently queued, at most one queue's worth.
    ///
    /// Returns the lines and whether the reader has finished. A read error
    /// is reported once, after any lines that preceded it were returned.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader thread hit an I/O error.
    pub(crate) fn drain(&mut self) -> Result<(Vec<String>, bool), InputError> {
        if let Some(e) = self.pending_error.take() {
            return Err(InputError::Io(e));
        }
        let mut lines = Vec::new();
        while lines.len() < READER_QUEUE_CAPACITY {
            match self.rx.try_recv() {
                Ok(ReaderMessage::Line(line)) => lines.push(line),
                Ok(ReaderMessage::Eof) | Err(TryRecvError::Disconnected) => {
                    return Ok((lines, true))
                }
                Ok(ReaderMessage::Error(e)) if lines.is_empty() => {
                    return Err(InputError::Io(e))
                }
                Ok(ReaderMessage::Error(e)) => {
                    self.pending_error = Some(e);
                    return Ok((lines, false));
                }
                Err(TryRecvError::Empty) => return Ok((lines, false)),
            }
        }
        Ok((lines, false))
    }

    /// Throw away everything queued so far.
    pub(crate) fn discard(&mut self) {
        while self.rx.try_recv().is_ok() {}
        self.pending_error = None;
    }
}

/// Strip the line terminator, expand tabs and drop other control characters.
fn sanitize_line(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['\n', '\r']);
    let mut out = String::with_capacity(trimmed.len());
    let mut column = 0;
    for ch in trimmed.chars() {
        match ch {
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            c if c.is_control() => {}
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}
