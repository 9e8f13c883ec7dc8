//! Command line editing.
//!
//! The command line lives on the last terminal row. It is inactive until
//! [`CommandLine::enter`] is called with a prefix label, collects keys into a
//! bounded edit buffer, and hands the buffer back on [`CommandLine::leave`].
//! Cancelling (e.g. on Esc) is caller policy: the controller only reports keys
//! it does not handle.

use crate::model::ViewportError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Maximum number of characters the edit buffer holds.
pub const COMMAND_CAPACITY: usize = 511;

/// What the command line did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandInput {
    /// The key edited the buffer or moved the cursor (or was a no-op edit,
    /// like backspace at column 0). Editing continues.
    Handled,
    /// Enter was pressed: the input is complete. Call `leave()` for the text.
    Commit,
    /// Not a command line key; the caller may act on it.
    Ignored,
}

/// Edit buffer, cursor and prefix of the command row.
///
/// The cursor counts characters, in `0..=len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    active: bool,
    prefix: String,
    buffer: String,
    cursor: usize,
    dirty: bool,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self {
            active: false,
            prefix: String::new(),
            buffer: String::new(),
            cursor: 0,
            dirty: true,
        }
    }
}

impl CommandLine {
    /// An inactive, empty command line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing with an empty buffer, showing `prefix` before it.
    pub fn enter(&mut self, prefix: impl Into<String>) {
        self.active = true;
        self.prefix = prefix.into();
        self.buffer.clear();
        self.cursor = 0;
        self.dirty = true;
    }

    /// Stop editing and return the buffer contents.
    ///
    /// The contents stay readable through [`CommandLine::buffer`] until the
    /// next `enter`. Returns an empty string if the line was not active.
    pub fn leave(&mut self) -> String {
        if !self.active {
            return String::new();
        }
        self.active = false;
        self.dirty = true;
        self.buffer.clone()
    }

    /// Feed one key event.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::BufferOverflow` when a printable character
    /// arrives with the buffer full; nothing is inserted.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<CommandInput, ViewportError> {
        if !self.active {
            return Ok(CommandInput::Ignored);
        }
        let input = match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    && !ch.is_control() =>
            {
                self.insert(ch)?;
                CommandInput::Handled
            }
            KeyCode::Left => {
                self.cursor_left();
                CommandInput::Handled
            }
            KeyCode::Right => {
                self.cursor_right();
                CommandInput::Handled
            }
            KeyCode::Home | KeyCode::Up => {
                self.cursor_home();
                CommandInput::Handled
            }
            KeyCode::End | KeyCode::Down => {
                self.cursor_end();
                CommandInput::Handled
            }
            KeyCode::Backspace => {
                self.backspace();
                CommandInput::Handled
            }
            KeyCode::Enter => CommandInput::Commit,
            _ => CommandInput::Ignored,
        };
        Ok(input)
    }

    /// Insert `ch` at the cursor and advance the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::BufferOverflow` if the buffer already holds
    /// [`COMMAND_CAPACITY`] characters.
    pub fn insert(&mut self, ch: char) -> Result<(), ViewportError> {
        if self.len() >= COMMAND_CAPACITY {
            return Err(ViewportError::BufferOverflow {
                capacity: COMMAND_CAPACITY,
            });
        }
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, ch);
        self.cursor += 1;
        self.dirty = true;
        Ok(())
    }

    /// Delete the character before the cursor. No-op at column 0.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.buffer.remove(at);
        self.cursor -= 1;
        self.dirty = true;
    }

    /// Move the cursor one character left.
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.dirty = true;
    }

    /// Move the cursor one character right.
    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
        self.dirty = true;
    }

    /// Move the cursor to column 0.
    pub fn cursor_home(&mut self) {
        self.cursor = 0;
        self.dirty = true;
    }

    /// Move the cursor past the last character.
    pub fn cursor_end(&mut self) {
        self.cursor = self.len();
        self.dirty = true;
    }

    /// Whether keys are being edited into the line.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Text shown before the buffer, usually `:`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Current contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer length in characters.
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Whether the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Text painted on the command row: prefix and buffer when active,
    /// nothing otherwise.
    pub fn display_text(&self) -> String {
        if self.active {
            format!("{}{}", self.prefix, self.buffer)
        } else {
            String::new()
        }
    }

    /// Screen column of the terminal cursor on the command row.
    pub fn cursor_column(&self) -> usize {
        if !self.active {
            return 0;
        }
        let before = &self.buffer[..self.byte_offset(self.cursor)];
        self.prefix.width() + before.width()
    }

    /// Whether the command row needs repainting.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a repaint on the next draw.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clean(&mut self) {
        self.dirty = false;
    }

    /// Byte offset of character index `index` (or the end of the buffer).
    fn byte_offset(&self, index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(index)
            .map_or(self.buffer.len(), |(offset, _)| offset)
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
