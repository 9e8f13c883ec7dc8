//! Row painting on a ratatui backend.
//!
//! The viewport repaints whole rows of single regions, so it writes cells
//! straight through [`Backend::draw`] instead of rendering full frames.

use crate::model::ColorPair;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use std::io;
use unicode_width::UnicodeWidthStr;

/// The terminal surface the viewport draws on.
#[derive(Debug)]
pub struct Surface<B: Backend> {
    backend: B,
}

impl<B: Backend> Surface<B> {
    /// Wrap `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Current terminal dimensions as `(width, height)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.backend.size()?;
        Ok((size.width, size.height))
    }

    /// Paint row `y` across `width` columns.
    ///
    /// The row is filled with `colors` first, then `text` is written from
    /// column 0 and cut at `width` display columns. Text never wraps.
    pub fn paint_row(&mut self, y: u16, width: u16, text: &str, colors: ColorPair) -> io::Result<()> {
        let area = Rect::new(0, y, width, 1);
        let style = colors.style();
        let mut row = Buffer::empty(area);
        row.set_style(area, style);
        row.set_stringn(0, y, text, usize::from(width), style);

        // Cells covered by the right half of a wide glyph must not be sent,
        // or they would overwrite it.
        let mut hidden = 0usize;
        let cells = row.content.iter().enumerate().filter_map(|(x, cell)| {
            if hidden > 0 {
                hidden -= 1;
                return None;
            }
            hidden = cell.symbol().width().saturating_sub(1);
            let x = u16::try_from(x).ok()?;
            Some((x, y, cell))
        });
        self.backend.draw(cells)
    }

    /// Show the hardware cursor at `(x, y)`.
    pub fn place_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.backend.set_cursor_position(Position::new(x, y))?;
        self.backend.show_cursor()
    }

    /// Clear the whole screen; used after a resize before repainting.
    pub fn reinitialize(&mut self) -> io::Result<()> {
        self.backend.clear()
    }

    /// Send buffered output to the terminal.
    pub fn flush(&mut self) -> io::Result<()> {
        self.backend.flush()
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the wrapped backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
