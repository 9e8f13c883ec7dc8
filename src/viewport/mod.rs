//! The viewport: a scrollable list between optional status bars, above a
//! one-row command line.
//!
//! [`Viewport`] is the single owned context object application code drives.
//! Every mutating call only updates state and per-region dirty flags;
//! nothing reaches the terminal until [`Viewport::draw`], which repaints the
//! dirty regions in a fixed order:
//!
//! 1. pending resize (re-read size, clear the surface, everything dirty)
//! 2. top bar
//! 3. bottom bar
//! 4. list (whole window, or just the rows a selection move touched)
//! 5. command line
//! 6. cursor placement
//!
//! Bars go first because hiding one hands its row to the list in the same
//! pass.

pub mod bar;
pub mod command;
pub mod geometry;
pub mod list;
pub mod resize;
pub mod surface;
pub mod terminal;

pub use bar::Bar;
pub use command::{COMMAND_CAPACITY, CommandInput, CommandLine};
pub use geometry::Geometry;
pub use list::ListWindow;
pub use resize::ResizeFlag;
pub use surface::Surface;
pub use terminal::{TerminalSession, init};

use crate::model::{ColorAssignment, ColorPair, ColorRole, ViewportError};
use crate::source::LineSource;
use crossterm::event::KeyEvent;
use ratatui::backend::Backend;
use tracing::{debug, info};

/// Per-region repaint counters, incremented each time `draw` paints a region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepaintStats {
    /// Top bar repaints.
    pub top_bar: u64,
    /// Bottom bar repaints.
    pub bottom_bar: u64,
    /// Full list repaints.
    pub list_full: u64,
    /// Single list rows repainted after a selection move.
    pub list_rows: u64,
    /// Command row repaints.
    pub command: u64,
    /// Calls to `draw`.
    pub passes: u64,
}

impl RepaintStats {
    /// Total region repaints, ignoring pass count.
    pub fn regions(&self) -> u64 {
        self.top_bar + self.bottom_bar + self.list_full + self.list_rows + self.command
    }
}

/// Terminal viewport over a [`LineSource`].
///
/// Generic over the ratatui backend so tests can draw on `TestBackend`.
#[derive(Debug)]
pub struct Viewport<B: Backend> {
    surface: Surface<B>,
    geometry: Geometry,
    list: ListWindow,
    top: Bar,
    bottom: Bar,
    command: CommandLine,
    colors: ColorAssignment,
    repaints: RepaintStats,
}

impl<B: Backend> Viewport<B> {
    /// Create a viewport sized to `backend`, with both bars disabled and
    /// every region dirty.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::Init` if the backend size cannot be read.
    pub fn new(backend: B) -> Result<Self, ViewportError> {
        let surface = Surface::new(backend);
        let (width, height) = surface.size().map_err(ViewportError::Init)?;
        debug!(width, height, "viewport created");
        Ok(Self {
            surface,
            geometry: Geometry::new(width, height),
            list: ListWindow::new(),
            top: Bar::new(),
            bottom: Bar::new(),
            command: CommandLine::new(),
            colors: ColorAssignment::default(),
            repaints: RepaintStats::default(),
        })
    }

    // ===== Geometry =====

    /// Flag to raise when the terminal size changes (shared with signal
    /// handlers).
    pub fn resize_flag(&self) -> &ResizeFlag {
        self.geometry.resize_flag()
    }

    /// Note that the terminal changed size; handled on the next `draw`.
    pub fn request_resize(&self) {
        self.geometry.resize_flag().raise();
    }

    /// Record new dimensions and schedule a full repaint.
    ///
    /// `draw` re-reads the size from the surface, which wins if it differs.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.geometry.resize(width, height);
    }

    /// Schedule a full repaint, clearing the surface first.
    pub fn redraw(&mut self) {
        self.request_resize();
    }

    /// Terminal width in columns.
    pub fn width(&self) -> u16 {
        self.geometry.width()
    }

    /// Terminal height in rows.
    pub fn height(&self) -> u16 {
        self.geometry.height()
    }

    /// Rows currently available to the list.
    pub fn list_height(&self) -> usize {
        self.geometry
            .list_height(self.top.is_enabled(), self.bottom.is_enabled())
    }

    // ===== Bars =====

    /// Set (or clear and hide, with `None`) the top bar text.
    ///
    /// Returns whether the bar was shown or hidden, which changes the list
    /// height.
    pub fn set_top_text(&mut self, text: Option<&str>) -> bool {
        let changed = self.top.set_text(text);
        self.bar_visibility_changed("top", changed)
    }

    /// Set (or clear and hide, with `None`) the bottom bar text.
    pub fn set_bottom_text(&mut self, text: Option<&str>) -> bool {
        let changed = self.bottom.set_text(text);
        self.bar_visibility_changed("bottom", changed)
    }

    /// Show or hide the top bar, keeping its text.
    pub fn set_top_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.top.set_enabled(enabled);
        self.bar_visibility_changed("top", changed)
    }

    /// Show or hide the bottom bar, keeping its text.
    pub fn set_bottom_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.bottom.set_enabled(enabled);
        self.bar_visibility_changed("bottom", changed)
    }

    /// The top bar.
    pub fn top_bar(&self) -> &Bar {
        &self.top
    }

    /// The bottom bar.
    pub fn bottom_bar(&self) -> &Bar {
        &self.bottom
    }

    fn bar_visibility_changed(&mut self, which: &str, changed: bool) -> bool {
        if changed {
            debug!(
                bar = which,
                list_height = self.list_height(),
                "bar visibility changed"
            );
            self.list.mark_dirty();
        }
        changed
    }

    // ===== Colors =====

    /// Assign `pair` to `role` and mark the region using it dirty.
    ///
    /// Returns whether the assignment changed.
    pub fn set_color(&mut self, role: ColorRole, pair: ColorPair) -> bool {
        if !self.colors.set(role, pair) {
            return false;
        }
        match role {
            ColorRole::TopBar => self.top.mark_dirty(),
            ColorRole::BottomBar => self.bottom.mark_dirty(),
            ColorRole::Command => self.command.mark_dirty(),
            ColorRole::Selected | ColorRole::Normal => self.list.mark_dirty(),
        }
        true
    }

    /// Colors currently in use.
    pub fn colors(&self) -> &ColorAssignment {
        &self.colors
    }

    // ===== List =====

    /// Tell the viewport the source's size may have changed.
    pub fn on_source_count_changed<S: LineSource + ?Sized>(&mut self, source: &S, force: bool) {
        let height = self.list_height();
        self.list.on_source_count_changed(source, height, force);
    }

    /// Move the selection by `delta` lines. Returns `false` if clamped.
    pub fn move_selection_by<S: LineSource + ?Sized>(&mut self, source: &S, delta: isize) -> bool {
        let height = self.list_height();
        self.list.move_selection_by(source, height, delta)
    }

    /// Select line `vid` and center the window on it.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::OutOfRange` if there is no such line.
    pub fn set_selection<S: LineSource + ?Sized>(
        &mut self,
        source: &S,
        vid: usize,
    ) -> Result<(), ViewportError> {
        let height = self.list_height();
        self.list.set_selection(source, height, vid)
    }

    /// Ordinal of the selected line.
    pub fn selection(&self) -> usize {
        self.list.selection()
    }

    /// Scroll horizontally by `delta` columns (negative scrolls left).
    ///
    /// Returns `false` if a left scroll was clamped at column 0.
    pub fn scroll_horizontal(&mut self, delta: isize) -> bool {
        if delta >= 0 {
            self.list.scroll_right(delta.unsigned_abs());
            true
        } else {
            self.list.scroll_left(delta.unsigned_abs())
        }
    }

    /// Scroll the list `n` columns right.
    pub fn scroll_right(&mut self, n: usize) {
        self.list.scroll_right(n);
    }

    /// Scroll the list `n` columns left. Returns `false` if clamped at column 0.
    pub fn scroll_left(&mut self, n: usize) -> bool {
        self.list.scroll_left(n)
    }

    /// Return the list to column 0.
    pub fn reset_horizontal(&mut self) {
        self.list.reset_horizontal();
    }

    /// Switch between pager and continuous repositioning.
    pub fn set_pager_mode(&mut self, pager: bool) {
        self.list.set_pager_mode(pager);
    }

    /// Whether pager repositioning is on.
    pub fn pager_mode(&self) -> bool {
        self.list.pager_mode()
    }

    /// The list window.
    pub fn list(&self) -> &ListWindow {
        &self.list
    }

    // ===== Command line =====

    /// Activate the command line with `prefix`.
    pub fn enter_command(&mut self, prefix: &str) {
        self.command.enter(prefix);
    }

    /// Deactivate the command line and return what was typed.
    pub fn leave_command(&mut self) -> String {
        self.command.leave()
    }

    /// Feed a key to the command line.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::BufferOverflow` if the buffer is full.
    pub fn feed_command_key(&mut self, key: KeyEvent) -> Result<CommandInput, ViewportError> {
        self.command.handle_key(key)
    }

    /// Whether the command line is being edited.
    pub fn command_active(&self) -> bool {
        self.command.is_active()
    }

    /// The command line.
    pub fn command_line(&self) -> &CommandLine {
        &self.command
    }

    // ===== Drawing =====

    /// Whether the next `draw` would repaint anything.
    pub fn needs_draw(&self) -> bool {
        self.geometry.resize_flag().is_raised()
            || self.top.is_dirty()
            || self.bottom.is_dirty()
            || self.list.is_dirty()
            || self.list.has_pending_rows()
            || self.command.is_dirty()
    }

    /// Repaint the dirty regions and place the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::Terminal` if the surface cannot be written.
    pub fn draw<S: LineSource + ?Sized>(&mut self, source: &S) -> Result<(), ViewportError> {
        self.repaints.passes += 1;

        if self.geometry.resize_flag().take() {
            let (width, height) = self.surface.size()?;
            self.geometry.set_size(width, height);
            self.surface.reinitialize()?;
            self.top.mark_dirty();
            self.bottom.mark_dirty();
            self.list.mark_dirty();
            self.command.mark_dirty();
            info!(width, height, "terminal resized");
        }

        let width = self.geometry.width();
        let top_enabled = self.top.is_enabled();

        if self.top.is_dirty() {
            match self.geometry.top_bar_row().filter(|_| top_enabled) {
                Some(y) => {
                    let colors = self.colors.get(ColorRole::TopBar);
                    self.surface.paint_row(y, width, self.top.text(), colors)?;
                    self.repaints.top_bar += 1;
                }
                None => self.list.mark_dirty(),
            }
            self.top.clean();
        }

        if self.bottom.is_dirty() {
            match self
                .geometry
                .bottom_bar_row(top_enabled)
                .filter(|_| self.bottom.is_enabled())
            {
                Some(y) => {
                    let colors = self.colors.get(ColorRole::BottomBar);
                    self.surface.paint_row(y, width, self.bottom.text(), colors)?;
                    self.repaints.bottom_bar += 1;
                }
                None => self.list.mark_dirty(),
            }
            self.bottom.clean();
        }

        let height = self.list_height();
        let list_top = self.geometry.list_top(top_enabled);
        if self.list.is_dirty() {
            for row in 0..height {
                self.paint_list_row(source, list_top, row)?;
            }
            self.repaints.list_full += 1;
            self.list.clean();
        } else {
            let first = self.list.first().vid;
            for vid in self.list.take_dirty_rows() {
                if vid >= first && vid < first + height {
                    self.paint_list_row(source, list_top, vid - first)?;
                    self.repaints.list_rows += 1;
                }
            }
        }

        let command_row = self.geometry.command_row();
        if self.command.is_dirty() {
            let colors = self.colors.get(ColorRole::Command);
            let text = self.command.display_text();
            self.surface.paint_row(command_row, width, &text, colors)?;
            self.repaints.command += 1;
            self.command.clean();
        }

        let max_column = usize::from(width.saturating_sub(1));
        let column = self.command.cursor_column().min(max_column);
        // column <= u16::MAX since it is clamped to the width.
        self.surface
            .place_cursor(u16::try_from(column).unwrap_or(0), command_row)?;
        self.surface.flush()?;
        Ok(())
    }

    fn paint_list_row<S: LineSource + ?Sized>(
        &mut self,
        source: &S,
        list_top: u16,
        row: usize,
    ) -> Result<(), ViewportError> {
        let Ok(offset) = u16::try_from(row) else {
            return Ok(());
        };
        let (text, role) = self.list.row(source, row);
        let colors = self.colors.get(role);
        self.surface
            .paint_row(list_top + offset, self.geometry.width(), text, colors)?;
        Ok(())
    }

    /// Region repaint counters since creation.
    pub fn repaints(&self) -> &RepaintStats {
        &self.repaints
    }

    /// The terminal backend.
    pub fn backend(&self) -> &B {
        self.surface.backend()
    }

    /// Mutable access to the terminal backend.
    pub fn backend_mut(&mut self) -> &mut B {
        self.surface.backend_mut()
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
