//! The scrollable list window.
//!
//! Tracks which slice of the line source is visible (`first` plus the list
//! height), which line is selected, and a horizontal offset shared by every
//! row. The list height is owned by the viewport geometry and passed in, so
//! this type stays a pure state machine over a [`LineSource`].
//!
//! # Window repositioning
//!
//! When the selection leaves the visible window, `first` moves according to
//! the scroll policy:
//!
//! | Move | Pager mode | Continuous mode |
//! |------|------------|-----------------|
//! | down | `first = selected` (selection at top) | selection becomes the last row |
//! | up   | selection becomes the last row | `first = selected` |
//!
//! A downward move that lands on the first page always resets `first` to 0.

use crate::model::{ColorRole, VirtualPosition, ViewportError};
use crate::source::LineSource;
use tracing::debug;

/// Visible window, selection and horizontal scroll of the list region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWindow {
    first: VirtualPosition,
    selected: VirtualPosition,
    count_last_seen: usize,
    horizontal_offset: usize,
    pager_mode: bool,
    dirty: bool,
    /// Rows (by ordinal) to repaint when the whole list is not dirty.
    dirty_rows: Vec<usize>,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            first: VirtualPosition::invalid(0),
            selected: VirtualPosition::invalid(0),
            count_last_seen: 0,
            horizontal_offset: 0,
            pager_mode: false,
            dirty: true,
            dirty_rows: Vec::new(),
        }
    }
}

impl ListWindow {
    /// An empty window over an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the source's current size.
    ///
    /// A source that shrank, or that was empty, resets window and selection
    /// to the first line. The list is repainted when the count changed while
    /// the source still fits on one screen, when the window was reset, or
    /// when `force` is set; growth past the bottom of a full screen does not
    /// repaint anything.
    pub fn on_source_count_changed<S: LineSource + ?Sized>(
        &mut self,
        source: &S,
        height: usize,
        force: bool,
    ) {
        let count = source.len();
        if (count != self.count_last_seen && count < height) || force {
            self.dirty = true;
        }
        if (self.count_last_seen == 0 && !self.first.valid) || count < self.count_last_seen {
            let begin = source.begin();
            if self.first != begin || self.selected != begin {
                debug!(
                    previous = self.count_last_seen,
                    count, "source reset, selection back to first line"
                );
                self.dirty = true;
            }
            self.first = begin;
            self.selected = begin;
        }
        self.count_last_seen = count;
    }

    /// Move the selection by `delta` lines (negative moves up).
    ///
    /// Returns `false` if the move was clamped at either end.
    pub fn move_selection_by<S: LineSource + ?Sized>(
        &mut self,
        source: &S,
        height: usize,
        delta: isize,
    ) -> bool {
        if delta >= 0 {
            self.select_down(source, height, delta.unsigned_abs())
        } else {
            self.select_up(source, height, delta.unsigned_abs())
        }
    }

    /// Move the selection `n` lines down, snapping to the last line.
    ///
    /// Returns `false` if the selection hit the end before moving `n` lines.
    pub fn select_down<S: LineSource + ?Sized>(&mut self, source: &S, height: usize, n: usize) -> bool {
        let previous = self.selected;
        let mut honored = true;

        source.next(&mut self.selected, n);
        if !self.selected.valid || self.selected.vid >= self.count_last_seen {
            self.selected = self.last_position(source);
            honored = false;
        }

        if self.is_visible(self.selected, height) {
            self.mark_row(previous.vid);
            self.mark_row(self.selected.vid);
        } else {
            self.first = if self.selected.vid < height {
                source.begin()
            } else if self.pager_mode {
                self.selected
            } else {
                self.position(source, self.selected.vid + 1 - height)
            };
            self.dirty = true;
        }
        honored
    }

    /// Move the selection `n` lines up, snapping to the first line.
    ///
    /// Returns `false` if the selection hit the start before moving `n` lines.
    pub fn select_up<S: LineSource + ?Sized>(&mut self, source: &S, height: usize, n: usize) -> bool {
        let previous = self.selected;
        let mut honored = true;

        source.prev(&mut self.selected, n);
        if !self.selected.valid {
            self.selected = source.begin();
            honored = false;
        }

        if self.is_visible(self.selected, height) {
            self.mark_row(previous.vid);
            self.mark_row(self.selected.vid);
        } else {
            self.first = if !self.pager_mode {
                self.selected
            } else if height <= self.selected.vid {
                self.position(source, self.selected.vid + 1 - height)
            } else {
                source.begin()
            };
            self.dirty = true;
        }
        honored
    }

    /// Jump the selection to line `vid` and center the window on it.
    ///
    /// Near either end of the source the window is pinned to that end
    /// instead, so no blank rows trail the last line.
    ///
    /// # Errors
    ///
    /// Returns `ViewportError::OutOfRange` if the source has no line `vid`;
    /// the selection and window are left unchanged.
    pub fn set_selection<S: LineSource + ?Sized>(
        &mut self,
        source: &S,
        height: usize,
        vid: usize,
    ) -> Result<(), ViewportError> {
        let mut target = source.begin();
        source.next(&mut target, vid);
        if !target.valid || vid >= self.count_last_seen {
            return Err(ViewportError::OutOfRange {
                requested: vid,
                count: self.count_last_seen,
            });
        }

        let previous = self.selected;
        self.selected = target;

        let count = self.count_last_seen;
        let half = height / 2;
        let first = if vid < half {
            source.begin()
        } else if count - vid < half {
            self.position(source, count.saturating_sub(height))
        } else {
            self.position(source, vid - half)
        };

        if first == self.first && self.is_visible(previous, height) {
            self.mark_row(previous.vid);
            self.mark_row(vid);
        } else {
            self.first = first;
            self.dirty = true;
        }
        Ok(())
    }

    /// Ordinal of the selected line.
    pub fn selection(&self) -> usize {
        self.selected.vid
    }

    /// Selected position, with its validity.
    pub fn selected(&self) -> VirtualPosition {
        self.selected
    }

    /// Position shown on the first list row.
    pub fn first(&self) -> VirtualPosition {
        self.first
    }

    /// Source size as of the last count notification.
    pub fn count_last_seen(&self) -> usize {
        self.count_last_seen
    }

    /// Whether `pos` falls inside the window of `height` rows.
    pub fn is_visible(&self, pos: VirtualPosition, height: usize) -> bool {
        pos.vid >= self.first.vid && pos.vid < self.first.vid + height
    }

    /// Scroll every row `n` columns to the right.
    pub fn scroll_right(&mut self, n: usize) {
        self.horizontal_offset = self.horizontal_offset.saturating_add(n);
        self.dirty = true;
    }

    /// Scroll every row `n` columns to the left, stopping at column 0.
    ///
    /// Returns `false` if the offset was clamped.
    pub fn scroll_left(&mut self, n: usize) -> bool {
        let honored = self.horizontal_offset >= n;
        self.horizontal_offset = self.horizontal_offset.saturating_sub(n);
        self.dirty = true;
        honored
    }

    /// Return to column 0.
    pub fn reset_horizontal(&mut self) {
        self.horizontal_offset = 0;
        self.dirty = true;
    }

    /// Columns hidden on the left.
    pub fn horizontal_offset(&self) -> usize {
        self.horizontal_offset
    }

    /// Choose between pager (full-page jumps) and continuous (minimal
    /// scroll) repositioning.
    pub fn set_pager_mode(&mut self, pager: bool) {
        self.pager_mode = pager;
    }

    /// Whether pager repositioning is on.
    pub fn pager_mode(&self) -> bool {
        self.pager_mode
    }

    /// Text and color role of list row `row` (0 = first list row).
    ///
    /// Rows past the data render empty; the text is already shifted by the
    /// horizontal offset.
    pub fn row<'a, S: LineSource + ?Sized>(&self, source: &'a S, row: usize) -> (&'a str, ColorRole) {
        let vid = self.first.vid + row;
        let role = if self.selected.valid && vid == self.selected.vid {
            ColorRole::Selected
        } else {
            ColorRole::Normal
        };
        if !self.first.valid || vid >= self.count_last_seen {
            return ("", role);
        }
        let text = source.line(vid).unwrap_or("");
        let shifted = text
            .char_indices()
            .nth(self.horizontal_offset)
            .map_or("", |(offset, _)| &text[offset..]);
        (shifted, role)
    }

    /// Whether the whole list needs repainting.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a full list repaint on the next draw.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether single rows are queued for repaint.
    pub fn has_pending_rows(&self) -> bool {
        !self.dirty_rows.is_empty()
    }

    /// Take the rows queued for a partial repaint.
    pub(crate) fn take_dirty_rows(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.dirty_rows)
    }

    pub(crate) fn clean(&mut self) {
        self.dirty = false;
        self.dirty_rows.clear();
    }

    fn mark_row(&mut self, vid: usize) {
        if !self.dirty_rows.contains(&vid) {
            self.dirty_rows.push(vid);
        }
    }

    /// The last line as of the last count notification, or the (invalid)
    /// first position of an empty source.
    fn last_position<S: LineSource + ?Sized>(&self, source: &S) -> VirtualPosition {
        match self.count_last_seen.checked_sub(1) {
            Some(last) => self.position(source, last),
            None => source.begin(),
        }
    }

    fn position<S: LineSource + ?Sized>(&self, source: &S, vid: usize) -> VirtualPosition {
        let mut pos = source.begin();
        source.next(&mut pos, vid);
        pos
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
