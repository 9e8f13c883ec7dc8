//! Terminal dimensions and the row layout derived from them.

use super::resize::ResizeFlag;

/// Terminal size plus the pending-resize flag.
///
/// Row layout, top to bottom: optional top bar, list rows, optional bottom
/// bar, command row. Every row coordinate is derived from `height` and the
/// bar visibility, so all of them shift on resize.
#[derive(Debug, Clone)]
pub struct Geometry {
    width: u16,
    height: u16,
    resize: ResizeFlag,
}

impl Geometry {
    /// Geometry for a `width` x `height` terminal. Height is at least 1.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height: height.max(1),
            resize: ResizeFlag::new(),
        }
    }

    /// Record new dimensions and raise the resize flag.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.set_size(width, height);
        self.resize.raise();
    }

    /// Record new dimensions without touching the flag.
    pub(crate) fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height.max(1);
    }

    /// Width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows, at least 1.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The resize flag shared with signal handlers and the event loop.
    pub fn resize_flag(&self) -> &ResizeFlag {
        &self.resize
    }

    /// Rows available to the list: everything but the command row and the
    /// enabled bars, floored at zero.
    pub fn list_height(&self, top_enabled: bool, bottom_enabled: bool) -> usize {
        usize::from(self.height)
            .saturating_sub(1)
            .saturating_sub(usize::from(top_enabled))
            .saturating_sub(usize::from(bottom_enabled))
    }

    /// Screen row of the first list row.
    pub fn list_top(&self, top_enabled: bool) -> u16 {
        u16::from(top_enabled)
    }

    /// Screen row of the command line (always the last row).
    pub fn command_row(&self) -> u16 {
        self.height - 1
    }

    /// Screen row of the top bar, if the terminal has room for it besides the
    /// command row.
    pub fn top_bar_row(&self) -> Option<u16> {
        (self.height >= 2).then_some(0)
    }

    /// Screen row of the bottom bar (just above the command row), if it does
    /// not collide with the command row or an enabled top bar.
    pub fn bottom_bar_row(&self, top_enabled: bool) -> Option<u16> {
        (self.height >= 2 + u16::from(top_enabled)).then(|| self.height - 2)
    }
}
