//! Shared helpers for rendering tests.
//!
//! Wraps a `Viewport<TestBackend>` plus an in-memory line buffer so tests can
//! feed lines, drive the viewport and read back what the terminal shows.

use crate::source::LineBuffer;
use crate::viewport::Viewport;
use ratatui::backend::TestBackend;

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Captures the visual output character by character, preserving layout.
/// Empty trailing lines are removed to keep snapshots clean.
pub(crate) fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Text of screen row `y`, untrimmed.
pub(crate) fn row_text(buffer: &ratatui::buffer::Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

/// A viewport drawing on a `TestBackend`, plus the lines it shows.
pub(crate) struct ViewportHarness {
    pub viewport: Viewport<TestBackend>,
    pub lines: LineBuffer,
}

impl ViewportHarness {
    /// A `width` x `height` viewport over `count` lines named `line N`.
    pub fn with_lines(width: u16, height: u16, count: usize) -> Self {
        let mut harness = Self {
            viewport: Viewport::new(TestBackend::new(width, height))
                .expect("test backend has a size"),
            lines: (0..count).map(|i| format!("line {}", i)).collect(),
        };
        harness.notify();
        harness
    }

    /// Append lines and notify the viewport.
    pub fn push<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, lines: I) {
        self.lines.extend(lines);
        self.notify();
    }

    /// Notify the viewport of the current line count.
    pub fn notify(&mut self) {
        self.viewport.on_source_count_changed(&self.lines, false);
    }

    pub fn draw(&mut self) {
        self.viewport.draw(&self.lines).expect("draw on test backend");
    }

    pub fn move_by(&mut self, delta: isize) -> bool {
        self.viewport.move_selection_by(&self.lines, delta)
    }

    /// Resize the backend and the viewport together.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport.backend_mut().resize(width, height);
        self.viewport.resize(width, height);
    }

    /// Whole screen, trailing blanks trimmed.
    pub fn screen(&self) -> String {
        buffer_to_string(self.viewport.backend().buffer())
    }

    /// Screen row `y`, untrimmed.
    pub fn row(&self, y: u16) -> String {
        row_text(self.viewport.backend().buffer(), y)
    }

    pub fn cursor(&mut self) -> (u16, u16) {
        use ratatui::backend::Backend;
        let pos = self
            .viewport
            .backend_mut()
            .get_cursor_position()
            .expect("test backend cursor");
        (pos.x, pos.y)
    }
}
