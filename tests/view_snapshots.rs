//! Snapshot tests for the viewport screen layout
//!
//! Uses insta + ratatui TestBackend to verify rendering output doesn't regress.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pipeview::source::LineBuffer;
use pipeview::viewport::Viewport;
use ratatui::backend::TestBackend;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Rows are right-trimmed; trailing empty rows are removed.
fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
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

fn create_viewport(width: u16, height: u16) -> Viewport<TestBackend> {
    Viewport::new(TestBackend::new(width, height)).unwrap()
}

fn numbered(prefix: &str, count: usize) -> LineBuffer {
    (0..count).map(|i| format!("{} {}", prefix, i)).collect()
}

// ===== Snapshots =====

#[test]
fn snapshot_bars_around_list() {
    let lines: LineBuffer = ["compiling foo", "compiling bar", "finished"]
        .into_iter()
        .collect();
    let mut viewport = create_viewport(24, 6);
    viewport.set_top_text(Some("make -j4"));
    viewport.set_bottom_text(Some("line 1/3  live"));
    viewport.on_source_count_changed(&lines, true);

    viewport.draw(&lines).unwrap();

    let output = buffer_to_string(viewport.backend().buffer());
    insta::assert_snapshot!("bars_around_list", output);
}

#[test]
fn snapshot_continuous_scroll() {
    let lines = numbered("row", 10);
    let mut viewport = create_viewport(20, 5);
    viewport.on_source_count_changed(&lines, true);
    viewport.draw(&lines).unwrap();

    viewport.move_selection_by(&lines, 6);
    viewport.draw(&lines).unwrap();

    let output = buffer_to_string(viewport.backend().buffer());
    insta::assert_snapshot!("continuous_scroll", output);
}

#[test]
fn snapshot_pager_scroll() {
    let lines = numbered("row", 10);
    let mut viewport = create_viewport(20, 5);
    viewport.set_pager_mode(true);
    viewport.on_source_count_changed(&lines, true);
    viewport.draw(&lines).unwrap();

    viewport.move_selection_by(&lines, 5);
    viewport.draw(&lines).unwrap();

    let output = buffer_to_string(viewport.backend().buffer());
    insta::assert_snapshot!("pager_scroll", output);
}

#[test]
fn snapshot_command_line_with_short_list() {
    let lines: LineBuffer = ["only line"].into_iter().collect();
    let mut viewport = create_viewport(20, 5);
    viewport.set_top_text(Some("tail -f log"));
    viewport.on_source_count_changed(&lines, true);
    viewport.enter_command(":");
    for ch in "color top red".chars() {
        viewport
            .feed_command_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
            .unwrap();
    }

    viewport.draw(&lines).unwrap();

    let output = buffer_to_string(viewport.backend().buffer());
    insta::assert_snapshot!("command_line_with_short_list", output);
}

#[test]
fn snapshot_horizontal_scroll_and_truncation() {
    let lines: LineBuffer = ["0123456789abcdefghij", "short"].into_iter().collect();
    let mut viewport = create_viewport(10, 3);
    viewport.on_source_count_changed(&lines, true);

    viewport.scroll_right(4);
    viewport.draw(&lines).unwrap();

    let output = buffer_to_string(viewport.backend().buffer());
    insta::assert_snapshot!("horizontal_scroll_and_truncation", output);
}
