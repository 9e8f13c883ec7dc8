//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
/// Keys typed while the command line is active never reach this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Selection
    /// Move the selection up one line. Default: k/↑
    SelectUp,
    /// Move the selection down one line. Default: j/↓
    SelectDown,
    /// Move the selection up by one list height. Default: Ctrl+u/Page Up
    PageUp,
    /// Move the selection down by one list height. Default: Ctrl+d/Page Down
    PageDown,
    /// Select the first line. Default: g/Home
    SelectFirst,
    /// Select the last line. Default: G/End
    SelectLast,

    // Horizontal scrolling
    /// Scroll every row left. Default: h/←
    ScrollLeft,
    /// Scroll every row right. Default: l/→
    ScrollRight,
    /// Scroll back to column zero. Default: 0
    ResetHorizontal,

    // Modes
    /// Switch between pager and continuous window repositioning. Default: m
    TogglePagerMode,
    /// Keep the selection on the newest line as input arrives. Default: f
    ToggleFollow,
    /// Hold or release delivery of new lines. Default: p
    TogglePause,

    // Bars
    /// Show or hide the top bar. Default: t
    ToggleTopBar,
    /// Show or hide the bottom bar. Default: b
    ToggleBottomBar,

    // Misc
    /// Enter the command line. Default: :
    StartCommand,
    /// Repaint every region. Default: Ctrl+l
    Redraw,
    /// Quit the application. Default: q
    Quit,
}
