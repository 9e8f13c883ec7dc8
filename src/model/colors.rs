//! Color roles for the viewport regions.
//!
//! The viewport paints five kinds of rows, each with its own foreground and
//! background pair. Changing a pair at runtime marks the owning region dirty.

use ratatui::style::{Color, Style};
use std::str::FromStr;

/// Logical role a painted row plays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// The optional status bar on the first row.
    TopBar,
    /// The optional status bar just above the command row.
    BottomBar,
    /// The command row on the last terminal line.
    Command,
    /// The list row holding the selection.
    Selected,
    /// Every other list row.
    Normal,
}

impl ColorRole {
    /// Every role, in declaration order.
    pub const ALL: [ColorRole; 5] = [
        ColorRole::TopBar,
        ColorRole::BottomBar,
        ColorRole::Command,
        ColorRole::Selected,
        ColorRole::Normal,
    ];

    /// Parse a role name as written in config files and commands.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" | "top_bar" => Some(ColorRole::TopBar),
            "bottom" | "bottom_bar" => Some(ColorRole::BottomBar),
            "command" => Some(ColorRole::Command),
            "selected" => Some(ColorRole::Selected),
            "normal" | "list" => Some(ColorRole::Normal),
            _ => None,
        }
    }
}

/// A foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    /// Text color.
    pub fg: Color,
    /// Fill color.
    pub bg: Color,
}

impl ColorPair {
    /// Create a pair.
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    /// Build a pair from two color names.
    ///
    /// Unknown names fall back to black, matching how terminal color names
    /// have always been looked up.
    pub fn from_names(fg: &str, bg: &str) -> Self {
        Self::new(parse_color(fg), parse_color(bg))
    }

    /// The pair as a ratatui style.
    pub fn style(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Parse a color name (`"red"`, `"light-blue"`, `"#ff8800"`, `"7"`).
pub fn parse_color(name: &str) -> Color {
    Color::from_str(name.trim()).unwrap_or(Color::Black)
}

/// Mapping from each [`ColorRole`] to its current pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAssignment {
    top_bar: ColorPair,
    bottom_bar: ColorPair,
    command: ColorPair,
    selected: ColorPair,
    normal: ColorPair,
}

impl ColorAssignment {
    /// Pair currently assigned to `role`.
    pub fn get(&self, role: ColorRole) -> ColorPair {
        match role {
            ColorRole::TopBar => self.top_bar,
            ColorRole::BottomBar => self.bottom_bar,
            ColorRole::Command => self.command,
            ColorRole::Selected => self.selected,
            ColorRole::Normal => self.normal,
        }
    }

    /// Replace the pair for `role`. Returns whether anything changed.
    pub fn set(&mut self, role: ColorRole, pair: ColorPair) -> bool {
        let slot = match role {
            ColorRole::TopBar => &mut self.top_bar,
            ColorRole::BottomBar => &mut self.bottom_bar,
            ColorRole::Command => &mut self.command,
            ColorRole::Selected => &mut self.selected,
            ColorRole::Normal => &mut self.normal,
        };
        let changed = *slot != pair;
        *slot = pair;
        changed
    }
}

impl Default for ColorAssignment {
    /// Reverse video for bars and selection, plain white on black elsewhere.
    fn default() -> Self {
        let inverse = ColorPair::new(Color::Black, Color::White);
        let plain = ColorPair::new(Color::White, Color::Black);
        Self {
            top_bar: inverse,
            bottom_bar: inverse,
            command: plain,
            selected: inverse,
            normal: plain,
        }
    }
}
