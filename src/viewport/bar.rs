//! Single-row status bars.

/// A fixed status bar (top or bottom) with optional caller-supplied text.
///
/// Text is stored untruncated; it is cut to the terminal width only when
/// painted, so a resize changes the cut point without re-setting the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    enabled: bool,
    text: Option<String>,
    dirty: bool,
}

impl Default for Bar {
    fn default() -> Self {
        Self {
            enabled: false,
            text: None,
            dirty: true,
        }
    }
}

impl Bar {
    /// A disabled bar with no text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bar text, or clear and disable the bar with `None`.
    ///
    /// Giving text to a disabled bar enables it. Returns whether the bar's
    /// visibility changed, which changes the rows left for the list.
    pub fn set_text(&mut self, text: Option<&str>) -> bool {
        match text {
            Some(text) => {
                self.text = Some(text.to_string());
                self.dirty = true;
                if !self.enabled {
                    self.enabled = true;
                    return true;
                }
                false
            }
            None => {
                self.text = None;
                if self.enabled {
                    self.enabled = false;
                    self.dirty = true;
                    return true;
                }
                false
            }
        }
    }

    /// Show or hide the bar, keeping its text. Returns whether it changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.dirty = true;
        true
    }

    /// Whether the bar takes a screen row.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stored text, or empty.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether the bar needs repainting.
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
}
