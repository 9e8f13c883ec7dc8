//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim/less-style bindings. Keys typed while the command line
/// is active bypass this table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Bind `code` with `modifiers` to `action`, replacing any previous binding.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;

        // Vertical selection
        keys.bind(KeyCode::Char('k'), none, KeyAction::SelectUp);
        keys.bind(KeyCode::Up, none, KeyAction::SelectUp);
        keys.bind(KeyCode::Char('j'), none, KeyAction::SelectDown);
        keys.bind(KeyCode::Down, none, KeyAction::SelectDown);
        keys.bind(KeyCode::Char('u'), KeyModifiers::CONTROL, KeyAction::PageUp);
        keys.bind(KeyCode::PageUp, none, KeyAction::PageUp);
        keys.bind(KeyCode::Char('d'), KeyModifiers::CONTROL, KeyAction::PageDown);
        keys.bind(KeyCode::PageDown, none, KeyAction::PageDown);
        keys.bind(KeyCode::Char(' '), none, KeyAction::PageDown);
        keys.bind(KeyCode::Char('g'), none, KeyAction::SelectFirst);
        keys.bind(KeyCode::Home, none, KeyAction::SelectFirst);
        // Terminals differ on whether uppercase letters carry SHIFT.
        keys.bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::SelectLast);
        keys.bind(KeyCode::Char('G'), none, KeyAction::SelectLast);
        keys.bind(KeyCode::End, none, KeyAction::SelectLast);

        // Horizontal scrolling
        keys.bind(KeyCode::Char('h'), none, KeyAction::ScrollLeft);
        keys.bind(KeyCode::Left, none, KeyAction::ScrollLeft);
        keys.bind(KeyCode::Char('l'), none, KeyAction::ScrollRight);
        keys.bind(KeyCode::Right, none, KeyAction::ScrollRight);
        keys.bind(KeyCode::Char('0'), none, KeyAction::ResetHorizontal);

        // Modes
        keys.bind(KeyCode::Char('m'), none, KeyAction::TogglePagerMode);
        keys.bind(KeyCode::Char('f'), none, KeyAction::ToggleFollow);
        keys.bind(KeyCode::Char('p'), none, KeyAction::TogglePause);

        // Bars
        keys.bind(KeyCode::Char('t'), none, KeyAction::ToggleTopBar);
        keys.bind(KeyCode::Char('b'), none, KeyAction::ToggleBottomBar);

        // Application controls
        keys.bind(KeyCode::Char(':'), none, KeyAction::StartCommand);
        keys.bind(KeyCode::Char(':'), KeyModifiers::SHIFT, KeyAction::StartCommand);
        keys.bind(KeyCode::Char('l'), KeyModifiers::CONTROL, KeyAction::Redraw);
        keys.bind(KeyCode::Char('q'), none, KeyAction::Quit);
        keys.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    #[test]
    fn default_bindings_map_vim_motion_keys() {
        let bindings = KeyBindings::default();
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);

        assert_eq!(bindings.get(j), Some(KeyAction::SelectDown));
        assert_eq!(bindings.get(k), Some(KeyAction::SelectUp));
    }

    #[test]
    fn uppercase_g_selects_last_with_or_without_shift() {
        let bindings = KeyBindings::default();
        for modifiers in [KeyModifiers::SHIFT, KeyModifiers::NONE] {
            assert_eq!(
                bindings.get(KeyEvent::new(KeyCode::Char('G'), modifiers)),
                Some(KeyAction::SelectLast),
                "G with {:?}",
                modifiers
            );
        }
    }

    #[test]
    fn ctrl_l_redraws_but_plain_l_scrolls() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(KeyAction::Redraw)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(KeyAction::ScrollRight)
        );
    }

    #[test]
    fn lookup_ignores_event_kind_and_state() {
        let bindings = KeyBindings::default();
        let repeat = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
            KeyEventState::CAPS_LOCK,
        );
        assert_eq!(bindings.get(repeat), Some(KeyAction::Quit));
    }

    #[test]
    fn bind_replaces_existing_binding() {
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Redraw);
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(KeyAction::Redraw)
        );
    }

    #[test]
    fn unbound_key_has_no_action() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)),
            None
        );
    }
}
