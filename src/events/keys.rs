//! Logical keys understood by pickers.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press, reduced to what a picker reacts to.
///
/// Editing shortcuts (Ctrl+U, Ctrl+W) are mapped to their own variants so
/// the engines never look at modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Escape,
    /// Clear the whole query.
    ClearLine,
    /// Delete the word before the cursor.
    DeleteWord,
    Char(char),
    /// Anything else. Never handled by a picker.
    Other,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            (KeyCode::Up, _) => Key::Up,
            (KeyCode::Down, _) => Key::Down,
            (KeyCode::Left, _) => Key::Left,
            (KeyCode::Right, _) => Key::Right,
            (KeyCode::Home, _) => Key::Home,
            (KeyCode::End, _) => Key::End,
            (KeyCode::Enter, _) => Key::Enter,
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => Key::BackTab,
            (KeyCode::Tab, _) => Key::Tab,
            (KeyCode::Backspace, _) => Key::Backspace,
            (KeyCode::Delete, _) => Key::Delete,
            (KeyCode::Esc, _) => Key::Escape,
            (KeyCode::Char('a'), KeyModifiers::CONTROL) => Key::Home,
            (KeyCode::Char('e'), KeyModifiers::CONTROL) => Key::End,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Key::ClearLine,
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => Key::DeleteWord,
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Key {
        Key::from(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key(KeyCode::Down, KeyModifiers::NONE), Key::Down);
        assert_eq!(key(KeyCode::Up, KeyModifiers::NONE), Key::Up);
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE), Key::Enter);
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), Key::Escape);
    }

    #[test]
    fn test_tab_and_backtab() {
        assert_eq!(key(KeyCode::Tab, KeyModifiers::NONE), Key::Tab);
        assert_eq!(key(KeyCode::Tab, KeyModifiers::SHIFT), Key::BackTab);
        assert_eq!(key(KeyCode::BackTab, KeyModifiers::SHIFT), Key::BackTab);
    }

    #[test]
    fn test_characters() {
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::NONE), Key::Char('a'));
        assert_eq!(key(KeyCode::Char('A'), KeyModifiers::SHIFT), Key::Char('A'));
        assert_eq!(key(KeyCode::Char(','), KeyModifiers::NONE), Key::Char(','));
    }

    #[test]
    fn test_editing_shortcuts() {
        assert_eq!(key(KeyCode::Char('u'), KeyModifiers::CONTROL), Key::ClearLine);
        assert_eq!(key(KeyCode::Char('w'), KeyModifiers::CONTROL), Key::DeleteWord);
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::CONTROL), Key::Home);
    }

    #[test]
    fn test_unhandled_combinations() {
        assert_eq!(key(KeyCode::Char('s'), KeyModifiers::CONTROL), Key::Other);
        assert_eq!(key(KeyCode::F(1), KeyModifiers::NONE), Key::Other);
    }
}
