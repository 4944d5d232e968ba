//! Text buffer behind a picker's input field.
//!
//! The buffer supports:
//! - Character input and deletion
//! - Cursor movement (left/right, home/end)
//! - Line clearing and word deletion
//!
//! The cursor is a byte offset that always sits on a char boundary.

use crate::events::Key;

/// The editable query text of a picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position within the value, in bytes.
    cursor: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input with an initial value.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self {
            value,
            cursor,
            placeholder: String::new(),
        }
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Get the placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value and move cursor to end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    /// Clear the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get the cursor position in bytes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor, used to place the terminal cursor.
    pub fn before_cursor(&self) -> &str {
        &self.value[..self.cursor]
    }

    /// Handle an editing key.
    ///
    /// Returns true if the value was modified.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Char(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            // Delete character before cursor
            Key::Backspace => match self.prev_boundary() {
                Some(prev) => {
                    self.value.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                    true
                }
                None => false,
            },
            // Delete character at cursor
            Key::Delete => match self.next_boundary() {
                Some(next) => {
                    self.value.replace_range(self.cursor..next, "");
                    true
                }
                None => false,
            },
            Key::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
                false
            }
            Key::Right => {
                if let Some(next) = self.next_boundary() {
                    self.cursor = next;
                }
                false
            }
            Key::Home => {
                self.cursor = 0;
                false
            }
            Key::End => {
                self.cursor = self.value.len();
                false
            }
            Key::ClearLine => {
                if self.value.is_empty() {
                    false
                } else {
                    self.clear();
                    true
                }
            }
            Key::DeleteWord => {
                if self.cursor == 0 {
                    return false;
                }
                let before = self.value[..self.cursor].trim_end();
                let word_start = before
                    .char_indices()
                    .rev()
                    .find(|(_, c)| !c.is_alphanumeric())
                    .map(|(i, c)| i + c.len_utf8())
                    .unwrap_or(0);
                self.value.replace_range(word_start..self.cursor, "");
                self.cursor = word_start;
                true
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}
