//! Single-line text input
//!
//! A minimal editable field with a byte-offset cursor, shared by the auth
//! screen and the chat input. Passwords render as dots but edit like any
//! other field.

use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    /// Byte offset of the cursor, always on a char boundary.
    cursor: usize,
    masked: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn password() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Rendered form: dots for masked fields, the raw value otherwise.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_chars(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if self.cursor < self.value.len() {
            let c = self.value[self.cursor..].chars().next().unwrap_or('\0');
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the current value, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    /// Apply one key press. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.left();
                true
            }
            KeyCode::Right => {
                self.right();
                true
            }
            KeyCode::Home => {
                self.home();
                true
            }
            KeyCode::End => {
                self.end();
                true
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        if self.cursor == 0 {
            return None;
        }
        let mut prev = self.cursor - 1;
        while prev > 0 && !self.value.is_char_boundary(prev) {
            prev -= 1;
        }
        Some(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextField {
        let mut field = TextField::new();
        for c in text.chars() {
            field.insert(c);
        }
        field
    }

    #[test]
    fn insert_and_backspace() {
        let mut field = typed("hello");
        assert_eq!(field.value(), "hello");
        field.backspace();
        assert_eq!(field.value(), "hell");
    }

    #[test]
    fn edits_in_the_middle() {
        let mut field = typed("helo");
        field.left();
        field.insert('l');
        assert_eq!(field.value(), "hello");

        field.home();
        field.delete();
        assert_eq!(field.value(), "ello");
    }

    #[test]
    fn cursor_respects_multibyte_chars() {
        let mut field = typed("日本語");
        field.left();
        field.backspace();
        assert_eq!(field.value(), "日語");
        field.end();
        assert_eq!(field.cursor_chars(), 2);
    }

    #[test]
    fn masked_display_hides_the_value() {
        let mut field = TextField::password();
        for c in "secret".chars() {
            field.insert(c);
        }
        assert_eq!(field.display(), "••••••");
        assert_eq!(field.value(), "secret");
    }

    #[test]
    fn take_empties_the_field() {
        let mut field = typed("one question");
        assert_eq!(field.take(), "one question");
        assert!(field.is_empty());
        assert_eq!(field.cursor_chars(), 0);
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut field = TextField::new();
        field.backspace();
        field.left();
        assert!(field.is_empty());
    }
}
