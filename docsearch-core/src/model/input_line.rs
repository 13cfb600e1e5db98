//! Raw text of the search field with a byte cursor.
//!
//! Kept apart from `QueryState`: the field shows exactly what was typed
//! (trailing spaces included) while the query holds the normalized form.

use compact_str::CompactString;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: CompactString,
    /// Byte offset, always on a char boundary.
    cursor: usize,
}

impl InputLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.text = CompactString::new("");
        self.cursor = 0;
    }

    pub fn set(&mut self, text: impl Into<CompactString>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn delete_char_before(&mut self) -> bool {
        let Some((pos, _)) = self.text[..self.cursor].char_indices().next_back() else {
            return false;
        };
        self.text.remove(pos);
        self.cursor = pos;
        true
    }

    pub fn delete_char_after(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        if let Some((pos, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = pos;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in chars, for terminal column placement.
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }
}
