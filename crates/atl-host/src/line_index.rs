//! Logical line index
//!
//! Maps between character offsets and logical positions using a Rope, giving O(log N) lookups
//! in both directions. Offsets are counted in Unicode scalar values (`char`).

use crate::position::Position;
use ropey::Rope;

/// Logical line index - implemented using Rope data structure
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create a new, empty line index
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build line index from text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get line/column from a character offset.
    ///
    /// Offsets past the end of the document clamp to the final position.
    pub fn char_offset_to_position(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        Position::new(line_idx, char_offset - line_start_char)
    }

    /// Convert a UTF-16 code unit offset into a character offset.
    ///
    /// Offsets past the end clamp to the document end; an offset inside a surrogate pair maps
    /// to the character containing it.
    pub fn utf16_offset_to_char_offset(&self, utf16_offset: usize) -> usize {
        let utf16_offset = utf16_offset.min(self.rope.len_utf16_cu());
        self.rope.utf16_cu_to_char(utf16_offset)
    }

    /// Get character offset from a logical position.
    ///
    /// Lines past the end clamp to the document end; columns clamp to the line length.
    pub fn position_to_char_offset(&self, pos: Position) -> usize {
        if pos.line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(pos.line);
        line_start_char + pos.column.min(self.line_len_chars(pos.line))
    }

    /// Character count of a line, excluding its line terminator.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }

        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total byte count
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get complete text
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Whether the document text begins with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        let mut chars = self.rope.chars();
        prefix.chars().all(|expected| chars.next() == Some(expected))
    }

    /// Get text of the specified line (excluding newline)
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();

        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.byte_count(), 0);
        assert_eq!(index.char_count(), 0);
    }

    #[test]
    fn test_from_text() {
        let text = "Line 1\nLine 2\nLine 3";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.byte_count(), text.len());
        assert_eq!(index.char_count(), text.chars().count());
    }

    #[test]
    fn test_char_offset_to_position() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.char_offset_to_position(0), Position::new(0, 0)); // A
        assert_eq!(index.char_offset_to_position(2), Position::new(0, 2)); // C
        assert_eq!(index.char_offset_to_position(4), Position::new(1, 0)); // D
        assert_eq!(index.char_offset_to_position(8), Position::new(2, 0)); // G
    }

    #[test]
    fn test_char_offset_past_end_clamps() {
        let index = LineIndex::from_text("ABC\nDE");
        assert_eq!(index.char_offset_to_position(100), Position::new(1, 2));
    }

    #[test]
    fn test_position_to_char_offset() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.position_to_char_offset(Position::new(0, 0)), 0);
        assert_eq!(index.position_to_char_offset(Position::new(0, 2)), 2);
        assert_eq!(index.position_to_char_offset(Position::new(1, 0)), 4);
        assert_eq!(index.position_to_char_offset(Position::new(2, 0)), 8);
        // Column clamps to line length, line clamps to document end.
        assert_eq!(index.position_to_char_offset(Position::new(0, 99)), 3);
        assert_eq!(index.position_to_char_offset(Position::new(9, 0)), 11);
    }

    #[test]
    fn test_line_len_ignores_crlf() {
        let index = LineIndex::from_text("ab\r\ncd");
        assert_eq!(index.line_len_chars(0), 2);
        assert_eq!(index.line_len_chars(1), 2);
        assert_eq!(index.get_line_text(0).as_deref(), Some("ab"));
    }

    #[test]
    fn test_utf8_cjk() {
        let text = "你好\n世界";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.char_offset_to_position(1), Position::new(0, 1));
        assert_eq!(index.char_offset_to_position(3), Position::new(1, 0));
    }

    #[test]
    fn test_starts_with() {
        let index = LineIndex::from_text("#%ATL 1.0\nfoo: bar");
        assert!(index.starts_with("#%ATL 1.0"));
        assert!(!index.starts_with("#%ATL 2.0"));
        assert!(!LineIndex::from_text("#%A").starts_with("#%ATL"));
    }
}
