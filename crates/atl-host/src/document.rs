//! Text documents as seen by extensions.

use crate::line_index::LineIndex;
use crate::position::Position;
use std::fmt;
use std::path::{Path, PathBuf};

/// A read-mostly text document identified by its language id and file name.
pub struct TextDocument {
    language_id: String,
    file_name: PathBuf,
    version: u64,
    line_index: LineIndex,
}

impl TextDocument {
    /// Create a document from its text.
    pub fn new(file_name: impl Into<PathBuf>, language_id: impl Into<String>, text: &str) -> Self {
        Self {
            language_id: language_id.into(),
            file_name: file_name.into(),
            version: 1,
            line_index: LineIndex::from_text(text),
        }
    }

    /// The declared type tag (e.g. `"yaml"`).
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Change the declared type tag.
    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.language_id = language_id.into();
        self.version = self.version.saturating_add(1);
    }

    /// The document path.
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Version number, incremented on every content change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The complete document text.
    pub fn get_text(&self) -> String {
        self.line_index.get_text()
    }

    /// Whether the document text begins with `prefix`, without materializing the text.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.line_index.starts_with(prefix)
    }

    /// Replace the full document text.
    pub fn set_text(&mut self, text: &str) {
        self.line_index = LineIndex::from_text(text);
        self.version = self.version.saturating_add(1);
    }

    /// Convert a character offset into a position (clamped to the document end).
    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index.char_offset_to_position(offset)
    }

    /// Convert a UTF-16 code unit offset into a position (clamped to the document end).
    pub fn position_at_utf16(&self, offset: usize) -> Position {
        let offset = self.line_index.utf16_offset_to_char_offset(offset);
        self.line_index.char_offset_to_position(offset)
    }

    /// Convert a position into a character offset (clamped to the document).
    pub fn offset_at(&self, pos: Position) -> usize {
        self.line_index.position_to_char_offset(pos)
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.line_index.char_count()
    }

    /// Text of a single line, without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.line_index.get_line_text(line)
    }

    /// Character length of a line, without its terminator.
    pub fn line_len(&self, line: usize) -> usize {
        self.line_index.line_len_chars(line)
    }

    /// Clamp a position to a valid location in this document.
    pub fn validate_position(&self, pos: Position) -> Position {
        self.position_at(self.offset_at(pos))
    }
}

impl fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDocument")
            .field("file_name", &self.file_name)
            .field("language_id", &self.language_id)
            .field("version", &self.version)
            .field("line_count", &self.line_index.line_count())
            .finish()
    }
}
