//! Logical coordinates used by documents, selections and decorations.

use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range between two logical positions.
///
/// `start` is always less than or equal to `end`; [`Range::new`] swaps reversed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Range start (inclusive).
    pub start: Position,
    /// Range end (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a range, normalizing the order of its endpoints.
    pub fn new(start: Position, end: Position) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Whether the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` lies inside the range.
    ///
    /// Empty ranges contain their own anchor so that zero-width annotations stay hoverable.
    pub fn contains(&self, pos: Position) -> bool {
        if self.is_empty() {
            return pos == self.start;
        }
        self.start <= pos && pos < self.end
    }
}

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    /// Forward selection (from start to end)
    Forward,
    /// Backward selection (from end to start)
    Backward,
}

/// Selection range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Selection start position
    pub start: Position,
    /// Selection end position (the caret)
    pub end: Position,
    /// Selection direction
    pub direction: SelectionDirection,
}

impl Selection {
    /// A collapsed selection (a plain caret) at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
            direction: SelectionDirection::Forward,
        }
    }

    /// A selection from `start` to `end`; the direction follows the endpoint order.
    pub fn new(start: Position, end: Position) -> Self {
        let direction = if start <= end {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        };
        Self {
            start,
            end,
            direction,
        }
    }

    /// The caret position.
    pub fn active(&self) -> Position {
        self.end
    }

    /// Whether the selection is a plain caret.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::caret(Position::default())
    }
}
