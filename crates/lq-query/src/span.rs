//! Source locations.
//!
//! Positions count characters, not bytes, so they line up with what an editor shows.

use std::fmt;

use serde::Serialize;

/// A point in the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
    /// Character offset from the start of the input, starting at 0.
    pub offset: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Returns the position immediately after `ch`.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
                offset: self.offset + 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
                offset: self.offset + 1,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of query text: `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    /// First character of the range.
    pub start: Position,
    /// Position just past the last character of the range.
    pub end: Position,
}

impl Span {
    /// Creates a span between two positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a zero-width span, used for errors at end of input.
    pub fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Number of characters covered by the span.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// True if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
