//! Source location tracking.
//!
//! Every node the parser produces carries a [`Span`]: a half-open range of
//! 1-based line/column [`Position`]s whose `end` marks the position *after*
//! the last consumed character. Spans are the sole means by which downstream
//! tooling (the validator, the CLI reporter) points at source locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the source text, with 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based).
    pub col: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The position `width` columns to the right on the same line.
    #[must_use]
    pub const fn advance(&self, width: usize) -> Self {
        Self {
            line: self.line,
            col: self.col + width,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A half-open span in the source text.
///
/// `end` is exclusive: it names the position immediately after the last
/// consumed character. A zero-width span (`start == end`) is legal and is
/// used to point at a position where something was expected but missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single position.
    #[must_use]
    pub const fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Merge this span with another, returning a span that covers both.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let start = if (other.start.line, other.start.col) < (self.start.line, self.start.col) {
            other.start
        } else {
            self.start
        };
        let end = if (other.end.line, other.end.col) > (self.end.line, self.end.col) {
            other.end
        } else {
            self.end
        };
        Self { start, end }
    }

    /// Check that the span is well-formed (`start` does not come after `end`).
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        (self.start.line, self.start.col) <= (self.end.line, self.end.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::new(3, 5);
        let moved = pos.advance(4);
        assert_eq!(moved, Position::new(3, 9));
    }

    #[test]
    fn test_span_ordering() {
        assert!(Span::new(Position::new(1, 1), Position::new(1, 5)).is_ordered());
        assert!(Span::new(Position::new(1, 4), Position::new(2, 1)).is_ordered());
        assert!(Span::point(Position::new(7, 3)).is_ordered());
        assert!(!Span::new(Position::new(2, 1), Position::new(1, 9)).is_ordered());
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(Position::new(1, 3), Position::new(1, 8));
        let b = Span::new(Position::new(1, 6), Position::new(2, 2));
        let merged = a.merge(&b);
        assert_eq!(merged.start, Position::new(1, 3));
        assert_eq!(merged.end, Position::new(2, 2));
    }

    #[test]
    fn test_wire_shape() {
        let span = Span::new(Position::new(1, 3), Position::new(1, 12));
        let json = serde_json::to_value(span).unwrap();
        assert_eq!(json["start"]["line"], 1);
        assert_eq!(json["start"]["col"], 3);
        assert_eq!(json["end"]["col"], 12);
    }

    #[test]
    fn test_display() {
        let span = Span::new(Position::new(4, 3), Position::new(4, 10));
        assert_eq!(format!("{span}"), "4:3..4:10");
    }
}
