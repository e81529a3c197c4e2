//! Cursor and span machinery.
//!
//! The cursor owns the one forward pass over the source: a byte offset into
//! the string plus the 1-based line/column bookkeeping that spans are made
//! of. Line parsers snapshot positions with [`Cursor::mark_start`] and close
//! them into spans with [`Cursor::span_from`].
//!
//! `\r` counts as horizontal whitespace, so `\r\n` sources parse exactly
//! like `\n` sources.

use bursa_core::{Position, Span};

/// Whitespace that never terminates a line.
pub(crate) fn is_horizontal_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// A character cursor over the source text.
///
/// Copyable so callers can checkpoint the full cursor state and restore it
/// after a failed lookahead.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'src> {
    source: &'src str,
    offset: usize,
    line: usize,
    col: usize,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current byte offset into the source.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Current position, 1-based.
    pub(crate) fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Snapshot the current position as the start of a node.
    pub(crate) fn mark_start(&self) -> Position {
        self.position()
    }

    /// Close a span from a marked start to the current position.
    pub(crate) fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.position())
    }

    /// Source text between a byte offset and the current position.
    pub(crate) fn text_from(&self, start_offset: usize) -> &'src str {
        &self.source[start_offset..self.offset]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// The character at the cursor, or `None` at end of input.
    pub(crate) fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    /// The character one past the cursor.
    pub(crate) fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.offset..].chars();
        chars.next();
        chars.next()
    }

    /// Consume one character, updating line/column bookkeeping.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    /// Consume `expected` if it is the next character.
    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume spaces and tabs (and `\r`), but never newlines.
    pub(crate) fn skip_horizontal_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if is_horizontal_whitespace(c)) {
            self.advance();
        }
    }

    /// Advance up to, but not past, the next newline.
    pub(crate) fn skip_to_eol(&mut self) {
        while matches!(self.peek(), Some(c) if c != '\n') {
            self.advance();
        }
    }

    /// Advance past the next newline, or to end of input.
    pub(crate) fn skip_line(&mut self) {
        self.skip_to_eol();
        self.eat('\n');
    }

    /// Consume consecutive lines whose non-whitespace prefix is empty.
    ///
    /// Leaves the cursor at the start of the first line with content, or at
    /// end of input.
    pub(crate) fn skip_blank_lines(&mut self) {
        loop {
            let rest = &self.source[self.offset..];
            if rest.is_empty() {
                return;
            }
            let content = match rest.find('\n') {
                Some(i) => &rest[..i],
                None => rest,
            };
            if !content.chars().all(is_horizontal_whitespace) {
                return;
            }
            self.skip_line();
        }
    }
}
