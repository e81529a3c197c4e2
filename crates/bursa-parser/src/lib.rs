//! Single-pass parser for the Bursa ledger language.
//!
//! This crate turns a `.bursa` source text into a structured
//! [`Ledger`] plus diagnostic lists. The parser is a fused lexer+parser: it
//! consumes the character stream once, dispatches line-by-line on the first
//! non-whitespace character and the current section, and builds the domain
//! data structure directly, with a span on every produced node.
//!
//! Malformed lines are recovered from: the offending line emits a coded
//! diagnostic, appends no entry, and parsing continues on the next line.
//!
//! # Example
//!
//! ```
//! use bursa_parser::parse;
//!
//! let source = "\
//! >>> META
//! alias: $ = USD
//!
//! >>> LEDGER
//! @Checking
//!   2026-01-16 -100 $ &Groceries #traderjoes
//! ";
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.data.ledger.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cursor;
mod parser;

use bursa_core::{Diagnostic, Ledger};

/// Result of parsing one source text.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// The parsed ledger; possibly empty, never absent.
    pub data: Ledger,
    /// Syntax errors, in emission order.
    pub errors: Vec<Diagnostic>,
    /// Warnings. The parser itself emits none today; the field keeps the
    /// result shape uniform with the semantic validator's output.
    pub warnings: Vec<Diagnostic>,
}

impl ParseResult {
    /// Whether the parse produced no errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse Bursa source code.
///
/// A pure function of the input: no I/O, no shared state, linear time in
/// the source length. Always returns a [`Ledger`] and complete diagnostic
/// lists; callers surface diagnostics and need not stop on the first error.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    parser::Parser::new(source).run()
}
