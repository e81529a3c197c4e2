//! Core types for the Bursa ledger language.
//!
//! This crate provides the data model shared by the parser, the semantic
//! validator, and the CLI:
//!
//! - [`Span`] / [`Position`] - 1-based source locations attached to every node
//! - [`Amount`] - a signed decimal quantity with a resolved commodity
//! - [`AccountRef`] / [`CategoryRef`] / [`TagRef`] - sigil-prefixed references
//! - [`Target`] / [`LedgerEntry`] - the language's sum types
//! - [`Ledger`] - the root value produced by one parse
//! - [`Diagnostic`] - the coded error/warning shape both producers populate
//!
//! # Example
//!
//! ```
//! use bursa_core::{Amount, Position, Sign, Span};
//! use rust_decimal_macros::dec;
//!
//! let span = Span::new(Position::new(1, 14), Position::new(1, 21));
//! let amount = Amount::new(Sign::Negative, dec!(100), "USD", span);
//! assert_eq!(amount.signed_value(), dec!(-100));
//! assert_eq!(format!("{amount}"), "-100 USD");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod diagnostic;
pub mod entry;
pub mod intern;
pub mod ledger;
pub mod reference;
pub mod span;

pub use amount::{Amount, Sign};
pub use diagnostic::{Code, Diagnostic, Severity};
pub use entry::{Assertion, BudgetEntry, LedgerEntry, Target, Transaction};
pub use intern::{InternedStr, StringInterner};
pub use ledger::{Ledger, Meta};
pub use reference::{AccountRef, CategoryRef, TagRef};
pub use span::{Position, Span};

// Re-export the number type so downstream crates agree on it.
pub use rust_decimal::Decimal;
