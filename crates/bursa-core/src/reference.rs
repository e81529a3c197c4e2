//! Reference nodes: accounts, categories, and tags.
//!
//! The three shapes are parallel. Each holds the `:`-separated path
//! segments, the literal source text including the sigil (`@`, `&`, `#`),
//! and the source span.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::span::Span;

/// A reference to an account, written `@Name` or `@A:B:C`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Ordered, non-empty path segments.
    pub path: Vec<String>,
    /// The literal source text, including the `@` sigil.
    pub raw: String,
    /// Source range of the whole reference.
    pub span: Span,
}

/// A reference to a budget category, written `&Name` or `&A:B`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Ordered, non-empty path segments.
    pub path: Vec<String>,
    /// The literal source text, including the `&` sigil.
    pub raw: String,
    /// Source range of the whole reference.
    pub span: Span,
}

/// A tag on a transaction, written `#Name` or `#A:B`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    /// Ordered, non-empty path segments.
    pub path: Vec<String>,
    /// The literal source text, including the `#` sigil.
    pub raw: String,
    /// Source range of the whole reference.
    pub span: Span,
}

impl AccountRef {
    /// The hierarchical name without its sigil, e.g. `Assets:Checking`.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.join(":")
    }
}

impl CategoryRef {
    /// The hierarchical name without its sigil.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.join(":")
    }
}

impl TagRef {
    /// The hierarchical name without its sigil.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.join(":")
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Display for CategoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
