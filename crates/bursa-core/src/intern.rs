//! Interned commodity codes.
//!
//! A ledger names the same few commodities over and over (`USD`, `MYR`,
//! `AAPL`), so every parsed [`crate::Amount`] carries a shared handle
//! instead of a fresh `String`. [`StringInterner`] hands out one handle per
//! distinct spelling for the duration of one parse.
//!
//! Equality and hashing go through the string content: two handles compare
//! equal whether or not they came from the same interner. Commodity codes
//! are a few characters long, so content comparison needs no shortcut.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A shared, immutable commodity code.
///
/// Cloning bumps a reference count; the text itself is allocated once per
/// distinct code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternedStr(Arc<str>);

impl InternedStr {
    /// Wrap a string without deduplication.
    ///
    /// Prefer [`StringInterner::intern`] when a shared copy may already
    /// exist.
    pub fn new(code: impl Into<Arc<str>>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InternedStr {
    fn from(code: &str) -> Self {
        Self(code.into())
    }
}

impl From<String> for InternedStr {
    fn from(code: String) -> Self {
        Self(code.into())
    }
}

impl Deref for InternedStr {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Lets hash collections keyed by `InternedStr` be probed with a plain
// `&str`; content hashing above keeps the two consistent.
impl Borrow<str> for InternedStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for InternedStr {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for InternedStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InternedStr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Deduplicates commodity codes.
///
/// The parser owns one interner per `parse` call; nothing persists or is
/// shared across calls.
#[derive(Debug, Default)]
pub struct StringInterner {
    codes: HashSet<InternedStr>,
}

impl StringInterner {
    /// Create an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared handle for `code`, allocating it on first sight.
    pub fn intern(&mut self, code: &str) -> InternedStr {
        if let Some(existing) = self.codes.get(code) {
            return existing.clone();
        }
        let handle = InternedStr::new(code);
        self.codes.insert(handle.clone());
        handle
    }

    /// Number of distinct codes seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no codes have been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
