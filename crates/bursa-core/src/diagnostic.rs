//! Diagnostics shared by the parser and the semantic validator.
//!
//! Both producers populate the same [`Diagnostic`] shape so downstream
//! tooling reports everything uniformly.
//!
//! # Codes
//!
//! | Code | Severity | Producer | Meaning |
//! |------|----------|----------|---------|
//! | E001 | error | parser | Invalid token / unknown directive / unknown section |
//! | E002 | error | parser | Malformed amount (bad number, missing commodity) |
//! | E003 | error | parser | Invalid date format |
//! | E005 | error | validator | Transfer to an unknown account |
//! | E007 | error | validator | Commodity not declared in META |
//! | E008 | error | validator | Balance assertion failed |
//! | E009 | error | parser | Invalid component order (reserved) |
//! | E010 | error | validator | Duplicate budget allocation |
//! | E011 | error | parser | Content before a section marker |
//! | W001 | warning | validator | Entry marked unverified |
//! | W002 | warning | validator | Untracked transfer without a category |
//! | W003 | warning | validator | Entry date out of chronological order |

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::span::Span;

/// Diagnostic codes, fixed across the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// E001: Invalid token or unexpected character, unknown directive,
    /// unknown section, or a missing prerequisite such as a period header.
    InvalidToken,
    /// E002: Malformed amount (bad number or missing commodity).
    MalformedAmount,
    /// E003: Invalid date format.
    InvalidDate,
    /// E005: Transfer target references an account that never appears as an
    /// `@Account` header and matches no `untracked:` pattern.
    UnknownAccount,
    /// E007: Amount uses a commodity not declared in META.
    UndeclaredCommodity,
    /// E008: Balance assertion arithmetic failed.
    AssertionFailed,
    /// E009: Invalid component order. Reserved; not emitted today.
    InvalidOrder,
    /// E010: Duplicate budget allocation for the same period and category.
    DuplicateAllocation,
    /// E011: Content before the first section marker.
    ContentBeforeSection,
    /// W001: Entry is marked unverified (`?`).
    UnverifiedEntry,
    /// W002: Transfer to an untracked account without a draining category.
    UntrackedWithoutCategory,
    /// W003: Entry date out of chronological order within its account.
    OutOfOrderDate,
}

impl Code {
    /// The wire code string, e.g. `"E001"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidToken => "E001",
            Self::MalformedAmount => "E002",
            Self::InvalidDate => "E003",
            Self::UnknownAccount => "E005",
            Self::UndeclaredCommodity => "E007",
            Self::AssertionFailed => "E008",
            Self::InvalidOrder => "E009",
            Self::DuplicateAllocation => "E010",
            Self::ContentBeforeSection => "E011",
            Self::UnverifiedEntry => "W001",
            Self::UntrackedWithoutCategory => "W002",
            Self::OutOfOrderDate => "W003",
        }
    }

    /// Parse a wire code string back into a `Code`.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "E001" => Some(Self::InvalidToken),
            "E002" => Some(Self::MalformedAmount),
            "E003" => Some(Self::InvalidDate),
            "E005" => Some(Self::UnknownAccount),
            "E007" => Some(Self::UndeclaredCommodity),
            "E008" => Some(Self::AssertionFailed),
            "E009" => Some(Self::InvalidOrder),
            "E010" => Some(Self::DuplicateAllocation),
            "E011" => Some(Self::ContentBeforeSection),
            "W001" => Some(Self::UnverifiedEntry),
            "W002" => Some(Self::UntrackedWithoutCategory),
            "W003" => Some(Self::OutOfOrderDate),
            _ => None,
        }
    }

    /// The severity this code always carries.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnverifiedEntry | Self::UntrackedWithoutCategory | Self::OutOfOrderDate => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str_opt(&s).ok_or_else(|| D::Error::custom(format!("unknown code '{s}'")))
    }
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The source is invalid.
    Error,
    /// Suspicious but valid.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A coded diagnostic attached to a source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The fixed code.
    pub code: Code,
    /// Human-readable message; tests key on `code + span + substring`.
    pub message: String,
    /// Severity, always consistent with `code.severity()`.
    pub severity: Severity,
    /// The tightest span the producer could identify.
    pub span: Span,
}

impl Diagnostic {
    /// Create a diagnostic; the severity is taken from the code.
    #[must_use]
    pub fn new(code: Code, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            severity: code.severity(),
            span,
        }
    }

    /// Whether this diagnostic is an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} at {}",
            self.severity, self.code, self.message, self.span
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    #[test]
    fn test_code_strings_round_trip() {
        for code in [
            Code::InvalidToken,
            Code::MalformedAmount,
            Code::InvalidDate,
            Code::UnknownAccount,
            Code::UndeclaredCommodity,
            Code::AssertionFailed,
            Code::InvalidOrder,
            Code::DuplicateAllocation,
            Code::ContentBeforeSection,
            Code::UnverifiedEntry,
            Code::UntrackedWithoutCategory,
            Code::OutOfOrderDate,
        ] {
            assert_eq!(Code::from_str_opt(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_severity_from_code() {
        assert_eq!(Code::InvalidToken.severity(), Severity::Error);
        assert_eq!(Code::UnverifiedEntry.severity(), Severity::Warning);
    }

    #[test]
    fn test_wire_shape() {
        let diagnostic = Diagnostic::new(
            Code::InvalidDate,
            "invalid date format",
            Span::new(Position::new(6, 3), Position::new(6, 12)),
        );
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "E003");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["span"]["start"]["line"], 6);
        assert_eq!(json["span"]["end"]["col"], 12);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            Code::UnverifiedEntry,
            "entry is marked unverified",
            Span::new(Position::new(2, 3), Position::new(2, 20)),
        );
        let rendered = format!("{diagnostic}");
        assert!(rendered.starts_with("warning[W001]"));
    }
}
