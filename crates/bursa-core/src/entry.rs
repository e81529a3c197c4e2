//! Ledger and budget entry types.
//!
//! [`Target`] and [`LedgerEntry`] are the language's two sum types. Both
//! serialize with a `kind` discriminator so consumers of the wire shape can
//! tell the variants apart without reflection.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::reference::{AccountRef, CategoryRef, TagRef};
use crate::span::Span;

/// The right-hand side of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Target {
    /// An expense/income flow to a budget category.
    Category {
        /// The category the money flows to or from.
        category: CategoryRef,
    },
    /// A transfer to another account.
    Account {
        /// The receiving account.
        account: AccountRef,
        /// The budget envelope drained by the transfer, if any.
        category: Option<CategoryRef>,
    },
    /// A commodity swap within the current account: a second amount on the
    /// same line.
    Swap {
        /// The acquired amount.
        amount: Amount,
    },
}

/// A dated transaction under an `@Account` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The literal `YYYY-MM-DD` date, validated for shape only.
    pub date: String,
    /// The `@Account` block heading the entry sits under.
    pub account: AccountRef,
    /// Whether the line was prefixed with `?`.
    pub unverified: bool,
    /// The transacted amount.
    pub amount: Amount,
    /// Where the money went.
    pub target: Target,
    /// Tags in source order, multiplicity preserved.
    pub tags: Vec<TagRef>,
    /// Trailing `;` comment, if non-empty.
    pub comment: Option<String>,
    /// Source range of the whole entry line.
    pub span: Span,
}

/// A `==` balance assertion; recorded verbatim, never evaluated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    /// The literal `YYYY-MM-DD` date, validated for shape only.
    pub date: String,
    /// The `@Account` block heading the entry sits under.
    pub account: AccountRef,
    /// Whether the line was prefixed with `?`.
    pub unverified: bool,
    /// The asserted balance.
    pub amount: Amount,
    /// Trailing `;` comment, if non-empty.
    pub comment: Option<String>,
    /// Source range of the whole entry line.
    pub span: Span,
}

/// One entry in the LEDGER section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LedgerEntry {
    /// A transaction line.
    Transaction(Transaction),
    /// A balance assertion line.
    Assertion(Assertion),
}

impl LedgerEntry {
    /// The account block this entry belongs to.
    #[must_use]
    pub const fn account(&self) -> &AccountRef {
        match self {
            Self::Transaction(txn) => &txn.account,
            Self::Assertion(assertion) => &assertion.account,
        }
    }

    /// The entry's date string.
    #[must_use]
    pub fn date(&self) -> &str {
        match self {
            Self::Transaction(txn) => &txn.date,
            Self::Assertion(assertion) => &assertion.date,
        }
    }

    /// Whether the entry was marked `?`.
    #[must_use]
    pub const fn unverified(&self) -> bool {
        match self {
            Self::Transaction(txn) => txn.unverified,
            Self::Assertion(assertion) => assertion.unverified,
        }
    }

    /// The entry's source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Transaction(txn) => txn.span,
            Self::Assertion(assertion) => assertion.span,
        }
    }
}

/// An allocation line in the BUDGET section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// The literal `YYYY-MM` period of the most recent period header.
    pub period: String,
    /// The allocated category.
    pub category: CategoryRef,
    /// The allocated amount; the sign may be unspecified.
    pub amount: Amount,
    /// Source range of the whole entry line.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Sign;
    use crate::span::Position;
    use rust_decimal_macros::dec;

    fn span() -> Span {
        Span::new(Position::new(1, 1), Position::new(1, 10))
    }

    fn account(name: &str) -> AccountRef {
        AccountRef {
            path: vec![name.to_string()],
            raw: format!("@{name}"),
            span: span(),
        }
    }

    #[test]
    fn test_entry_accessors() {
        let entry = LedgerEntry::Assertion(Assertion {
            date: "2026-01-26".to_string(),
            account: account("Maybank"),
            unverified: true,
            amount: Amount::new(Sign::Unspecified, dec!(1670), "MYR", span()),
            comment: None,
            span: span(),
        });
        assert_eq!(entry.date(), "2026-01-26");
        assert_eq!(entry.account().name(), "Maybank");
        assert!(entry.unverified());
    }

    #[test]
    fn test_target_kind_discriminator() {
        let target = Target::Swap {
            amount: Amount::new(Sign::Positive, dec!(6.5), "AAPL", span()),
        };
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["kind"], "Swap");
        assert_eq!(json["amount"]["sign"], "positive");
    }
}
