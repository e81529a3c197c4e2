//! The ledger root and its META table.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::entry::{BudgetEntry, LedgerEntry};
use crate::intern::InternedStr;

/// Declarations from the META section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Declared commodity codes, including the right-hand side of every
    /// alias.
    pub commodities: HashSet<InternedStr>,
    /// Alias symbol → canonical commodity.
    pub aliases: HashMap<String, InternedStr>,
    /// Untracked-account patterns, stored raw: `@*`, `@Name`, or
    /// `@Name:…:*`. Interpretation is the validator's job.
    pub untracked: Vec<String>,
}

impl Meta {
    /// Resolve a symbol or identifier through the alias map.
    ///
    /// Returns the mapped commodity when `symbol` is a declared alias, and
    /// `None` otherwise (the caller keeps the spelling as written).
    #[must_use]
    pub fn resolve_alias(&self, symbol: &str) -> Option<&InternedStr> {
        self.aliases.get(symbol)
    }

    /// Whether a commodity code has been declared.
    #[must_use]
    pub fn is_declared(&self, commodity: &str) -> bool {
        self.commodities.contains(commodity)
    }
}

/// The root value produced by one parse: META declarations plus the BUDGET
/// and LEDGER sections in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// META declarations.
    pub meta: Meta,
    /// BUDGET entries in encounter order.
    pub budget: Vec<BudgetEntry>,
    /// LEDGER entries in encounter order.
    pub ledger: Vec<LedgerEntry>,
}

impl Ledger {
    /// Check whether the ledger holds no entries and no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.budget.is_empty()
            && self.ledger.is_empty()
            && self.meta.commodities.is_empty()
            && self.meta.aliases.is_empty()
            && self.meta.untracked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger() {
        assert!(Ledger::default().is_empty());
    }

    #[test]
    fn test_alias_resolution() {
        let mut meta = Meta::default();
        let usd = InternedStr::new("USD");
        meta.commodities.insert(usd.clone());
        meta.aliases.insert("$".to_string(), usd);

        assert_eq!(meta.resolve_alias("$").map(InternedStr::as_str), Some("USD"));
        assert_eq!(meta.resolve_alias("RM"), None);
        assert!(meta.is_declared("USD"));
        assert!(!meta.is_declared("MYR"));
    }
}
