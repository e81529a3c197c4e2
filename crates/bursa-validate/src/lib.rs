//! Semantic validation for parsed Bursa ledgers.
//!
//! The parser resolves nothing; this crate performs the reference and
//! arithmetic checks against a finished [`Ledger`] and emits diagnostics in
//! the same shape the parser uses:
//!
//! | Code | Severity | Check |
//! |------|----------|-------|
//! | E005 | error | Transfer target is no known account and matches no `untracked:` pattern |
//! | E007 | error | Commodity not declared in META (only when META declares any) |
//! | E008 | error | Balance assertion fails against the computed running balance |
//! | E010 | error | Duplicate budget allocation for the same period and category |
//! | W001 | warning | Entry is marked unverified (`?`) |
//! | W002 | warning | Transfer to an untracked account without a draining category |
//! | W003 | warning | Entry date out of chronological order within its account |
//!
//! Running balances credit the entry's own account with its signed amount,
//! credit an `Account` target with the negated amount, and apply a `Swap`
//! amount to the same account.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::{HashMap, HashSet};

use bursa_core::{Amount, Code, Diagnostic, InternedStr, Ledger, LedgerEntry, Target};
use rust_decimal::Decimal;

/// Validate a parsed ledger, returning diagnostics of mixed severity in
/// source order per check.
#[must_use]
pub fn validate(ledger: &Ledger) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check_budget(ledger, &mut diagnostics);
    check_ledger(ledger, &mut diagnostics);
    diagnostics
}

/// Check whether an untracked pattern covers the given account name.
///
/// `@*` matches everything, `@Name` matches exactly, and `@A:…:*` matches
/// the named prefix and all of its descendants.
#[must_use]
pub fn matches_untracked(pattern: &str, account_name: &str) -> bool {
    if pattern == "@*" {
        return true;
    }
    let Some(pattern) = pattern.strip_prefix('@') else {
        return false;
    };
    match pattern.strip_suffix(":*") {
        Some(prefix) => {
            account_name == prefix
                || account_name
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(':'))
        }
        None => account_name == pattern,
    }
}

fn is_untracked(ledger: &Ledger, account_name: &str) -> bool {
    ledger
        .meta
        .untracked
        .iter()
        .any(|pattern| matches_untracked(pattern, account_name))
}

// ============================================================================
// BUDGET checks
// ============================================================================

fn check_budget(ledger: &Ledger, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for entry in &ledger.budget {
        check_commodity(ledger, &entry.amount, diagnostics);
        let key = (entry.period.clone(), entry.category.name());
        if !seen.insert(key) {
            diagnostics.push(Diagnostic::new(
                Code::DuplicateAllocation,
                format!(
                    "duplicate budget allocation for {} in {}",
                    entry.category.raw, entry.period
                ),
                entry.span,
            ));
        }
    }
}

// ============================================================================
// LEDGER checks
// ============================================================================

/// Per-account running state for the single walk over the entries.
#[derive(Debug, Default)]
struct AccountState {
    balances: HashMap<InternedStr, Decimal>,
    last_date: Option<String>,
}

fn check_ledger(ledger: &Ledger, diagnostics: &mut Vec<Diagnostic>) {
    // An account is known once any entry is stamped with it; transfer
    // targets may point at blocks that appear later in the file.
    let known: HashSet<String> = ledger
        .ledger
        .iter()
        .map(|entry| entry.account().name())
        .collect();

    let mut states: HashMap<String, AccountState> = HashMap::new();

    for entry in &ledger.ledger {
        let account_name = entry.account().name();

        if entry.unverified() {
            diagnostics.push(Diagnostic::new(
                Code::UnverifiedEntry,
                "entry is marked unverified",
                entry.span(),
            ));
        }

        check_chronology(&mut states, &account_name, entry, diagnostics);

        match entry {
            LedgerEntry::Transaction(txn) => {
                check_commodity(ledger, &txn.amount, diagnostics);
                let delta = txn.amount.signed_value();
                *states
                    .entry(account_name.clone())
                    .or_default()
                    .balances
                    .entry(txn.amount.commodity.clone())
                    .or_default() += delta;

                match &txn.target {
                    Target::Category { .. } => {}
                    Target::Account { account, category } => {
                        let target_name = account.name();
                        let untracked = is_untracked(ledger, &target_name);
                        if !known.contains(&target_name) && !untracked {
                            diagnostics.push(Diagnostic::new(
                                Code::UnknownAccount,
                                format!("transfer to unknown account '{}'", account.raw),
                                account.span,
                            ));
                        }
                        if untracked && category.is_none() {
                            diagnostics.push(Diagnostic::new(
                                Code::UntrackedWithoutCategory,
                                format!(
                                    "transfer to untracked account '{}' without a category",
                                    account.raw
                                ),
                                account.span,
                            ));
                        }
                        *states
                            .entry(target_name)
                            .or_default()
                            .balances
                            .entry(txn.amount.commodity.clone())
                            .or_default() -= delta;
                    }
                    Target::Swap { amount } => {
                        check_commodity(ledger, amount, diagnostics);
                        *states
                            .entry(account_name.clone())
                            .or_default()
                            .balances
                            .entry(amount.commodity.clone())
                            .or_default() += amount.signed_value();
                    }
                }
            }
            LedgerEntry::Assertion(assertion) => {
                check_commodity(ledger, &assertion.amount, diagnostics);
                let expected = assertion.amount.signed_value();
                let actual = states
                    .get(&account_name)
                    .and_then(|state| state.balances.get(&assertion.amount.commodity))
                    .copied()
                    .unwrap_or_default();
                if actual != expected {
                    diagnostics.push(Diagnostic::new(
                        Code::AssertionFailed,
                        format!(
                            "balance assertion failed: asserted {} {}, computed {}",
                            expected, assertion.amount.commodity, actual
                        ),
                        assertion.span,
                    ));
                }
            }
        }
    }
}

fn check_chronology(
    states: &mut HashMap<String, AccountState>,
    account_name: &str,
    entry: &LedgerEntry,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let state = states.entry(account_name.to_string()).or_default();
    let date = entry.date();
    match &state.last_date {
        // YYYY-MM-DD strings order lexicographically.
        Some(last) if date < last.as_str() => {
            diagnostics.push(Diagnostic::new(
                Code::OutOfOrderDate,
                format!("entry dated {date} appears after {last}"),
                entry.span(),
            ));
        }
        _ => state.last_date = Some(date.to_string()),
    }
}

fn check_commodity(ledger: &Ledger, amount: &Amount, diagnostics: &mut Vec<Diagnostic>) {
    // Commodity strictness is opt-in: only enforced once META declares any.
    if ledger.meta.commodities.is_empty() {
        return;
    }
    if !ledger.meta.is_declared(&amount.commodity) {
        diagnostics.push(Diagnostic::new(
            Code::UndeclaredCommodity,
            format!("commodity '{}' is not declared in META", amount.commodity),
            amount.span,
        ));
    }
}
