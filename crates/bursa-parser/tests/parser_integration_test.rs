//! Integration tests for the parser crate.
//!
//! Covers the canonical fixture, every target shape, error recovery, and
//! the universal invariants the parser guarantees on arbitrary input.

use bursa_core::{Code, LedgerEntry, Severity, Sign, Target};
use bursa_parser::{parse, ParseResult};
use rust_decimal_macros::dec;

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_ok(source: &str) -> ParseResult {
    let result = parse(source);
    assert!(
        result.errors.is_empty(),
        "expected no errors, got: {:?}",
        result.errors
    );
    result
}

fn transactions(result: &ParseResult) -> Vec<&bursa_core::Transaction> {
    result
        .data
        .ledger
        .iter()
        .filter_map(|e| match e {
            LedgerEntry::Transaction(txn) => Some(txn),
            LedgerEntry::Assertion(_) => None,
        })
        .collect()
}

const CANONICAL: &str = "\
>>> META
commodity: USD
alias: $ = USD
alias: RM = MYR
untracked: @Brokerage

>>> BUDGET
2026-01
  &Groceries 500 $
  &Dining -50 $

>>> LEDGER
@Checking
  2026-01-01 +5000 $ &Opening:Balance
  2026-01-16 -100 $ &Groceries #traderjoes
  2026-01-20 -1000 $ @Brokerage &Investing
  2026-01-31 == 6800 $

@Brokerage
  2026-01-21 -1000 $ +6.5 AAPL

@Maybank
  ? 2026-01-26 == 1670 RM
";

// ============================================================================
// Canonical Fixture
// ============================================================================

#[test]
fn test_canonical_fixture_parses_clean() {
    let result = parse_ok(CANONICAL);

    assert!(result.data.meta.is_declared("USD"));
    assert!(result.data.meta.is_declared("MYR"));
    assert_eq!(result.data.meta.untracked, vec!["@Brokerage"]);
    assert_eq!(result.data.budget.len(), 2);
    assert_eq!(result.data.ledger.len(), 6);
}

#[test]
fn test_canonical_fixture_entry_accounts() {
    let result = parse_ok(CANONICAL);
    let accounts: Vec<_> = result
        .data
        .ledger
        .iter()
        .map(|e| e.account().name())
        .collect();
    assert_eq!(
        accounts,
        vec![
            "Checking", "Checking", "Checking", "Checking", "Brokerage", "Maybank"
        ]
    );
}

#[test]
fn test_canonical_fixture_alias_resolution() {
    let result = parse_ok(CANONICAL);
    for entry in &result.data.budget {
        assert_eq!(entry.amount.commodity, "USD");
    }
    let LedgerEntry::Assertion(assertion) = result.data.ledger.last().unwrap() else {
        panic!("expected the Maybank assertion last");
    };
    assert_eq!(assertion.amount.commodity, "MYR");
}

// ============================================================================
// Seed Scenarios
// ============================================================================

#[test]
fn test_seed_aliases_resolve() {
    let result = parse_ok(">>> META\nalias: $ = USD\n>>> LEDGER\n@A\n  2026-01-01 +5 $ &Op\n");
    assert_eq!(result.data.ledger.len(), 1);
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    assert_eq!(txn.amount.value, dec!(5));
    assert_eq!(txn.amount.commodity, "USD");
    let Target::Category { category } = &txn.target else {
        panic!("expected a category target");
    };
    assert_eq!(category.raw, "&Op");
}

#[test]
fn test_seed_swap_target() {
    let result = parse_ok(">>> LEDGER\n@Brokerage\n  2026-01-21 -1000 $ +6.5 AAPL\n");
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    assert_eq!(txn.amount.value, dec!(1000));
    assert_eq!(txn.amount.sign, Sign::Negative);
    let Target::Swap { amount } = &txn.target else {
        panic!("expected a swap target");
    };
    assert_eq!(amount.sign, Sign::Positive);
    assert_eq!(amount.value, dec!(6.5));
    assert_eq!(amount.commodity, "AAPL");
}

#[test]
fn test_seed_untracked_transfer_with_category() {
    let result = parse_ok(">>> LEDGER\n@Checking\n  2026-01-20 -1000 $ @Brokerage &Investing\n");
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    let Target::Account { account, category } = &txn.target else {
        panic!("expected an account target");
    };
    assert_eq!(account.raw, "@Brokerage");
    assert_eq!(category.as_ref().unwrap().raw, "&Investing");
}

#[test]
fn test_seed_unverified_assertion() {
    let result =
        parse_ok(">>> META\nalias: RM = MYR\n>>> LEDGER\n@Maybank\n  ? 2026-01-26 == 1670 RM\n");
    let LedgerEntry::Assertion(assertion) = &result.data.ledger[0] else {
        panic!("expected an assertion");
    };
    assert_eq!(assertion.account.name(), "Maybank");
    assert!(assertion.unverified);
    assert_eq!(assertion.amount.value, dec!(1670));
    assert_eq!(assertion.amount.commodity, "MYR");
}

#[test]
fn test_seed_error_recovery() {
    let source = ">>> LEDGER\n@A\n  2026-1-20 -5 $ &X\n  2026-01-21 -7 $ &Y\n";
    let result = parse(source);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, Code::InvalidDate);
    assert_eq!(result.errors[0].severity, Severity::Error);
    assert_eq!(result.errors[0].span.start.line, 3);

    // The well-formed line after the bad one still lands.
    assert_eq!(result.data.ledger.len(), 1);
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    assert_eq!(txn.date, "2026-01-21");
}

#[test]
fn test_seed_content_before_section() {
    let result = parse("foo\n>>> META\ncommodity: USD");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, Code::ContentBeforeSection);
    assert_eq!(result.errors[0].span.start.line, 1);
    assert_eq!(result.errors[0].span.start.col, 1);
    assert!(result.data.meta.is_declared("USD"));
}

// ============================================================================
// Universal Invariants
// ============================================================================

#[test]
fn test_empty_input_yields_empty_ledger() {
    let result = parse("");
    assert!(result.data.is_empty());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_all_spans_are_ordered() {
    let result = parse(CANONICAL);
    for entry in &result.data.ledger {
        assert!(entry.span().is_ordered(), "bad span: {:?}", entry.span());
    }
    for entry in &result.data.budget {
        assert!(entry.span.is_ordered());
        assert!(entry.amount.span.is_ordered());
        assert!(entry.category.span.is_ordered());
    }
}

#[test]
fn test_every_account_is_a_preceding_header() {
    let result = parse_ok(CANONICAL);
    // Headers appear in the source text before the entries stamped with them.
    for entry in &result.data.ledger {
        let header = format!("@{}", entry.account().name());
        let header_line = CANONICAL
            .lines()
            .position(|l| l.trim() == header)
            .expect("header exists")
            + 1;
        assert!(header_line < entry.span().start.line);
    }
}

#[test]
fn test_commodities_contain_alias_targets() {
    let result = parse_ok(">>> META\nalias: $ = USD\nalias: RM = MYR\n");
    for target in result.data.meta.aliases.values() {
        assert!(result.data.meta.commodities.contains(target));
    }
}

#[test]
fn test_appending_a_line_extends_the_prefix() {
    let base = ">>> LEDGER\n@A\n  2026-01-01 -5 USD &X\n";
    let extended = format!("{base}  2026-01-02 -7 USD &Y\n");

    let before = parse_ok(base);
    let after = parse_ok(&extended);

    assert_eq!(after.data.ledger.len(), before.data.ledger.len() + 1);
    for (a, b) in before.data.ledger.iter().zip(after.data.ledger.iter()) {
        assert_eq!(a, b);
    }
}

// ============================================================================
// Boundary Behaviors
// ============================================================================

#[test]
fn test_comment_only_line_in_every_section() {
    for section in ["META", "BUDGET", "LEDGER"] {
        let source = format!(">>> {section}\n   ; just a comment\n");
        let result = parse_ok(&source);
        assert!(result.data.budget.is_empty());
        assert!(result.data.ledger.is_empty());
    }
}

#[test]
fn test_repeated_account_headers() {
    let source = ">>> LEDGER\n@A\n  2026-01-01 -1 USD &X\n@B\n  2026-01-02 -2 USD &X\n@A\n  2026-01-03 -3 USD &X\n";
    let result = parse_ok(source);
    let txns = transactions(&result);
    assert_eq!(txns[0].account.name(), "A");
    assert_eq!(txns[1].account.name(), "B");
    assert_eq!(txns[2].account.name(), "A");
}

#[test]
fn test_question_mark_not_before_date_is_an_error() {
    let result = parse(">>> META\n?\n");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, Code::InvalidToken);
}

#[test]
fn test_double_equals_only_after_date() {
    // An amount right after the date is a transaction, not an assertion.
    let result = parse_ok(">>> LEDGER\n@A\n  2026-01-01 -5 USD &X\n");
    assert!(matches!(
        result.data.ledger[0],
        LedgerEntry::Transaction(_)
    ));

    let result = parse_ok(">>> LEDGER\n@A\n  2026-01-01 == 5 USD\n");
    assert!(matches!(result.data.ledger[0], LedgerEntry::Assertion(_)));
}

#[test]
fn test_single_equals_is_malformed_amount() {
    let result = parse(">>> LEDGER\n@A\n  2026-01-01 = 5 USD\n");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, Code::MalformedAmount);
    assert!(result.data.ledger.is_empty());
}

#[test]
fn test_budget_period_switches() {
    let source = ">>> BUDGET\n2026-01\n  &A 1 USD\n2026-02\n  &B 2 USD\n";
    let result = parse_ok(source);
    assert_eq!(result.data.budget[0].period, "2026-01");
    assert_eq!(result.data.budget[1].period, "2026-02");
}

#[test]
fn test_sections_may_repeat_and_interleave() {
    let source = ">>> META\ncommodity: USD\n>>> LEDGER\n@A\n  2026-01-01 -1 USD &X\n>>> META\ncommodity: MYR\n>>> LEDGER\n@B\n  2026-01-02 -2 USD &X\n";
    let result = parse_ok(source);
    assert!(result.data.meta.is_declared("USD"));
    assert!(result.data.meta.is_declared("MYR"));
    let accounts: Vec<_> = result
        .data
        .ledger
        .iter()
        .map(|e| e.account().name())
        .collect();
    assert_eq!(accounts, vec!["A", "B"]);
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_multiple_bad_lines_each_get_one_diagnostic() {
    let source = ">>> LEDGER\n@A\n  2026-1-1 -5 USD &X\n  bogus\n  2026-01-03 -5 USD &X\n";
    let result = parse(source);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].code, Code::InvalidDate);
    assert_eq!(result.errors[1].code, Code::InvalidToken);
    assert_eq!(result.data.ledger.len(), 1);
}

#[test]
fn test_no_partial_entries_on_failure() {
    // Amount parses, target fails: nothing is appended.
    let result = parse(">>> LEDGER\n@A\n  2026-01-01 -5 USD\n");
    assert_eq!(result.errors.len(), 1);
    assert!(result.data.ledger.is_empty());
}

#[test]
fn test_section_marker_restores_context_after_errors() {
    let source = "junk\n>>> LEDGER\n@A\n  2026-01-01 -5 USD &X\n";
    let result = parse(source);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.data.ledger.len(), 1);
}

#[test]
fn test_bad_section_marker() {
    let result = parse(">> LEDGER\n");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains(">>>"));
}

#[test]
fn test_diagnostics_do_not_disturb_earlier_entries() {
    let source = ">>> LEDGER\n@A\n  2026-01-01 -5 USD &X\n  garbage\n";
    let result = parse(source);
    assert_eq!(result.data.ledger.len(), 1);
    assert_eq!(result.errors.len(), 1);
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    assert_eq!(txn.date, "2026-01-01");
}

// ============================================================================
// Spans
// ============================================================================

#[test]
fn test_error_span_points_at_offending_token() {
    let result = parse(">>> LEDGER\n@A\n  2026-1-20 -5 USD &X\n");
    let span = result.errors[0].span;
    assert_eq!(span.start.line, 3);
    assert_eq!(span.start.col, 3);
    // "2026-1-20" is nine characters wide.
    assert_eq!(span.end.col, 12);
}

#[test]
fn test_amount_span() {
    let result = parse_ok(">>> LEDGER\n@A\n  2026-01-01 -100 USD &X\n");
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    assert_eq!(txn.amount.span.start.col, 14);
    assert_eq!(txn.amount.span.end.col, 22);
}

#[test]
fn test_ref_span_and_raw_agree() {
    let result = parse_ok(">>> LEDGER\n@Assets:Checking\n  2026-01-01 -5 USD &Food:Out\n");
    let LedgerEntry::Transaction(txn) = &result.data.ledger[0] else {
        panic!("expected a transaction");
    };
    let Target::Category { category } = &txn.target else {
        panic!("expected a category target");
    };
    let width = category.span.end.col - category.span.start.col;
    assert_eq!(width, category.raw.chars().count());
}

// ============================================================================
// Wire Shape
// ============================================================================

#[test]
fn test_diagnostic_wire_shape() {
    let result = parse("foo\n>>> META\n");
    let json = serde_json::to_value(&result.errors[0]).unwrap();
    assert_eq!(json["code"], "E011");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["span"]["start"]["line"], 1);
    assert_eq!(json["span"]["start"]["col"], 1);
    assert_eq!(json["span"]["end"]["line"], 1);
    assert_eq!(json["span"]["end"]["col"], 4);
}

#[test]
fn test_ledger_serializes_with_kind_tags() {
    let result = parse_ok(">>> LEDGER\n@A\n  2026-01-01 -5 USD @B\n  2026-01-02 == 10 USD\n");
    let json = serde_json::to_value(&result.data.ledger).unwrap();
    assert_eq!(json[0]["kind"], "Transaction");
    assert_eq!(json[0]["target"]["kind"], "Account");
    assert_eq!(json[1]["kind"], "Assertion");
}
