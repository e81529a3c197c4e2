//! Property-based tests for the parser.
//!
//! The parser must behave on arbitrary input: never panic, keep every span
//! ordered, and never emit entries without an account context.

use bursa_core::LedgerEntry;
use bursa_parser::parse;
use proptest::prelude::*;

proptest! {
    /// The parser is total: any string parses to a ledger plus diagnostics.
    #[test]
    fn parse_never_panics(source in ".{0,400}") {
        let _ = parse(&source);
    }

    /// Lines assembled from ledger-ish fragments also never panic.
    #[test]
    fn parse_never_panics_on_ledger_like_input(
        lines in prop::collection::vec(
            prop::sample::select(vec![
                ">>> META",
                ">>> BUDGET",
                ">>> LEDGER",
                "@Checking",
                "2026-01",
                "  &Groceries 500 $",
                "  2026-01-16 -100 $ &Groceries",
                "  2026-01-31 == 6800 $",
                "  ? 2026-01-26 == 1670 RM",
                "; comment",
                "garbage ###",
                "   ",
            ]),
            0..24,
        )
    ) {
        let source = lines.join("\n");
        let result = parse(&source);
        for diagnostic in result.errors.iter().chain(result.warnings.iter()) {
            prop_assert!(diagnostic.span.is_ordered());
        }
    }

    /// Every produced node carries an ordered span, and diagnostics point
    /// into the source (1-based lines that exist).
    #[test]
    fn spans_are_ordered_and_in_bounds(source in "[ -~\n]{0,300}") {
        let result = parse(&source);
        let line_count = source.split('\n').count();

        for entry in &result.data.ledger {
            prop_assert!(entry.span().is_ordered());
        }
        for entry in &result.data.budget {
            prop_assert!(entry.span.is_ordered());
        }
        for diagnostic in &result.errors {
            prop_assert!(diagnostic.span.is_ordered());
            prop_assert!(diagnostic.span.start.line >= 1);
            prop_assert!(diagnostic.span.start.line <= line_count.max(1));
        }
    }

    /// Entries only ever appear stamped with a non-empty account path.
    #[test]
    fn entries_always_carry_an_account(source in "[ -~\n]{0,300}") {
        let result = parse(&source);
        for entry in &result.data.ledger {
            match entry {
                LedgerEntry::Transaction(txn) => prop_assert!(!txn.account.path.is_empty()),
                LedgerEntry::Assertion(a) => prop_assert!(!a.account.path.is_empty()),
            }
        }
    }
}
