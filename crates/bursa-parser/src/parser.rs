//! Parser implementation for Bursa ledger files.
//!
//! A fused lexer+parser: one forward pass over the character stream,
//! dispatching line-by-line on the first non-whitespace character and the
//! current section, building the [`Ledger`] directly.
//!
//! # Organization
//!
//! 1. **Parser state & main loop** - section context, dispatcher
//! 2. **Section markers** - `>>> META` / `>>> BUDGET` / `>>> LEDGER`
//! 3. **META directives** - `commodity:`, `alias:`, `untracked:`
//! 4. **BUDGET lines** - period headers and allocations
//! 5. **LEDGER lines** - account headers, transactions, assertions
//! 6. **Targets** - category / account / swap, one character of lookahead
//! 7. **Primitives** - identifier, hierarchical name, amount, date, refs
//!
//! # Error recovery
//!
//! Every line parser consumes exactly one logical line, including its
//! terminating newline, on both success and failure. A failing line emits a
//! diagnostic for its first failure and appends no entry; the dispatcher
//! always re-enters at the start of the next line.

use rust_decimal::Decimal;

use bursa_core::{
    AccountRef, Amount, Assertion, BudgetEntry, CategoryRef, Code, Diagnostic, Ledger,
    LedgerEntry, Position, Sign, Span, StringInterner, TagRef, Target, Transaction,
};

use crate::cursor::Cursor;
use crate::ParseResult;

/// The exact set of recognized currency symbols.
const CURRENCY_SYMBOLS: [char; 9] = ['$', '€', '£', '¥', '₹', '₽', '₩', '₪', '฿'];

fn is_currency_symbol(c: char) -> bool {
    CURRENCY_SYMBOLS.contains(&c)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ============================================================================
// Parser state & main loop
// ============================================================================

/// The section the dispatcher is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Meta,
    Budget,
    Ledger,
}

pub(crate) struct Parser<'src> {
    cursor: Cursor<'src>,
    data: Ledger,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    section: Option<Section>,
    current_account: Option<AccountRef>,
    current_period: Option<String>,
    interner: StringInterner,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            data: Ledger::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            section: None,
            current_account: None,
            current_period: None,
            interner: StringInterner::new(),
        }
    }

    /// Run the dispatcher to end of input and hand back the result.
    pub(crate) fn run(mut self) -> ParseResult {
        loop {
            self.cursor.skip_blank_lines();
            if self.cursor.is_at_end() {
                break;
            }
            self.cursor.skip_horizontal_whitespace();
            match self.cursor.peek() {
                None => break,
                Some(';') => self.cursor.skip_line(),
                Some('>') => self.parse_section_marker(),
                Some(_) => match self.section {
                    Some(Section::Meta) => self.parse_meta_line(),
                    Some(Section::Budget) => self.parse_budget_line(),
                    Some(Section::Ledger) => self.parse_ledger_line(),
                    None => self.report_content_before_section(),
                },
            }
        }
        ParseResult {
            data: self.data,
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn error(&mut self, code: Code, message: impl Into<String>, span: Span) {
        self.errors.push(Diagnostic::new(code, message, span));
    }

    fn report_content_before_section(&mut self) {
        let start = self.cursor.mark_start();
        let offset = self.cursor.offset();
        self.cursor.skip_to_eol();
        let content = self.cursor.text_from(offset).trim_end();
        let span = Span::new(start, start.advance(content.chars().count()));
        self.error(
            Code::ContentBeforeSection,
            "content before a section marker; expected '>>> META', '>>> BUDGET', or '>>> LEDGER'",
            span,
        );
        self.cursor.skip_line();
    }

    // ========================================================================
    // Section markers
    // ========================================================================

    /// Parse a `>>> NAME` line. Invariant on entry: the cursor is at `>`.
    fn parse_section_marker(&mut self) {
        let start = self.cursor.mark_start();
        let mut arrows = 0;
        while arrows < 3 && self.cursor.eat('>') {
            arrows += 1;
        }
        if arrows != 3 {
            let span = self.cursor.span_from(start);
            self.error(Code::InvalidToken, "expected '>>>'", span);
            self.cursor.skip_line();
            return;
        }
        self.cursor.skip_horizontal_whitespace();
        let name_start = self.cursor.mark_start();
        let name = self.identifier();
        let span = self.cursor.span_from(name_start);
        let section = match name {
            "META" => Some(Section::Meta),
            "BUDGET" => Some(Section::Budget),
            "LEDGER" => Some(Section::Ledger),
            "" => {
                self.error(
                    Code::InvalidToken,
                    "expected a section name after '>>>'",
                    self.cursor.span_from(start),
                );
                None
            }
            other => {
                self.error(Code::InvalidToken, format!("unknown section '{other}'"), span);
                None
            }
        };
        if let Some(section) = section {
            // Entering a section resets the stateful context.
            self.section = Some(section);
            self.current_account = None;
            self.current_period = None;
        }
        self.cursor.skip_line();
    }

    // ========================================================================
    // META directives
    // ========================================================================

    fn parse_meta_line(&mut self) {
        let start = self.cursor.mark_start();
        let keyword = self.identifier();
        if keyword.is_empty() {
            let c = self.cursor.peek().unwrap_or(' ');
            self.error(
                Code::InvalidToken,
                format!("unexpected character '{c}'"),
                Span::new(start, start.advance(1)),
            );
            self.cursor.skip_line();
            return;
        }
        let keyword_span = self.cursor.span_from(start);
        if !self.cursor.eat(':') {
            self.error(
                Code::InvalidToken,
                format!("expected ':' after directive '{keyword}'"),
                keyword_span,
            );
            self.cursor.skip_line();
            return;
        }
        self.cursor.skip_horizontal_whitespace();
        match keyword {
            "commodity" => self.parse_commodity_directive(),
            "alias" => self.parse_alias_directive(),
            "untracked" => self.parse_untracked_directive(),
            other => {
                self.error(
                    Code::InvalidToken,
                    format!("unknown directive '{other}'"),
                    keyword_span,
                );
            }
        }
        self.cursor.skip_line();
    }

    fn parse_commodity_directive(&mut self) {
        let start = self.cursor.mark_start();
        let name = self.identifier();
        if name.is_empty() {
            self.error(
                Code::InvalidToken,
                "expected a commodity name",
                Span::point(start),
            );
            return;
        }
        let code = self.interner.intern(name);
        self.data.meta.commodities.insert(code);
    }

    fn parse_alias_directive(&mut self) {
        let start = self.cursor.mark_start();
        let symbol = match self.cursor.peek() {
            Some(c) if is_currency_symbol(c) => {
                self.cursor.advance();
                c.to_string()
            }
            Some(c) if is_identifier_char(c) => self.identifier().to_string(),
            _ => {
                self.error(
                    Code::InvalidToken,
                    "expected an alias symbol",
                    Span::point(start),
                );
                return;
            }
        };
        self.cursor.skip_horizontal_whitespace();
        if !self.cursor.eat('=') {
            self.error(
                Code::InvalidToken,
                format!("expected '=' after alias symbol '{symbol}'"),
                Span::point(self.cursor.position()),
            );
            return;
        }
        self.cursor.skip_horizontal_whitespace();
        let target_start = self.cursor.mark_start();
        let target = self.identifier();
        if target.is_empty() {
            self.error(
                Code::InvalidToken,
                "expected a commodity name after '='",
                Span::point(target_start),
            );
            return;
        }
        // The right-hand side of an alias is implicitly a declared commodity.
        let commodity = self.interner.intern(target);
        self.data.meta.commodities.insert(commodity.clone());
        self.data.meta.aliases.insert(symbol, commodity);
    }

    fn parse_untracked_directive(&mut self) {
        let start = self.cursor.mark_start();
        let raw_start = self.cursor.offset();
        if !self.cursor.eat('@') {
            self.error(
                Code::InvalidToken,
                "expected '@' in untracked pattern",
                Span::point(start),
            );
            return;
        }
        if self.cursor.eat('*') {
            // Bare `@*` matches everything.
        } else {
            let path = self.hierarchical_name();
            if path.is_empty() {
                self.error(
                    Code::InvalidToken,
                    "expected an account pattern after '@'",
                    self.cursor.span_from(start),
                );
                return;
            }
            if self.cursor.peek() == Some(':') && self.cursor.peek_second() == Some('*') {
                self.cursor.advance();
                self.cursor.advance();
            }
        }
        let raw = self.cursor.text_from(raw_start).to_string();
        self.data.meta.untracked.push(raw);
    }

    // ========================================================================
    // BUDGET lines
    // ========================================================================

    fn parse_budget_line(&mut self) {
        let start = self.cursor.mark_start();
        match self.cursor.peek() {
            Some(c) if c.is_ascii_digit() => {
                if let Some(period) = self.period() {
                    self.current_period = Some(period);
                }
                self.cursor.skip_line();
            }
            Some('&') => {
                let Some(period) = self.current_period.clone() else {
                    self.error(
                        Code::InvalidToken,
                        "budget entry before a period header",
                        Span::new(start, start.advance(1)),
                    );
                    self.cursor.skip_line();
                    return;
                };
                let Some(category) = self.category_ref() else {
                    self.cursor.skip_line();
                    return;
                };
                self.cursor.skip_horizontal_whitespace();
                let Some(amount) = self.amount() else {
                    self.cursor.skip_line();
                    return;
                };
                let span = self.cursor.span_from(start);
                self.data.budget.push(BudgetEntry {
                    period,
                    category,
                    amount,
                    span,
                });
                self.cursor.skip_line();
            }
            Some(c) => {
                self.error(
                    Code::InvalidToken,
                    format!("invalid token '{c}' in BUDGET section"),
                    Span::new(start, start.advance(1)),
                );
                self.cursor.skip_line();
            }
            None => self.cursor.skip_line(),
        }
    }

    // ========================================================================
    // LEDGER lines
    // ========================================================================

    fn parse_ledger_line(&mut self) {
        let start = self.cursor.mark_start();
        match self.cursor.peek() {
            Some('@') => {
                if let Some(account) = self.account_ref() {
                    self.current_account = Some(account);
                }
                self.cursor.skip_line();
            }
            Some(c) if c == '?' || c.is_ascii_digit() => {
                let Some(account) = self.current_account.clone() else {
                    self.error(
                        Code::InvalidToken,
                        "ledger entry before an '@Account' header",
                        Span::new(start, start.advance(1)),
                    );
                    self.cursor.skip_line();
                    return;
                };
                self.parse_ledger_entry(start, account);
                self.cursor.skip_line();
            }
            Some(c) => {
                self.error(
                    Code::InvalidToken,
                    format!("invalid token '{c}' in LEDGER section"),
                    Span::new(start, start.advance(1)),
                );
                self.cursor.skip_line();
            }
            None => self.cursor.skip_line(),
        }
    }

    /// Parse one dated entry under `account`. The caller consumes the rest
    /// of the line afterwards, so failure paths simply return.
    fn parse_ledger_entry(&mut self, start: Position, account: AccountRef) {
        let mut unverified = false;
        if self.cursor.eat('?') {
            unverified = true;
            self.cursor.skip_horizontal_whitespace();
        }
        let Some(date) = self.date() else {
            return;
        };
        self.cursor.skip_horizontal_whitespace();

        if self.cursor.peek() == Some('=') && self.cursor.peek_second() == Some('=') {
            // Assertion: `== AMOUNT [; comment]`
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.skip_horizontal_whitespace();
            let Some(amount) = self.amount() else {
                return;
            };
            let mut end = self.cursor.position();
            self.cursor.skip_horizontal_whitespace();
            let mut comment = None;
            if self.cursor.peek() == Some(';') {
                comment = self.comment();
                end = self.cursor.position();
            }
            self.data.ledger.push(LedgerEntry::Assertion(Assertion {
                date,
                account,
                unverified,
                amount,
                comment,
                span: Span::new(start, end),
            }));
        } else {
            // Transaction: `AMOUNT TARGET [#tag ...] [; comment]`
            let Some(amount) = self.amount() else {
                return;
            };
            self.cursor.skip_horizontal_whitespace();
            let Some(target) = self.parse_target() else {
                return;
            };
            let mut end = self.cursor.position();
            let mut tags = Vec::new();
            loop {
                self.cursor.skip_horizontal_whitespace();
                if self.cursor.peek() == Some('#') {
                    let Some(tag) = self.tag_ref() else {
                        return;
                    };
                    end = self.cursor.position();
                    tags.push(tag);
                } else {
                    break;
                }
            }
            let mut comment = None;
            if self.cursor.peek() == Some(';') {
                comment = self.comment();
                end = self.cursor.position();
            }
            self.data.ledger.push(LedgerEntry::Transaction(Transaction {
                date,
                account,
                unverified,
                amount,
                target,
                tags,
                comment,
                span: Span::new(start, end),
            }));
        }
    }

    // ========================================================================
    // Targets
    // ========================================================================

    /// Parse the right-hand side of a transaction. The shape is decided by
    /// the single character at the cursor.
    fn parse_target(&mut self) -> Option<Target> {
        match self.cursor.peek() {
            Some('&') => self
                .category_ref()
                .map(|category| Target::Category { category }),
            Some('@') => {
                let account = self.account_ref()?;
                // An `&Category` may follow a transfer target; back out of
                // the whitespace if it does not.
                let checkpoint = self.cursor;
                self.cursor.skip_horizontal_whitespace();
                let category = if self.cursor.peek() == Some('&') {
                    Some(self.category_ref()?)
                } else {
                    self.cursor = checkpoint;
                    None
                };
                Some(Target::Account { account, category })
            }
            Some(c) if c == '+' || c == '-' || c.is_ascii_digit() || is_currency_symbol(c) => {
                self.amount().map(|amount| Target::Swap { amount })
            }
            other => {
                let at = self.cursor.position();
                let span = match other {
                    Some(_) => Span::new(at, at.advance(1)),
                    None => Span::point(at),
                };
                self.error(
                    Code::InvalidToken,
                    "invalid transfer target: expected a category, an account, or an amount",
                    span,
                );
                None
            }
        }
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Maximal run of `[A-Za-z0-9_]`; may be empty, which is a parse failure
    /// at the call site.
    fn identifier(&mut self) -> &'src str {
        let start = self.cursor.offset();
        while matches!(self.cursor.peek(), Some(c) if is_identifier_char(c)) {
            self.cursor.advance();
        }
        self.cursor.text_from(start)
    }

    /// One identifier, then zero or more `:`-identifier repetitions. A
    /// trailing `:` not followed by an identifier character is left alone.
    fn hierarchical_name(&mut self) -> Vec<String> {
        let mut path = Vec::new();
        let first = self.identifier();
        if first.is_empty() {
            return path;
        }
        path.push(first.to_string());
        while self.cursor.peek() == Some(':')
            && matches!(self.cursor.peek_second(), Some(c) if is_identifier_char(c))
        {
            self.cursor.advance();
            let segment = self.identifier();
            path.push(segment.to_string());
        }
        path
    }

    /// Shared body of the three sigil-prefixed reference parsers. Invariant
    /// on entry: the cursor is at the sigil.
    fn reference_parts(&mut self, sigil: char, what: &str) -> Option<(Vec<String>, String, Span)> {
        let start = self.cursor.mark_start();
        let raw_start = self.cursor.offset();
        self.cursor.advance();
        let path = self.hierarchical_name();
        if path.is_empty() {
            let span = self.cursor.span_from(start);
            self.error(
                Code::InvalidToken,
                format!("expected {what} name after '{sigil}'"),
                span,
            );
            return None;
        }
        let raw = self.cursor.text_from(raw_start).to_string();
        Some((path, raw, self.cursor.span_from(start)))
    }

    fn account_ref(&mut self) -> Option<AccountRef> {
        let (path, raw, span) = self.reference_parts('@', "an account")?;
        Some(AccountRef { path, raw, span })
    }

    fn category_ref(&mut self) -> Option<CategoryRef> {
        let (path, raw, span) = self.reference_parts('&', "a category")?;
        Some(CategoryRef { path, raw, span })
    }

    fn tag_ref(&mut self) -> Option<TagRef> {
        let (path, raw, span) = self.reference_parts('#', "a tag")?;
        Some(TagRef { path, raw, span })
    }

    /// Amount grammar: optional sign, optional leading currency symbol, a
    /// decimal number, and (when no leading symbol was seen) an optional
    /// trailing currency symbol or identifier. A commodity is required in
    /// one of the two positions. Alias resolution happens here, against the
    /// alias map as declared so far.
    fn amount(&mut self) -> Option<Amount> {
        let start = self.cursor.mark_start();
        let sign = match self.cursor.peek() {
            Some('+') => {
                self.cursor.advance();
                Sign::Positive
            }
            Some('-') => {
                self.cursor.advance();
                Sign::Negative
            }
            _ => Sign::Unspecified,
        };

        let mut commodity_text: Option<String> = None;
        if let Some(c) = self.cursor.peek() {
            if is_currency_symbol(c) {
                self.cursor.advance();
                commodity_text = Some(c.to_string());
            }
        }

        let number_start = self.cursor.offset();
        let mut digits = 0usize;
        let mut dots = 0usize;
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_digit() => {
                    digits += 1;
                    self.cursor.advance();
                }
                Some('.') => {
                    dots += 1;
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        let number_text = self.cursor.text_from(number_start);
        if digits == 0 || dots > 1 {
            let span = self.cursor.span_from(start);
            let message = if number_text.is_empty() {
                "malformed amount: expected a number".to_string()
            } else {
                format!("malformed amount: invalid number '{number_text}'")
            };
            self.error(Code::MalformedAmount, message, span);
            return None;
        }
        let Ok(value) = parse_decimal(number_text) else {
            let span = self.cursor.span_from(start);
            self.error(
                Code::MalformedAmount,
                format!("malformed amount: invalid number '{number_text}'"),
                span,
            );
            return None;
        };
        let after_number = self.cursor.position();

        if commodity_text.is_none() {
            self.cursor.skip_horizontal_whitespace();
            match self.cursor.peek() {
                Some(c) if is_currency_symbol(c) => {
                    self.cursor.advance();
                    commodity_text = Some(c.to_string());
                }
                Some(c) if is_identifier_char(c) => {
                    commodity_text = Some(self.identifier().to_string());
                }
                _ => {}
            }
        }

        let Some(symbol) = commodity_text else {
            self.error(
                Code::MalformedAmount,
                "malformed amount: missing commodity",
                Span::new(start, after_number),
            );
            return None;
        };

        let commodity = match self.data.meta.resolve_alias(&symbol) {
            Some(resolved) => resolved.clone(),
            None => self.interner.intern(&symbol),
        };
        Some(Amount {
            sign,
            value,
            commodity,
            span: self.cursor.span_from(start),
        })
    }

    /// Fixed-shape `YYYY-MM-DD`. Consumes the maximal `[0-9-]` lexeme so a
    /// malformed date like `2026-1-20` gets one tight span.
    fn date(&mut self) -> Option<String> {
        let start = self.cursor.mark_start();
        let raw_start = self.cursor.offset();
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit() || c == '-') {
            self.cursor.advance();
        }
        let text = self.cursor.text_from(raw_start);
        if is_date_shape(text) {
            Some(text.to_string())
        } else {
            let span = self.cursor.span_from(start);
            self.error(
                Code::InvalidDate,
                format!("invalid date format '{text}'; expected YYYY-MM-DD"),
                span,
            );
            None
        }
    }

    /// Fixed-shape `YYYY-MM`.
    fn period(&mut self) -> Option<String> {
        let start = self.cursor.mark_start();
        let raw_start = self.cursor.offset();
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit() || c == '-') {
            self.cursor.advance();
        }
        let text = self.cursor.text_from(raw_start);
        if is_period_shape(text) {
            Some(text.to_string())
        } else {
            let span = self.cursor.span_from(start);
            self.error(
                Code::InvalidToken,
                format!("invalid period '{text}'; expected YYYY-MM"),
                span,
            );
            None
        }
    }

    /// Trailing `;` comment: the sigil, horizontal whitespace, then the rest
    /// of the line trimmed of trailing whitespace. Empty comments are `None`.
    /// Invariant on entry: the cursor is at `;`.
    fn comment(&mut self) -> Option<String> {
        self.cursor.advance();
        self.cursor.skip_horizontal_whitespace();
        let start = self.cursor.offset();
        self.cursor.skip_to_eol();
        let text = self.cursor.text_from(start).trim_end();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Decimal conversion tolerant of the grammar's edge spellings (`.5`, `5.`),
/// which `Decimal::from_str` does not all accept.
fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = text.strip_suffix('.').unwrap_or(text);
    if let Some(fraction) = trimmed.strip_prefix('.') {
        return format!("0.{fraction}").parse();
    }
    trimmed.parse()
}

fn is_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == 4 || i == 7 {
                *b == b'-'
            } else {
                b.is_ascii_digit()
            }
        })
}

fn is_period_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 { *b == b'-' } else { b.is_ascii_digit() })
}
