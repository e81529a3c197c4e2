//! Diagnostic reporting with source context.
//!
//! Uses ariadne for pretty-printed messages. Bursa spans are 1-based
//! line/column pairs; ariadne wants byte ranges, so the reporter keeps a
//! per-line byte index of the source.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use bursa_core::{Diagnostic, Position, Severity};
use std::io::Write;

/// Byte offsets of every line start, for span conversion.
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    /// Index a source text.
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a 1-based position to a byte offset, clamped to the source.
    pub fn offset(&self, pos: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(pos.line.saturating_sub(1)) else {
            return self.source.len();
        };
        let line = &self.source[line_start..];
        let line = match line.find('\n') {
            Some(i) => &line[..i],
            None => line,
        };
        let within: usize = line
            .chars()
            .take(pos.col.saturating_sub(1))
            .map(char::len_utf8)
            .sum();
        line_start + within
    }
}

/// Report diagnostics to the given writer, returning the error count.
pub fn report_diagnostics<W: Write>(
    diagnostics: &[Diagnostic],
    path: &str,
    source: &str,
    writer: &mut W,
) -> std::io::Result<usize> {
    let index = LineIndex::new(source);
    let path_str = path.to_string();
    let mut error_count = 0;

    for diagnostic in diagnostics {
        let (kind, color) = match diagnostic.severity {
            Severity::Error => {
                error_count += 1;
                (ReportKind::Error, Color::Red)
            }
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };
        let start = index.offset(diagnostic.span.start);
        let end = index.offset(diagnostic.span.end).max(start);

        Report::build(kind, &path_str, start)
            .with_code(diagnostic.code.as_str())
            .with_message(&diagnostic.message)
            .with_label(
                Label::new((&path_str, start..end))
                    .with_message(diagnostic.severity.to_string())
                    .with_color(color),
            )
            .with_config(Config::default().with_compact(false))
            .finish()
            .write((&path_str, Source::from(source)), &mut *writer)?;
    }

    Ok(error_count)
}

/// Print a summary of errors and warnings.
pub fn print_summary<W: Write>(
    errors: usize,
    warnings: usize,
    writer: &mut W,
) -> std::io::Result<()> {
    if errors == 0 && warnings == 0 {
        writeln!(writer, "\x1b[32m\u{2713}\x1b[0m No errors found")?;
    } else {
        let error_text = if errors == 1 { "error" } else { "errors" };
        let warning_text = if warnings == 1 { "warning" } else { "warnings" };

        if errors > 0 && warnings > 0 {
            writeln!(
                writer,
                "\x1b[31m\u{2717}\x1b[0m {errors} {error_text}, {warnings} {warning_text}"
            )?;
        } else if errors > 0 {
            writeln!(writer, "\x1b[31m\u{2717}\x1b[0m {errors} {error_text}")?;
        } else {
            writeln!(writer, "\x1b[33m\u{26A0}\x1b[0m {warnings} {warning_text}")?;
        }
    }
    Ok(())
}
