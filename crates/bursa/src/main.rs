//! Check a Bursa ledger file: parse, validate, report diagnostics.

use anyhow::{Context, Result};
use bursa_core::Severity;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

mod report;

/// Check Bursa ledger files and report errors.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The ledger file to check
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Show verbose output including timing information
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output (just use the exit code)
    #[arg(short, long)]
    quiet: bool,

    /// Skip semantic validation (syntax only)
    #[arg(long)]
    no_validate: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    let start = std::time::Instant::now();

    if !args.file.exists() {
        anyhow::bail!("file not found: {}", args.file.display());
    }
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let path = args.file.display().to_string();

    let result = bursa_parser::parse(&source);
    tracing::debug!(
        entries = result.data.ledger.len(),
        budget = result.data.budget.len(),
        errors = result.errors.len(),
        "parsed"
    );

    let mut diagnostics = Vec::new();
    diagnostics.extend(result.errors.iter().cloned());
    diagnostics.extend(result.warnings.iter().cloned());

    if !args.no_validate {
        let validation = bursa_validate::validate(&result.data);
        tracing::debug!(count = validation.len(), "validated");
        diagnostics.extend(validation);
    }

    let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    if !args.quiet {
        report::report_diagnostics(&diagnostics, &path, &source, &mut stdout)?;

        if args.verbose {
            let elapsed = start.elapsed();
            writeln!(
                stdout,
                "\nChecked {} entries in {:.2}ms",
                result.data.ledger.len() + result.data.budget.len(),
                elapsed.as_secs_f64() * 1000.0
            )?;
        }
        report::print_summary(error_count, warning_count, &mut stdout)?;
    }

    if error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
