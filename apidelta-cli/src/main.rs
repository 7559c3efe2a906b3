//! apidelta CLI - Detect breaking API changes between two versions of a codebase
//!
//! Compares two files or two directory trees, classifies every API change
//! by semantic-versioning severity and recommends a version bump.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::compare::{self, CompareArgs, Verdict};
use config::ApideltaConfig;
use output::OutputFormat;

/// Exit code for usage errors and runs that could not complete.
const EXIT_USAGE: u8 = 2;

/// Parse and validate a job count (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value == 0 {
        return Err("jobs must be at least 1".to_string());
    }
    Ok(value)
}

/// Detect breaking API changes between two versions of a codebase.
#[derive(Parser)]
#[command(name = "apidelta")]
#[command(author, version)]
#[command(about = "Detect breaking API changes and recommend a semantic version bump")]
#[command(
    long_about = "apidelta extracts the public API of Python, TypeScript and JavaScript sources,\nmatches old against new, and classifies every change as breaking, compatible,\npatch or internal."
)]
#[command(after_help = "Examples:
  apidelta old/api.py new/api.py
  apidelta v1/src v2/src -p '*.py' --fail-on-breaking
  apidelta v1 v2 report.json --format json

Exit codes:
  0  comparison completed
  1  breaking changes found (with --fail-on-breaking)
  2  usage error")]
pub struct Cli {
    /// Old version: a source file or a directory
    old: PathBuf,

    /// New version: a source file or a directory
    new: PathBuf,

    /// Write the structured JSON report to this file
    output: Option<PathBuf>,

    /// Stdout format (overrides config default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Exit with status 1 when breaking changes are found
    #[arg(long)]
    fail_on_breaking: bool,

    /// Only compare files matching this glob (directory mode, repeatable)
    #[arg(short, long = "pattern")]
    patterns: Vec<String>,

    /// Skip files matching this glob (directory mode, repeatable)
    #[arg(long)]
    ignore: Vec<String>,

    /// Force one language analyzer instead of choosing by extension
    #[arg(long)]
    language: Option<String>,

    /// Worker threads for directory comparisons (default: number of CPUs)
    #[arg(short, long, value_parser = parse_jobs)]
    jobs: Option<usize>,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn compare_args(&self) -> CompareArgs {
        CompareArgs {
            old: self.old.clone(),
            new: self.new.clone(),
            output: self.output.clone(),
            format: self.format,
            fail_on_breaking: self.fail_on_breaking,
            patterns: self.patterns.clone(),
            ignore: self.ignore.clone(),
            language: self.language.clone(),
            jobs: self.jobs,
            no_color: self.no_color,
            quiet: self.quiet,
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .apideltarc.toml
    let config = ApideltaConfig::load(std::path::Path::new("."));

    if cli.no_color {
        colored::control::set_override(false);
    } else if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    match compare::run(&cli.compare_args(), &config) {
        Ok(Verdict::Pass) => ExitCode::SUCCESS,
        Ok(Verdict::FailBreaking) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}
