//! Compare command - API diff between two files or two directory trees
//!
//! Validates the inputs, runs the core comparison, prints the report and
//! optionally writes the structured JSON report to a file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use apidelta_core::{AnalyzerRegistry, Comparator, ComparisonReport, PairingOptions};

use crate::config::ApideltaConfig;
use crate::output::{write_structured, OutputConfig, OutputFormat};

/// Resolved arguments for one comparison run.
#[derive(Debug, Clone, Default)]
pub struct CompareArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub fail_on_breaking: bool,
    pub patterns: Vec<String>,
    pub ignore: Vec<String>,
    pub language: Option<String>,
    pub jobs: Option<usize>,
    pub no_color: bool,
    pub quiet: bool,
}

/// How a completed run should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Breaking changes found while `fail_on_breaking` is set.
    FailBreaking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Files,
    Directories,
}

fn input_mode(old: &Path, new: &Path) -> anyhow::Result<Mode> {
    for path in [old, new] {
        if !path.exists() {
            bail!("path does not exist: {}", path.display());
        }
    }
    match (old.is_dir(), new.is_dir()) {
        (false, false) => Ok(Mode::Files),
        (true, true) => Ok(Mode::Directories),
        _ => bail!(
            "cannot compare a file with a directory: {} vs {}",
            old.display(),
            new.display()
        ),
    }
}

/// Build the comparator from config plus flags.
fn comparator(args: &CompareArgs, config: &ApideltaConfig) -> anyhow::Result<Comparator> {
    let registry = AnalyzerRegistry::with_conventions(&config.conventions());
    if let Some(language) = &args.language {
        registry.for_language(language).with_context(|| {
            format!("supported languages: {}", registry.languages().join(", "))
        })?;
    }
    Ok(Comparator::new(registry)
        .with_jobs(args.jobs.or(config.compare.jobs))
        .with_language(args.language.clone()))
}

fn pairing_options(args: &CompareArgs, config: &ApideltaConfig) -> PairingOptions {
    let patterns = if args.patterns.is_empty() {
        config.compare.patterns.clone()
    } else {
        args.patterns.clone()
    };
    let mut ignore = args.ignore.clone();
    for pattern in &config.compare.ignore {
        if !ignore.contains(pattern) {
            ignore.push(pattern.clone());
        }
    }
    PairingOptions {
        patterns,
        ignore,
        follow_symlinks: false,
    }
}

/// Run the comparison and produce the report without printing it.
pub fn compare(args: &CompareArgs, config: &ApideltaConfig) -> anyhow::Result<ComparisonReport> {
    let mode = input_mode(&args.old, &args.new)?;
    let comparator = comparator(args, config)?;

    let report = match mode {
        Mode::Files => {
            if !args.patterns.is_empty() {
                tracing::warn!("--pattern only applies to directory comparisons");
            }
            comparator.compare_files(&args.old, &args.new)?
        }
        Mode::Directories => {
            let options = pairing_options(args, config);
            comparator.compare_directories(&args.old, &args.new, &options)?
        }
    };
    Ok(report)
}

pub fn run(args: &CompareArgs, config: &ApideltaConfig) -> anyhow::Result<Verdict> {
    let start = Instant::now();
    let report = compare(args, config)?;
    tracing::debug!(
        files = report.files_compared,
        changes = report.changes.len(),
        skipped = report.skipped.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "comparison finished"
    );

    if !args.quiet {
        let format = args.format.unwrap_or_else(|| {
            config
                .default_format()
                .and_then(|f| f.parse().ok())
                .unwrap_or_default()
        });
        let color = if args.no_color { Some(false) } else { config.use_color() };
        let text = OutputConfig::auto_detect_with_color_override(format, color).render(&report);
        if text.ends_with('\n') {
            print!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    if let Some(path) = &args.output {
        write_structured(path, &report)?;
    }

    let fail_on_breaking = args.fail_on_breaking || config.compare.fail_on_breaking;
    if fail_on_breaking && report.is_breaking() {
        return Ok(Verdict::FailBreaking);
    }
    Ok(Verdict::Pass)
}
