//! Output formatting for the apidelta CLI.
//!
//! The report itself is rendered by `apidelta_core::exporter`; this module
//! picks the stdout format, decides on color from the TTY, and writes the
//! structured report file.

use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use apidelta_core::exporter::{json, render, ReportFormat};
use apidelta_core::ComparisonReport;
use clap::ValueEnum;

mod style;

pub use self::style::colorize_narrative;

/// Output format for the stdout report
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable narrative (default)
    #[default]
    Narrative,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "narrative" | "text" => Ok(OutputFormat::Narrative),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Narrative => ReportFormat::Narrative,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
}

impl OutputConfig {
    /// Create an OutputConfig with automatic TTY detection and optional color override.
    ///
    /// When stdout is not a TTY colors are off unless `color_override` is `Some(true)`.
    pub fn auto_detect_with_color_override(format: OutputFormat, color_override: Option<bool>) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let use_color = color_override.unwrap_or(is_tty);
        Self {
            format,
            no_color: !use_color,
        }
    }

    /// Check if colors should be used
    pub fn use_colors(&self) -> bool {
        !self.no_color
    }

    /// Render a report for stdout.
    pub fn render(&self, report: &ComparisonReport) -> String {
        let text = render(report, self.format.into());
        match self.format {
            OutputFormat::Narrative if self.use_colors() => colorize_narrative(&text),
            _ => text,
        }
    }
}

/// Write the structured (JSON) report to `path`.
pub fn write_structured(path: &Path, report: &ComparisonReport) -> anyhow::Result<()> {
    let text = json::export(report, true).context("Failed to serialize report")?;
    std::fs::write(path, text + "\n")
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote structured report");
    Ok(())
}
