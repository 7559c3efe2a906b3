//! Terminal colors for the narrative report.

use apidelta_core::Severity;
use colored::{ColoredString, Colorize};

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Breaking => text.red().bold(),
        Severity::Compatible => text.green().bold(),
        Severity::Patch => text.yellow().bold(),
        Severity::Internal => text.dimmed(),
    }
}

fn severity_in(text: &str) -> Option<Severity> {
    Severity::descending()
        .into_iter()
        .find(|s| text.starts_with(s.label()))
}

/// Color section headers and the verdict of a plain narrative report.
pub fn colorize_narrative(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("Verdict: ") {
            match severity_in(rest) {
                Some(severity) => out.push_str(&format!("{} {}", "Verdict:".bold(), paint(rest, severity))),
                None => out.push_str(line),
            }
        } else if line.starts_with("API comparison:") {
            out.push_str(&line.cyan().bold().to_string());
        } else if line.starts_with("Skipped files (") || line.starts_with("Audit notes (") {
            out.push_str(&line.magenta().bold().to_string());
        } else if line.starts_with("      old: ") || line.starts_with("      new: ") {
            out.push_str(&line.dimmed().to_string());
        } else {
            match severity_in(line) {
                Some(severity) if line.ends_with(')') => out.push_str(&paint(line, severity).to_string()),
                _ => out.push_str(line),
            }
        }
        out.push('\n');
    }
    out
}
