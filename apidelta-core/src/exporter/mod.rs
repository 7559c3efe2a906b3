//! Report renderers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::report::ComparisonReport;

pub mod json;
pub mod narrative;

/// Output format for a rendered report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Narrative,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Narrative => "narrative",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "narrative" | "text" => Ok(ReportFormat::Narrative),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}

/// Render a report. JSON output is pretty-printed.
pub fn render(report: &ComparisonReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Narrative => narrative::export(report),
        ReportFormat::Json => json::export(report, true).unwrap_or_else(|e| error_json(&e.to_string())),
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Narrative);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_render_dispatch() {
        let report = ComparisonReport::new("a", "b", 0, vec![], vec![], vec![]);
        assert!(render(&report, ReportFormat::Narrative).contains("No API changes detected."));
        assert!(render(&report, ReportFormat::Json).trim_start().starts_with('{'));
    }

    #[test]
    fn test_error_json_escapes_message() {
        let text = error_json("key \"a\" must be a string\nat line 2");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"], "key \"a\" must be a string\nat line 2");
    }
}
