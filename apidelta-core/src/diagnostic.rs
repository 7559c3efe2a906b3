//! Diagnostics attached to a comparison report.
//!
//! Skipped files and conservative classification calls are both reported
//! here so a reader of the report can tell partial coverage from a clean
//! result.

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;

/// Category of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    SyntaxError,
    ReadError,
    UnsupportedLanguage,
    AmbiguousSignature,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxError => "syntax_error",
            DiagnosticKind::ReadError => "read_error",
            DiagnosticKind::UnsupportedLanguage => "unsupported_language",
            DiagnosticKind::AmbiguousSignature => "ambiguous_signature",
        }
    }

    /// Whether this diagnostic means the file pair was excluded.
    pub fn is_skip(&self) -> bool {
        !matches!(self, DiagnosticKind::AmbiguousSignature)
    }
}

/// A single diagnostic entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// File path (relative for directory runs).
    pub path: Option<String>,

    /// Entity identity, for classification notes.
    pub identity: Option<String>,

    pub line: Option<u32>,
    pub column: Option<u32>,

    pub message: String,
}

impl Diagnostic {
    /// Build a skipped-file diagnostic from an analysis error.
    pub fn from_error(err: &AnalyzeError) -> Self {
        match err {
            AnalyzeError::Syntax {
                path,
                line,
                column,
                message,
            } => Self {
                kind: DiagnosticKind::SyntaxError,
                path: Some(path.clone()),
                identity: None,
                line: Some(*line),
                column: Some(*column),
                message: message.clone(),
            },
            AnalyzeError::Read { path, source } => Self {
                kind: DiagnosticKind::ReadError,
                path: Some(path.clone()),
                identity: None,
                line: None,
                column: None,
                message: source.to_string(),
            },
            AnalyzeError::UnsupportedLanguage { .. } | AnalyzeError::Grammar { .. } => Self {
                kind: DiagnosticKind::UnsupportedLanguage,
                path: None,
                identity: None,
                line: None,
                column: None,
                message: err.to_string(),
            },
        }
    }

    /// Note for a change that was resolved conservatively.
    pub fn ambiguous(identity: &str, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::AmbiguousSignature,
            path: None,
            identity: Some(identity.to_string()),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Set the path if none is recorded yet.
    pub fn with_path(mut self, path: &str) -> Self {
        if self.path.is_none() {
            self.path = Some(path.to_string());
        }
        self
    }

    /// Set the line number.
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// `path:line:column` style prefix for display.
    pub fn position(&self) -> String {
        let mut out = self.path.clone().unwrap_or_else(|| "<input>".to_string());
        if let Some(line) = self.line {
            out.push_str(&format!(":{}", line));
            if let Some(column) = self.column {
                out.push_str(&format!(":{}", column));
            }
        }
        out
    }
}
