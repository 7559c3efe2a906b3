//! The merged result of a comparison run.

use serde::{Deserialize, Serialize};

use crate::advisor::{aggregate, Summary};
use crate::diagnostic::Diagnostic;
use crate::differ::{sort_changes, Change, Severity};

/// Everything a renderer needs: changes, verdict and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub old_root: String,
    pub new_root: String,
    /// Number of file pairs that were analyzed (identical pairs included).
    pub files_compared: usize,
    /// Changes in report order.
    pub changes: Vec<Change>,
    pub summary: Summary,
    /// Pairs excluded from the comparison, one diagnostic each.
    pub skipped: Vec<Diagnostic>,
    /// Notes on conservative classification calls.
    pub diagnostics: Vec<Diagnostic>,
}

impl ComparisonReport {
    /// Assemble a report, sorting changes and computing the summary.
    pub fn new(
        old_root: impl Into<String>,
        new_root: impl Into<String>,
        files_compared: usize,
        mut changes: Vec<Change>,
        mut skipped: Vec<Diagnostic>,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Self {
        sort_changes(&mut changes);
        skipped.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.message.cmp(&b.message)));
        diagnostics.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.line.cmp(&b.line))
                .then_with(|| a.identity.cmp(&b.identity))
                .then_with(|| a.message.cmp(&b.message))
        });
        let summary = aggregate(&changes);

        Self {
            old_root: old_root.into(),
            new_root: new_root.into(),
            files_compared,
            changes,
            summary,
            skipped,
            diagnostics,
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.summary.is_breaking()
    }

    /// Changes at one severity, in report order.
    pub fn changes_at(&self, severity: Severity) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.severity == severity)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.skipped.is_empty() && self.diagnostics.is_empty()
    }
}
