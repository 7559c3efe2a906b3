//! Plain-text narrative exporter.

use crate::diagnostic::Diagnostic;
use crate::differ::{Change, Severity};
use crate::report::ComparisonReport;

/// Export a report as a human-readable narrative.
///
/// Sections appear most severe first; empty severity sections are left out.
pub fn export(report: &ComparisonReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "API comparison: {} -> {}",
        report.old_root, report.new_root
    ));
    lines.push(format!("Files compared: {}", report.files_compared));
    lines.push(format!(
        "Verdict: {} (recommended version bump: {})",
        report.summary.overall_severity.label(),
        report.summary.recommended_bump.as_str().to_uppercase()
    ));
    lines.push(String::new());

    if report.changes.is_empty() {
        lines.push("No API changes detected.".to_string());
        lines.push(String::new());
    }

    for severity in Severity::descending() {
        let changes: Vec<&Change> = report.changes_at(severity).collect();
        if changes.is_empty() {
            continue;
        }
        lines.push(format!("{} ({})", severity.label(), changes.len()));
        for change in changes {
            lines.push(format!("  - {}", change.description));
            lines.push(format!("      {}", locations(change)));
            if change.old_signature != change.new_signature {
                if let Some(sig) = &change.old_signature {
                    lines.push(format!("      old signature: {}", sig));
                }
                if let Some(sig) = &change.new_signature {
                    lines.push(format!("      new signature: {}", sig));
                }
            }
        }
        lines.push(String::new());
    }

    if !report.skipped.is_empty() {
        lines.push(format!("Skipped files ({})", report.skipped.len()));
        for diag in &report.skipped {
            lines.push(format!("  - {}", describe(diag)));
        }
        lines.push(String::new());
    }

    if !report.diagnostics.is_empty() {
        lines.push(format!("Audit notes ({})", report.diagnostics.len()));
        for diag in &report.diagnostics {
            lines.push(format!("  - {}", describe(diag)));
        }
        lines.push(String::new());
    }

    let counts = &report.summary.counts;
    lines.push(format!(
        "Summary: {} breaking, {} compatible, {} patch, {} internal",
        counts.breaking, counts.compatible, counts.patch, counts.internal
    ));
    lines.push(format!(
        "Overall severity: {}",
        report.summary.overall_severity.label()
    ));
    lines.push(format!(
        "Recommended version bump: {}",
        report.summary.recommended_bump.as_str().to_uppercase()
    ));

    lines.join("\n") + "\n"
}

fn locations(change: &Change) -> String {
    let old = change.old_location.as_ref().map(|l| format!("old: {}", l));
    let new = change.new_location.as_ref().map(|l| format!("new: {}", l));
    [old, new].into_iter().flatten().collect::<Vec<_>>().join("  ")
}

fn describe(diag: &Diagnostic) -> String {
    match &diag.identity {
        Some(identity) => format!("{} {}: {}", diag.position(), identity, diag.message),
        None => format!("{} [{}] {}", diag.position(), diag.kind.as_str(), diag.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzeError;
    use crate::differ::{Impact, ModifiedKind};
    use crate::types::{Entity, EntityKind, Location, Parameter, Signature, Visibility};

    fn make_entity(identity: &str, visibility: Visibility) -> Entity {
        Entity::new(identity, EntityKind::Function, Location::new("m.py", 7)).with_visibility(visibility)
    }

    #[test]
    fn test_empty_report() {
        let report = ComparisonReport::new("a", "b", 1, vec![], vec![], vec![]);
        let text = export(&report);
        assert!(text.contains("No API changes detected."));
        assert!(text.contains("Recommended version bump: NONE"));
        assert!(!text.contains("BREAKING ("));
    }

    #[test]
    fn test_sections_most_severe_first() {
        let changes = vec![
            Change::added(&make_entity("m.new_fn", Visibility::Public)),
            Change::removed(&make_entity("m.old_fn", Visibility::Public)),
            Change::removed(&make_entity("m._private", Visibility::Internal)),
        ];
        let report = ComparisonReport::new("v1", "v2", 1, changes, vec![], vec![]);
        let text = export(&report);

        let breaking = text.find("BREAKING (1)").unwrap();
        let compatible = text.find("COMPATIBLE (1)").unwrap();
        let patch = text.find("PATCH (1)").unwrap();
        assert!(breaking < compatible && compatible < patch);
        assert!(text.contains("Function 'm.old_fn' was removed"));
        assert!(text.contains("old: m.py:7"));
        assert!(text.contains("Overall severity: BREAKING"));
        assert!(text.contains("Verdict: BREAKING (recommended version bump: MAJOR)"));
        assert!(text.contains("Recommended version bump: MAJOR"));
    }

    #[test]
    fn test_modified_callable_shows_both_signatures() {
        let old = make_entity("m.f", Visibility::Public)
            .with_signature(Signature::new(vec![Parameter::positional("x")], Some("int".into())));
        let new = make_entity("m.f", Visibility::Public)
            .with_signature(Signature::new(vec![Parameter::positional("x")], None));
        let changes = vec![
            Change::modified(ModifiedKind::ReturnTypeChanged, &old, &new, "return type int dropped"),
            Change::modified(
                ModifiedKind::DecoratorsChanged,
                &new,
                &new.clone().with_decorators(vec!["cached".into()]),
                "decorators changed from [] to [cached]",
            ),
            Change::modified(
                ModifiedKind::SignatureChanged(Impact::Extending),
                &make_entity("m.g", Visibility::Public),
                &make_entity("m.g", Visibility::Public),
                "signature changed",
            ),
        ];
        let report = ComparisonReport::new("a", "b", 1, changes, vec![], vec![]);
        let text = export(&report);

        assert!(text.contains("      old signature: (x) -> int\n      new signature: (x)\n"));
        assert_eq!(text.matches("signature: (x)\n").count(), 1);
    }

    #[test]
    fn test_skipped_and_notes_follow_changes() {
        let skipped = vec![Diagnostic::from_error(&AnalyzeError::Syntax {
            path: "pkg/bad.py".to_string(),
            line: 4,
            column: 2,
            message: "unexpected `:`".to_string(),
        })];
        let notes = vec![Diagnostic::ambiguous("m.f", "base order changed; treated as breaking")
            .with_path("m.py")
            .at_line(3)];
        let changes = vec![Change::added(&make_entity("m.g", Visibility::Public))];
        let report = ComparisonReport::new("a", "b", 2, changes, skipped, notes);
        let text = export(&report);

        let section = text.find("COMPATIBLE").unwrap();
        let skipped_at = text.find("Skipped files (1)").unwrap();
        let notes_at = text.find("Audit notes (1)").unwrap();
        assert!(section < skipped_at && skipped_at < notes_at);
        assert!(text.contains("pkg/bad.py:4:2 [syntax_error] unexpected `:`"));
        assert!(text.contains("m.py:3 m.f: base order changed; treated as breaking"));
    }
}
