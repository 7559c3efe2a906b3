//! JSON format exporter.

use crate::report::ComparisonReport;

/// Export a report to JSON.
pub fn export(report: &ComparisonReport, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

/// Read back a report produced by [`export`].
pub fn import(text: &str) -> Result<ComparisonReport, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostic;
    use crate::differ::{Change, Impact, ModifiedKind};
    use crate::types::{Entity, EntityKind, Location};

    fn make_report() -> ComparisonReport {
        let old = Entity::new("m.f", EntityKind::Function, Location::new("m.py", 1));
        let new = Entity::new("m.f", EntityKind::Function, Location::new("m.py", 4));
        let changes = vec![
            Change::modified(
                ModifiedKind::SignatureChanged(Impact::Narrowing),
                &old,
                &new,
                "signature changed: required parameter 'x' added",
            ),
            Change::removed(&Entity::new("m.g", EntityKind::Class, Location::new("m.py", 9))),
        ];
        let diagnostics = vec![Diagnostic::ambiguous("m.f", "annotation changed").with_path("m.py")];
        ComparisonReport::new("old", "new", 1, changes, vec![], diagnostics)
    }

    #[test]
    fn test_export_json() {
        let output = export(&make_report(), false).unwrap();
        assert!(output.contains("\"severity\":\"breaking\""));
        assert!(output.contains("\"signature_changed\":\"narrowing\""));
        assert!(output.contains("\"recommended_bump\":\"major\""));
    }

    #[test]
    fn test_export_json_pretty() {
        let output = export(&make_report(), true).unwrap();
        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_import_restores_report() {
        let report = make_report();
        let text = export(&report, true).unwrap();
        assert_eq!(import(&text).unwrap(), report);
    }
}
