//! End-to-end comparisons over real files on disk.

use std::fs;
use std::path::Path;

use apidelta_core::exporter::{json, render, ReportFormat};
use apidelta_core::parser::{LanguageAnalyzer, ModuleContext, PythonAnalyzer};
use apidelta_core::types::EntityKind;
use apidelta_core::{
    compare_directories, compare_files, AnalyzerRegistry, ChangeKind, Comparator, DiagnosticKind,
    PairingOptions, Severity, VersionBump,
};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn file_pair(old: &str, new: &str) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("old"), "api.py", old);
    write(&dir.path().join("new"), "api.py", new);
    let old_path = dir.path().join("old/api.py");
    let new_path = dir.path().join("new/api.py");
    (dir, old_path, new_path)
}

#[test]
fn test_extraction_is_deterministic() {
    let source = "class A(B):\n    def m(self, x, *, y=1):\n        pass\n\nCONST = 1\n";
    let analyzer = PythonAnalyzer::default();
    let ctx = ModuleContext::new("m", "m.py");
    let first = analyzer.analyze(source, &ctx).unwrap();
    let second = analyzer.analyze(source, &ctx).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_self_comparison_is_empty() {
    let source = "def f(a, b=2):\n    pass\n\nclass C:\n    x: int = 0\n";
    let (_dir, old, new) = file_pair(source, source);
    let report = compare_files(&old, &new).unwrap();

    assert!(report.changes.is_empty());
    assert_eq!(report.summary.overall_severity, Severity::Internal);
    assert_eq!(report.summary.recommended_bump, VersionBump::None);
}

#[test]
fn test_rename_is_remove_plus_add() {
    let (_dir, old, new) = file_pair("def greet(name):\n    pass\n", "def hello(name):\n    pass\n");
    let report = compare_files(&old, &new).unwrap();

    assert_eq!(report.changes.len(), 2);
    let removed = &report.changes[0];
    assert_eq!(removed.kind, ChangeKind::Removed);
    assert_eq!(removed.severity, Severity::Breaking);
    assert_eq!(removed.entity_kind, EntityKind::Function);
    assert_eq!(removed.identity(), "api.greet");

    let added = &report.changes[1];
    assert_eq!(added.kind, ChangeKind::Added);
    assert_eq!(added.severity, Severity::Compatible);
    assert_eq!(added.identity(), "api.hello");

    assert_eq!(report.summary.overall_severity, Severity::Breaking);
    assert_eq!(report.summary.recommended_bump, VersionBump::Major);
}

#[test]
fn test_added_base_is_compatible() {
    let (_dir, old, new) = file_pair(
        "class Worker(Base):\n    pass\n",
        "class Worker(Base, Mixin):\n    pass\n",
    );
    let report = compare_files(&old, &new).unwrap();

    assert_eq!(report.changes.len(), 1);
    assert!(matches!(report.changes[0].kind, ChangeKind::Modified(_)));
    assert_eq!(report.changes[0].severity, Severity::Compatible);
    assert_eq!(report.summary.recommended_bump, VersionBump::Minor);
}

#[test]
fn test_internal_removal_is_patch() {
    let (_dir, old, new) = file_pair(
        "def run():\n    pass\n\ndef _helper():\n    pass\n",
        "def run():\n    pass\n",
    );
    let report = compare_files(&old, &new).unwrap();

    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].severity, Severity::Patch);
    assert_eq!(report.summary.recommended_bump, VersionBump::Patch);
}

#[test]
fn test_partial_failure_keeps_other_files() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write(old.path(), "a.py", "def a():\n    pass\n");
    write(new.path(), "a.py", "def a(x):\n    pass\n");
    write(old.path(), "b.ts", "export function b(): void {}\n");
    write(new.path(), "b.ts", "export function b(): void {}\nexport function c(): void {}\n");
    write(old.path(), "broken.py", "def ok():\n    pass\n");
    write(new.path(), "broken.py", "def ok(:\n    pass\n");

    let report = compare_directories(old.path(), new.path()).unwrap();

    assert_eq!(report.files_compared, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].kind, DiagnosticKind::SyntaxError);
    assert_eq!(report.skipped[0].path.as_deref(), Some("broken.py"));
    assert!(report.changes.iter().any(|c| c.identity() == "a.a" && c.is_breaking()));
    assert!(report
        .changes
        .iter()
        .any(|c| c.identity() == "b.c" && c.kind == ChangeKind::Added));
    assert!(report.changes.iter().all(|c| !c.identity().starts_with("broken")));
}

#[test]
fn test_deleted_and_new_modules() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write(old.path(), "pkg/__init__.py", "");
    write(new.path(), "pkg/__init__.py", "");
    write(old.path(), "pkg/legacy.py", "def old_api():\n    pass\n");
    write(new.path(), "pkg/modern.py", "def new_api():\n    pass\n");

    let report = compare_directories(old.path(), new.path()).unwrap();

    let removed: Vec<&str> = report
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Removed)
        .map(|c| c.identity())
        .collect();
    let added: Vec<&str> = report
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Added)
        .map(|c| c.identity())
        .collect();
    assert_eq!(removed, vec!["pkg.legacy", "pkg.legacy.old_api"]);
    assert_eq!(added, vec!["pkg.modern", "pkg.modern.new_api"]);
    assert!(report.is_breaking());
}

#[test]
fn test_pattern_filter_and_jobs() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write(old.path(), "lib.py", "def f():\n    pass\n");
    write(new.path(), "lib.py", "def f():\n    pass\n");
    write(old.path(), "web.ts", "export const a = 1;\n");
    write(new.path(), "web.ts", "");

    let options = PairingOptions {
        patterns: vec!["*.py".to_string()],
        ..Default::default()
    };
    let report = Comparator::new(AnalyzerRegistry::with_defaults())
        .with_jobs(Some(2))
        .compare_directories(old.path(), new.path(), &options)
        .unwrap();

    assert_eq!(report.files_compared, 1);
    assert!(report.changes.is_empty());
}

#[test]
fn test_json_report_round_trips() {
    let (_dir, old, new) = file_pair(
        "def f(a, *, b):\n    pass\n",
        "def f(a, *, b, c=1):\n    pass\n\ndef g():\n    pass\n",
    );
    let report = compare_files(&old, &new).unwrap();
    let text = render(&report, ReportFormat::Json);
    let restored = json::import(&text).unwrap();
    assert_eq!(restored, report);
}

#[test]
fn test_narrative_report_lists_changes() {
    let (_dir, old, new) = file_pair("def greet(name):\n    pass\n", "def hello(name):\n    pass\n");
    let report = compare_files(&old, &new).unwrap();
    let text = render(&report, ReportFormat::Narrative);

    assert!(text.contains("BREAKING (1)"));
    assert!(text.contains("Function 'api.greet' was removed"));
    assert!(text.contains("COMPATIBLE (1)"));
    assert!(text.contains("Recommended version bump: MAJOR"));
}

fn ts_pair(old: &str, new: &str) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("old"), "api.ts", old);
    write(&dir.path().join("new"), "api.ts", new);
    let old_path = dir.path().join("old/api.ts");
    let new_path = dir.path().join("new/api.ts");
    (dir, old_path, new_path)
}

#[test]
fn test_return_annotation_added_or_dropped_is_breaking() {
    let typed = "def f(x) -> int:\n    return x\n";
    let untyped = "def f(x):\n    return x\n";
    for (old_src, new_src) in [(typed, untyped), (untyped, typed)] {
        let (_dir, old, new) = file_pair(old_src, new_src);
        let report = compare_files(&old, &new).unwrap();
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].identity(), "api.f");
        assert!(report.changes[0].is_breaking());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::AmbiguousSignature);
    }
}

#[test]
fn test_removed_overload_is_breaking() {
    let (_dir, old, new) = ts_pair(
        "export function f(a: string): void;\nexport function f(a: number): void;\nexport function f(a: any): void {}\n",
        "export function f(a: string): void;\nexport function f(a: any): void {}\n",
    );
    let report = compare_files(&old, &new).unwrap();
    assert_eq!(report.changes.len(), 1);
    let change = &report.changes[0];
    assert_eq!(change.identity(), "api.f");
    assert!(change.is_breaking());
    assert!(change.description.contains("overload (a: number) -> void removed"));
    assert_eq!(change.old_signature.as_deref(), Some("(a: string) -> void | (a: number) -> void"));
    assert_eq!(change.new_signature.as_deref(), Some("(a: string) -> void"));
}

#[test]
fn test_renamed_export_alias_is_breaking() {
    let (_dir, old, new) = ts_pair(
        "function impl(): void {}\nexport { impl as run };\n",
        "function impl(): void {}\nexport { impl as execute };\n",
    );
    let report = compare_files(&old, &new).unwrap();
    let removed: Vec<&str> = report
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Removed)
        .map(|c| c.identity())
        .collect();
    assert_eq!(removed, vec!["api.run"]);
    assert!(report
        .changes
        .iter()
        .any(|c| c.identity() == "api.execute" && c.kind == ChangeKind::Added));
    assert_eq!(report.summary.recommended_bump, VersionBump::Major);
}

#[test]
fn test_identical_unparsable_file_is_skipped() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write(old.path(), "ok.py", "def ok():\n    pass\n");
    write(new.path(), "ok.py", "def ok():\n    pass\n");
    write(old.path(), "bad.py", "def f(:\n");
    write(new.path(), "bad.py", "def f(:\n");

    let report = compare_directories(old.path(), new.path()).unwrap();
    assert_eq!(report.files_compared, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path.as_deref(), Some("bad.py"));
    assert_eq!(report.skipped[0].kind, DiagnosticKind::SyntaxError);
}
