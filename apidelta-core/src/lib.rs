//! apidelta core - API surface extraction and breaking-change classification.
//!
//! This crate compares two versions of a codebase and reports how its
//! public API changed. Each source file is parsed with tree-sitter into an
//! [`ApiSurface`](types::ApiSurface), surfaces are matched by identity, and
//! every difference is classified with a semantic-versioning severity.
//!
//! # Features
//!
//! - **Multi-language support**: Python, TypeScript, TSX, JavaScript
//! - **Parallel comparison**: File pairs are analyzed concurrently using Rayon
//! - **Partial failure**: Unparsable files are skipped and reported, never fatal
//! - **Version advice**: Overall severity and a recommended version bump
//! - **Multiple export formats**: Narrative text, JSON
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use apidelta_core::{compare_directories, exporter::{render, ReportFormat}};
//!
//! let report = compare_directories(Path::new("v1"), Path::new("v2")).unwrap();
//! println!("{}", render(&report, ReportFormat::Narrative));
//! ```

pub mod advisor;
pub mod diagnostic;
pub mod differ;
pub mod error;
pub mod exporter;
pub mod loader;
pub mod pairing;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod types;

use std::path::Path;

pub use advisor::{Summary, VersionBump};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use differ::{Change, ChangeKind, Severity};
pub use error::{AnalyzeError, Result};
pub use pairing::PairingOptions;
pub use parser::{AnalyzerRegistry, LanguageAnalyzer, ModuleContext};
pub use pipeline::{compare_sources, Comparator};
pub use report::ComparisonReport;

/// Compare two files with the built-in analyzers.
pub fn compare_files(old: &Path, new: &Path) -> Result<ComparisonReport> {
    Comparator::new(AnalyzerRegistry::with_defaults()).compare_files(old, new)
}

/// Compare two directory trees with the built-in analyzers and default options.
pub fn compare_directories(old_root: &Path, new_root: &Path) -> Result<ComparisonReport> {
    Comparator::new(AnalyzerRegistry::with_defaults()).compare_directories(
        old_root,
        new_root,
        &PairingOptions::default(),
    )
}

/// Crate version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
