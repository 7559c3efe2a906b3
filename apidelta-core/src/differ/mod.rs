//! Comparison of two API surfaces.
//!
//! Matching pairs entities by identity; classification turns each pair
//! (or unpaired entity) into zero or more [`Change`]s with a severity.
//!
//! # Example
//!
//! ```
//! use apidelta_core::differ::diff_surfaces;
//! use apidelta_core::parser::{LanguageAnalyzer, ModuleContext, PythonAnalyzer};
//!
//! let analyzer = PythonAnalyzer::default();
//! let ctx = ModuleContext::new("greet", "greet.py");
//! let old = analyzer.analyze("def hello(name):\n    pass\n", &ctx).unwrap();
//! let new = analyzer.analyze("def hello(name, title):\n    pass\n", &ctx).unwrap();
//!
//! let result = diff_surfaces(&old, &new);
//! assert!(result.changes.iter().any(|c| c.is_breaking()));
//! ```

pub mod changes;
pub mod classifier;
pub mod matcher;
pub mod signature;

pub use changes::{severity_of, sort_changes, Change, ChangeKind, Impact, ModifiedKind, Severity};
pub use classifier::{classify, Classification};
pub use matcher::{match_entities, MatchSet};
pub use signature::{compare_parameters, SignatureDelta};

use crate::types::ApiSurface;

/// Match then classify two surfaces of the same source unit.
pub fn diff_surfaces(old: &ApiSurface, new: &ApiSurface) -> Classification {
    let matches = match_entities(old, new);
    let mut result = classify(&matches);
    sort_changes(&mut result.changes);
    result
}
