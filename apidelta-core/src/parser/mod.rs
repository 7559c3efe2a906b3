//! Language analyzers.
//!
//! Each supported language provides a [`LanguageAnalyzer`] that turns source
//! text into a parse tree and then walks that tree once to produce an
//! [`ApiSurface`]. Analyzers are looked up by file extension or language tag
//! through an [`AnalyzerRegistry`], so adding a language means registering
//! one more implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tree_sitter::Tree;

use crate::error::{AnalyzeError, Result};
use crate::types::ApiSurface;

pub mod python;
pub mod typescript;

mod helpers;

pub use python::{PythonAnalyzer, PythonConvention};
pub use typescript::{EcmaConvention, TypeScriptAnalyzer};

/// A syntax-error-free tree together with the text it was parsed from.
pub struct ParseTree<'src> {
    pub(crate) tree: Tree,
    pub(crate) source: &'src str,
    pub(crate) language: &'static str,
}

/// Where a source unit lives, used to build identities and locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleContext {
    /// Dotted module identity, e.g. `pkg.sub.mod`.
    pub module: String,
    /// Path recorded in entity locations and diagnostics.
    pub path: String,
}

impl ModuleContext {
    pub fn new(module: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            path: path.into(),
        }
    }
}

/// Capability interface for one language.
pub trait LanguageAnalyzer: Send + Sync {
    /// Canonical language tag, e.g. `python`.
    fn language(&self) -> &'static str;

    /// Additional tags accepted by `--language`.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// File extensions handled, without the leading dot.
    fn extensions(&self) -> &'static [&'static str];

    /// File stem that names its enclosing package (`__init__`, `index`).
    fn package_stem(&self) -> Option<&'static str> {
        None
    }

    /// Parse source text. Any error node in the tree is a syntax error.
    fn parse<'src>(&self, source: &'src str, path: &str) -> Result<ParseTree<'src>>;

    /// Walk a parse tree and collect the API surface.
    fn extract_public_api(&self, tree: &ParseTree<'_>, context: &ModuleContext) -> ApiSurface;

    /// Parse then extract.
    fn analyze(&self, source: &str, context: &ModuleContext) -> Result<ApiSurface> {
        let tree = self.parse(source, &context.path)?;
        Ok(self.extract_public_api(&tree, context))
    }

    /// Dotted module identity for a path relative to the comparison root.
    fn module_name(&self, relative: &Path) -> String {
        module_name(relative, self.package_stem())
    }
}

/// Build a dotted module name from a relative path.
///
/// The extension is dropped, separators become dots, and a trailing
/// package stem collapses into its directory.
pub fn module_name(relative: &Path, package_stem: Option<&str>) -> String {
    let mut parts: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.len() > 1 && package_stem.is_some_and(|stem| parts.last().map(String::as_str) == Some(stem)) {
        parts.pop();
    }

    parts.join(".")
}

/// Visibility conventions for every built-in analyzer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    pub python: PythonConvention,
    pub ecmascript: EcmaConvention,
}

/// Extension and tag lookup for analyzers.
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    by_extension: HashMap<String, Arc<dyn LanguageAnalyzer>>,
    by_language: HashMap<String, Arc<dyn LanguageAnalyzer>>,
}

impl AnalyzerRegistry {
    /// A registry with no analyzers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Python, TypeScript and JavaScript analyzers using `conventions`.
    pub fn with_conventions(conventions: &Conventions) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PythonAnalyzer::new(conventions.python.clone())));
        registry.register(Arc::new(TypeScriptAnalyzer::typescript(conventions.ecmascript.clone())));
        registry.register(Arc::new(TypeScriptAnalyzer::tsx(conventions.ecmascript.clone())));
        registry.register(Arc::new(TypeScriptAnalyzer::javascript(conventions.ecmascript.clone())));
        registry
    }

    /// Built-in analyzers with default conventions.
    pub fn with_defaults() -> Self {
        Self::with_conventions(&Conventions::default())
    }

    /// Register an analyzer under its tag, aliases and extensions.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register(&mut self, analyzer: Arc<dyn LanguageAnalyzer>) {
        self.by_language
            .insert(analyzer.language().to_string(), Arc::clone(&analyzer));
        for alias in analyzer.aliases() {
            self.by_language
                .insert(alias.to_string(), Arc::clone(&analyzer));
        }
        for ext in analyzer.extensions() {
            self.by_extension
                .insert(ext.to_string(), Arc::clone(&analyzer));
        }
    }

    /// Analyzer for a language tag or alias, case-insensitive.
    pub fn for_language(&self, language: &str) -> Result<Arc<dyn LanguageAnalyzer>> {
        self.by_language
            .get(&language.to_lowercase())
            .cloned()
            .ok_or_else(|| AnalyzeError::UnsupportedLanguage {
                language: language.to_string(),
            })
    }

    /// Analyzer chosen by file extension.
    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn LanguageAnalyzer>> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.by_extension.get(&ext).cloned()
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    /// Canonical language tags, sorted.
    pub fn languages(&self) -> Vec<&'static str> {
        let mut langs: Vec<&'static str> = self.by_language.values().map(|a| a.language()).collect();
        langs.sort_unstable();
        langs.dedup();
        langs
    }
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("languages", &self.languages())
            .field("extensions", &self.extensions())
            .finish()
    }
}
