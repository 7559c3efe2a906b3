//! Comparison pipeline.
//!
//! A [`Comparator`] owns the analyzer registry and a source loader. Every
//! file pair is compared independently: a pair that cannot be loaded or
//! parsed becomes a skipped-file diagnostic and never aborts the run.
//! Directory runs fan out over a bounded rayon pool and merge the
//! per-file outcomes deterministically.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::diagnostic::Diagnostic;
use crate::differ::{diff_surfaces, Change, Classification};
use crate::error::{AnalyzeError, Result};
use crate::loader::{FsLoader, SourceLoader};
use crate::pairing::{pair_directories, FilePair, PairingOptions};
use crate::parser::{AnalyzerRegistry, LanguageAnalyzer, ModuleContext};
use crate::report::ComparisonReport;
use crate::types::ApiSurface;

/// Compare two versions of one source unit held in memory.
pub fn compare_sources(
    analyzer: &dyn LanguageAnalyzer,
    old_text: &str,
    new_text: &str,
    context: &ModuleContext,
) -> Result<Classification> {
    let old = analyzer.analyze(old_text, context)?;
    let new = analyzer.analyze(new_text, context)?;
    Ok(diff_surfaces(&old, &new))
}

/// Result of comparing a single file pair.
#[derive(Clone, Debug)]
pub enum FileOutcome {
    Compared {
        relative: String,
        changes: Vec<Change>,
        diagnostics: Vec<Diagnostic>,
    },
    Skipped(Diagnostic),
}

/// One side of a pair: where to load from and what path to report.
struct Side<'a> {
    path: &'a Path,
    label: String,
    version: &'static str,
}

/// Runs comparisons with a fixed registry, loader and job count.
#[derive(Clone)]
pub struct Comparator {
    registry: AnalyzerRegistry,
    loader: Arc<dyn SourceLoader>,
    jobs: Option<usize>,
    language: Option<String>,
}

impl Comparator {
    pub fn new(registry: AnalyzerRegistry) -> Self {
        Self {
            registry,
            loader: Arc::new(FsLoader),
            jobs: None,
            language: None,
        }
    }

    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Worker threads for directory runs; `None` or 0 uses rayon's default.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Force one analyzer for every file instead of choosing by extension.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    fn analyzer_for(&self, path: &Path) -> Result<Arc<dyn LanguageAnalyzer>> {
        match &self.language {
            Some(language) => self.registry.for_language(language),
            None => self
                .registry
                .for_path(path)
                .ok_or_else(|| AnalyzeError::UnsupportedLanguage {
                    language: path
                        .extension()
                        .map(|e| format!(".{}", e.to_string_lossy()))
                        .unwrap_or_else(|| path.display().to_string()),
                }),
        }
    }

    /// Compare two files directly.
    ///
    /// The module identity comes from the new file's name so that renamed
    /// copies (`api_v1.py` vs `api_v2.py`) still line up. An unknown
    /// language is an error; load and syntax failures are reported as a
    /// skipped file in the returned report.
    pub fn compare_files(&self, old: &Path, new: &Path) -> Result<ComparisonReport> {
        let analyzer = self.analyzer_for(new)?;
        let file_name = new.file_name().map(Path::new).unwrap_or(new);
        let module = analyzer.module_name(file_name);

        let old_side = Side {
            path: old,
            label: old.display().to_string(),
            version: "old",
        };
        let new_side = Side {
            path: new,
            label: new.display().to_string(),
            version: "new",
        };

        tracing::info!(old = %old.display(), new = %new.display(), language = analyzer.language(), "comparing files");
        let relative = new_side.label.clone();
        let outcome = self.compare_pair(analyzer.as_ref(), &module, &relative, Some(old_side), Some(new_side));

        Ok(assemble(
            old.display().to_string(),
            new.display().to_string(),
            vec![outcome],
        ))
    }

    /// Compare every analyzable file under two roots.
    pub fn compare_directories(
        &self,
        old_root: &Path,
        new_root: &Path,
        options: &PairingOptions,
    ) -> Result<ComparisonReport> {
        let pairs = pair_directories(old_root, new_root, options, &self.registry)?;
        tracing::info!(
            old = %old_root.display(),
            new = %new_root.display(),
            pairs = pairs.len(),
            "comparing directories"
        );

        let outcomes = self.compare_pairs(&pairs);
        Ok(assemble(
            old_root.display().to_string(),
            new_root.display().to_string(),
            outcomes,
        ))
    }

    /// Compare file pairs in parallel. Outcomes come back in pair order.
    pub fn compare_pairs(&self, pairs: &[FilePair]) -> Vec<FileOutcome> {
        let pool = match self.jobs {
            Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
            _ => None,
        };

        let compare_fn = |pair: &FilePair| -> FileOutcome { self.compare_file_pair(pair) };

        match pool {
            Some(pool) => pool.install(|| pairs.par_iter().map(compare_fn).collect()),
            None => pairs.par_iter().map(compare_fn).collect(),
        }
    }

    fn compare_file_pair(&self, pair: &FilePair) -> FileOutcome {
        let Some(primary) = pair.primary() else {
            return FileOutcome::Compared {
                relative: pair.relative.clone(),
                changes: Vec::new(),
                diagnostics: Vec::new(),
            };
        };
        let analyzer = match self.analyzer_for(primary) {
            Ok(analyzer) => analyzer,
            Err(e) => return skipped(&e, &pair.relative),
        };
        let module = analyzer.module_name(Path::new(&pair.relative));

        let old = pair.old.as_deref().map(|path| Side {
            path,
            label: pair.relative.clone(),
            version: "old",
        });
        let new = pair.new.as_deref().map(|path| Side {
            path,
            label: pair.relative.clone(),
            version: "new",
        });
        self.compare_pair(analyzer.as_ref(), &module, &pair.relative, old, new)
    }

    /// Load, analyze and diff one pair. A missing side counts as empty.
    fn compare_pair(
        &self,
        analyzer: &dyn LanguageAnalyzer,
        module: &str,
        relative: &str,
        old: Option<Side<'_>>,
        new: Option<Side<'_>>,
    ) -> FileOutcome {
        let old_text = match old.as_ref().map(|s| self.load(s)).transpose() {
            Ok(text) => text,
            Err(diag) => return FileOutcome::Skipped(diag),
        };
        let new_text = match new.as_ref().map(|s| self.load(s)).transpose() {
            Ok(text) => text,
            Err(diag) => return FileOutcome::Skipped(diag),
        };

        // Identical text has identical surfaces, but it must still parse.
        if let (Some(o), Some(n), Some(side)) = (&old_text, &new_text, new.as_ref()) {
            if o == n {
                if let Err(e) = analyzer.parse(n, &side.label) {
                    tracing::warn!(file = %side.label, error = %e, "skipping file");
                    return FileOutcome::Skipped(side_diagnostic(&e, side));
                }
                tracing::debug!(file = %relative, "identical content, skipping extraction");
                return FileOutcome::Compared {
                    relative: relative.to_string(),
                    changes: Vec::new(),
                    diagnostics: Vec::new(),
                };
            }
        }

        let old_surface = match self.surface(analyzer, module, old.as_ref(), old_text.as_deref()) {
            Ok(surface) => surface,
            Err(diag) => return FileOutcome::Skipped(diag),
        };
        let new_surface = match self.surface(analyzer, module, new.as_ref(), new_text.as_deref()) {
            Ok(surface) => surface,
            Err(diag) => return FileOutcome::Skipped(diag),
        };

        let result = diff_surfaces(&old_surface, &new_surface);
        for diag in &result.diagnostics {
            tracing::warn!(file = %relative, identity = ?diag.identity, "{}", diag.message);
        }
        tracing::debug!(file = %relative, changes = result.changes.len(), "compared");
        FileOutcome::Compared {
            relative: relative.to_string(),
            changes: result.changes,
            diagnostics: result.diagnostics,
        }
    }

    fn load(&self, side: &Side<'_>) -> std::result::Result<String, Diagnostic> {
        self.loader.load(side.path).map_err(|e| {
            tracing::warn!(file = %side.label, error = %e, "skipping unreadable file");
            side_diagnostic(&e, side)
        })
    }

    fn surface(
        &self,
        analyzer: &dyn LanguageAnalyzer,
        module: &str,
        side: Option<&Side<'_>>,
        text: Option<&str>,
    ) -> std::result::Result<ApiSurface, Diagnostic> {
        match (side, text) {
            (Some(side), Some(text)) => {
                let context = ModuleContext::new(module, side.label.clone());
                analyzer.analyze(text, &context).map_err(|e| {
                    tracing::warn!(file = %side.label, error = %e, "skipping file");
                    side_diagnostic(&e, side)
                })
            }
            _ => Ok(ApiSurface::empty(module, analyzer.language(), "")),
        }
    }
}

impl std::fmt::Debug for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comparator")
            .field("registry", &self.registry)
            .field("jobs", &self.jobs)
            .field("language", &self.language)
            .finish()
    }
}

fn side_diagnostic(err: &AnalyzeError, side: &Side<'_>) -> Diagnostic {
    let mut diag = Diagnostic::from_error(err);
    diag.path = Some(side.label.clone());
    diag.message = format!("{} ({} version)", diag.message, side.version);
    diag
}

fn skipped(err: &AnalyzeError, relative: &str) -> FileOutcome {
    tracing::warn!(file = %relative, error = %err, "skipping file");
    let mut diag = Diagnostic::from_error(err);
    diag.path = Some(relative.to_string());
    FileOutcome::Skipped(diag)
}

/// Merge per-file outcomes into one report.
pub fn assemble(old_root: String, new_root: String, outcomes: Vec<FileOutcome>) -> ComparisonReport {
    let mut files_compared = 0;
    let mut changes = Vec::new();
    let mut skipped = Vec::new();
    let mut diagnostics = Vec::new();

    for outcome in outcomes {
        match outcome {
            FileOutcome::Compared {
                changes: file_changes,
                diagnostics: file_diagnostics,
                ..
            } => {
                files_compared += 1;
                changes.extend(file_changes);
                diagnostics.extend(file_diagnostics);
            }
            FileOutcome::Skipped(diag) => skipped.push(diag),
        }
    }

    ComparisonReport::new(old_root, new_root, files_compared, changes, skipped, diagnostics)
}
