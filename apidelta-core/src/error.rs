//! Error types for apidelta-core.

use thiserror::Error;

/// Result type alias for apidelta-core operations.
pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Errors that can occur while turning a source unit into an API surface.
///
/// None of these abort a multi-file comparison: the pipeline converts them
/// into skipped-file diagnostics for the affected pair.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Source text is not valid in the analyzer's grammar.
    #[error("{path}:{line}:{column}: syntax error: {message}")]
    Syntax {
        /// File the text was loaded from.
        path: String,
        /// 1-based line of the first error node.
        line: u32,
        /// 1-based column of the first error node.
        column: u32,
        /// Description of the offending token.
        message: String,
    },

    /// Source text could not be loaded.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No analyzer is registered for the language tag or file extension.
    #[error("no analyzer registered for `{language}`")]
    UnsupportedLanguage {
        /// Language tag or extension that was requested.
        language: String,
    },

    /// The tree-sitter grammar could not be loaded or produced no tree.
    #[error("failed to load {language} grammar: {message}")]
    Grammar {
        /// Grammar that failed.
        language: String,
        /// Description of the failure.
        message: String,
    },
}
