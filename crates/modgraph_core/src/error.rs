use std::path::PathBuf;

use thiserror::Error;

use crate::types::SourceSpan;

/// Result type alias for graph extraction.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Reasons a file fails to yield an import/export graph.
///
/// Every variant aborts the whole file: a graph is either complete or absent.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A statement shape the classifier deliberately does not model.
    #[error("unsupported construct in '{path}' at {span}: {details}")]
    UnsupportedConstruct {
        /// File containing the statement.
        path: PathBuf,
        /// Span of the offending statement.
        span: SourceSpan,
        /// What was found.
        details: String,
    },

    /// A relative specifier with no matching file on disk.
    #[error("failed to resolve module specifier '{specifier}' imported from '{from}'")]
    UnresolvedSpecifier {
        /// Raw specifier text, prefix included.
        specifier: String,
        /// Importing file.
        from: PathBuf,
    },

    /// Filesystem access failed for a reason other than "not found".
    #[error("failed to access '{path}': {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The parser reported syntax errors.
    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

impl GraphError {
    pub(crate) fn unsupported(
        path: impl Into<PathBuf>,
        span: SourceSpan,
        details: impl Into<String>,
    ) -> Self {
        Self::UnsupportedConstruct { path: path.into(), span, details: details.into() }
    }

    /// Helper to create a parse error from multiple diagnostic strings.
    pub fn parse_error(path: impl Into<PathBuf>, diagnostics: &[String]) -> Self {
        Self::Parse { path: path.into(), message: diagnostics.join("; ") }
    }
}
