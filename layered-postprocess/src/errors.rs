//! Error types for the postprocessor.

use layered_conllu::ConlluError;
use thiserror::Error;

use crate::Stage;

/// Errors that abort a postprocessing run.
#[derive(Debug, Error)]
pub enum PostprocessError {
    /// An override row without 3 columns (4 when copied from a glossary).
    #[error("malformed override row at line {line}: expected 3 or 4 columns, found {found}: `{text}`")]
    MalformedOverride {
        line: usize,
        found: usize,
        text: String,
    },

    /// A stage was requested out of the linear order.
    #[error("stage `{requested}` cannot run after `{current}`")]
    StageOrder { current: Stage, requested: Stage },

    /// An auxiliary input file could not be read.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// The configuration file is unreadable or invalid.
    #[error("invalid configuration {path}: {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Document(#[from] ConlluError),
}

/// Result type for postprocessing operations.
pub type PostprocessResult<T> = Result<T, PostprocessError>;
