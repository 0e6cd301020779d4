//! Error types for the document model.
//!
//! Only structural faults live here. Recoverable findings from parsing are
//! collected in [`ParseReport`](crate::ParseReport) instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::Field;

/// Errors that abort a document operation.
#[derive(Debug, Error)]
pub enum ConlluError {
    /// A positional update ran out of values before covering every token.
    #[error("exhausted input while updating field `{field}`: expected {expected} values, received {received}")]
    ExhaustedInput {
        field: Field,
        expected: usize,
        received: usize,
    },

    /// A column name that is not part of the table.
    #[error("unknown field name `{0}`")]
    UnknownField(String),

    /// Reading or writing a file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConlluError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConlluError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for document operations.
pub type ConlluResult<T> = Result<T, ConlluError>;
