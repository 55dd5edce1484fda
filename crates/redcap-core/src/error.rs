//! Error types for group unrolling.

use redcap_model::ModelError;
use redcap_transform::TransformError;
use thiserror::Error;

/// Errors that abort an expansion run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepeatError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A begin marker whose group runs past the end of the dictionary.
    #[error("group opened by record '{field}' is never closed with endrepeat")]
    UnclosedGroup { field: String },

    /// An end marker with no open group.
    #[error("record '{field}' closes a group that was never opened")]
    UnmatchedEnd { field: String },

    /// The scanner was pointed at a row that does not open a group.
    #[error("record '{field}' does not open a repeat group")]
    NotGroupStart { field: String },
}

/// Result type for unrolling operations.
pub type Result<T> = std::result::Result<T, RepeatError>;
