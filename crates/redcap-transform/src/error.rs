//! Error types for field transformation.

use redcap_model::ModelError;
use thiserror::Error;

/// Errors that abort pass 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A details-kind field has no choice matching the detail set.
    #[error(
        "for record '{field}', since the field type is '{kind}' you must specify a choice chosen from one of the following values: {}",
        .accepted.join(", ")
    )]
    MissingDetailChoice {
        field: String,
        kind: String,
        accepted: Vec<String>,
    },

    /// An other-only field has more than one choice labelled `other`, so the
    /// detail field id would repeat.
    #[error(
        "for record '{field}', the field type '{kind}' allows one 'other' choice but choices {} are all labelled other",
        .indices.join(", ")
    )]
    AmbiguousOtherChoice {
        field: String,
        kind: String,
        indices: Vec<String>,
    },
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_detail_lists_accepted_values() {
        let err = TransformError::MissingDetailChoice {
            field: "smoke".to_string(),
            kind: "radio_other".to_string(),
            accepted: vec!["other".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "for record 'smoke', since the field type is 'radio_other' you must specify a choice chosen from one of the following values: other"
        );
    }
}
