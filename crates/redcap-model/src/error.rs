use thiserror::Error;

/// Errors raised while interpreting data dictionary cells.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A choice entry has no `,` between its index and label.
    #[error(
        "error processing record '{field}': choice '{choice}' has no comma between the number and the choice"
    )]
    MalformedChoice { field: String, choice: String },

    /// The repeat-count token of a begin marker could not be parsed.
    #[error(
        "record '{field}': invalid repeat count '{token}' (expected a number, [field_id] or [field_id]N)"
    )]
    InvalidRepeatCount { field: String, token: String },

    /// A begin marker is missing its count token or display name.
    #[error("record '{field}': repeat marker needs a count and a group name")]
    MissingRepeatName { field: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
