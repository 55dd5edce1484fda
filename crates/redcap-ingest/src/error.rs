//! Error types for dictionary I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing dictionary files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// The input file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created or written.
    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file has no header row.
    #[error("Data dictionary {path} is empty")]
    EmptyDictionary { path: PathBuf },

    /// The plural table is not a JSON object of strings.
    #[error("Invalid plural table {path}: {source}")]
    PluralTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
