//! Data dictionary CSV files.
//!
//! The header row passes through verbatim. Cells are never trimmed because
//! leading whitespace in the id column is meaningful to the marker language.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use redcap_model::{COLUMN_COUNT, FieldRecord};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// A parsed data dictionary: the header row plus one record per data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    pub header: Vec<String>,
    pub records: Vec<FieldRecord>,
}

impl Dictionary {
    pub fn new(header: Vec<String>, records: Vec<FieldRecord>) -> Self {
        Self { header, records }
    }

    /// Same header, different rows.
    pub fn with_records(&self, records: Vec<FieldRecord>) -> Self {
        Self {
            header: self.header.clone(),
            records,
        }
    }

    /// Number of header cells; every written row is padded to it.
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// Reads a data dictionary from `path`.
pub fn read_dictionary(path: &Path) -> Result<Dictionary> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dictionary(&text, path)
}

/// Parses dictionary CSV text. `path` is used for error context only.
pub fn parse_dictionary(text: &str, path: &Path) -> Result<Dictionary> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if header.iter().all(String::is_empty) {
        return Err(IngestError::EmptyDictionary {
            path: path.to_path_buf(),
        });
    }
    if header.len() < COLUMN_COUNT {
        warn!(
            path = %path.display(),
            columns = header.len(),
            expected = COLUMN_COUNT,
            "Dictionary header is narrower than the standard column set"
        );
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        records.push(FieldRecord::from_cells(row.iter()));
    }
    debug!(
        path = %path.display(),
        columns = header.len(),
        records = records.len(),
        "Read data dictionary"
    );
    Ok(Dictionary { header, records })
}

/// Renders the dictionary as CSV text.
///
/// Rows are padded to the header width. Cells past the header are kept only
/// when they hold content.
pub fn render_dictionary(dictionary: &Dictionary, path: &Path) -> Result<String> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let width = dictionary.width();
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    writer.write_record(&dictionary.header).map_err(csv_error)?;
    for record in &dictionary.records {
        let mut cells = record.to_cells(width);
        while cells.len() > width && cells.last().is_some_and(String::is_empty) {
            cells.pop();
        }
        writer.write_record(&cells).map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| IngestError::FileWrite {
            path: path.to_path_buf(),
            source: err.into_error(),
        })?;
    // Every cell came from a `String`, so the buffer is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the dictionary to `path`, replacing any existing file.
///
/// The file is only touched once the whole dictionary has been rendered.
pub fn write_dictionary(path: &Path, dictionary: &Dictionary) -> Result<()> {
    let text = render_dictionary(dictionary, path)?;
    fs::write(path, text).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        records = dictionary.records.len(),
        "Wrote data dictionary"
    );
    Ok(())
}
