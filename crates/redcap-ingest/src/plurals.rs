//! Irregular plural tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{IngestError, Result};

/// File name looked up next to the working directory when no table is given.
pub const DEFAULT_PLURALS_FILE: &str = "plurals.json";

/// Reads a JSON object mapping singular group names to plurals.
pub fn load_plural_table(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| IngestError::PluralTable {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the plural table for a run.
///
/// An explicit table must load. Without one, [`DEFAULT_PLURALS_FILE`] in
/// `search_dir` is used when present; a broken default is skipped.
pub fn load_plurals(
    explicit: Option<&Path>,
    search_dir: &Path,
) -> Result<BTreeMap<String, String>> {
    if let Some(path) = explicit {
        let table = load_plural_table(path)?;
        info!(path = %path.display(), entries = table.len(), "Loaded plural table");
        return Ok(table);
    }

    let default = search_dir.join(DEFAULT_PLURALS_FILE);
    if !default.is_file() {
        return Ok(BTreeMap::new());
    }
    match load_plural_table(&default) {
        Ok(table) => {
            info!(path = %default.display(), entries = table.len(), "Loaded plural table");
            Ok(table)
        }
        Err(err) => {
            warn!(error = %err, "Ignoring default plural table");
            Ok(BTreeMap::new())
        }
    }
}
