//! Data dictionary model for repeat-group expansion.
//!
//! - **record**: [`FieldRecord`], one row of a REDCap data dictionary
//! - **choice**: [`ChoiceList`] parsing for choice cells
//! - **marker**: the id-column group marker language ([`IdCell`], [`RepeatSpec`])
//! - **options**: [`ExpandOptions`] and the [`UxScheme`] selection

pub mod choice;
pub mod error;
pub mod marker;
pub mod options;
pub mod record;

pub use choice::{Choice, ChoiceList};
pub use error::{ModelError, Result};
pub use marker::{GroupMarker, GroupOpen, IdCell, RepeatSpec};
pub use options::{DEFAULT_MAX_ITERATIONS, DEFAULT_MUTEX_SYNONYMS, ExpandOptions, UxScheme};
pub use record::{COLUMN_COUNT, DICTIONARY_COLUMNS, FieldRecord};
