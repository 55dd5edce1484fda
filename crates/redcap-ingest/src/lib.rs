//! Data dictionary I/O.
//!
//! - **dictionary**: CSV reading and writing with header passthrough
//! - **plurals**: irregular plural tables in JSON

pub mod dictionary;
pub mod error;
pub mod plurals;

pub use dictionary::{
    Dictionary, parse_dictionary, read_dictionary, render_dictionary, write_dictionary,
};
pub use error::{IngestError, Result};
pub use plurals::{DEFAULT_PLURALS_FILE, load_plural_table, load_plurals};
