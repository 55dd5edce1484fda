//! Command-line surface of the repeat-group expander.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
