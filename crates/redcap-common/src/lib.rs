//! Shared utilities for redcap-repeat crates.
//!
//! This crate provides the small text helpers used by both expansion passes:
//! `$name` template substitution, identifier cleaning and ordinal wording.

pub mod template;
pub mod text;

// Re-export commonly used functions at crate root for convenience
pub use template::{fill_placeholder, has_braced_placeholder, safe_substitute};
pub use text::{clean_identifier, display_case, ordinal, ordinal_suffix};
