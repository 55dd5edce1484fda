//! Repeat-group marker language carried in the id column.
//!
//! An id cell is either a plain identifier or an identifier followed by a
//! group marker:
//!
//! ```text
//! med startrepeat 3 Medication     opens a group repeated 3 times
//! dose repeat [num_doses] Dose     single-row group, count read from num_doses
//! med_notes endrepeat              closes the innermost open group
//!  endrepeat                       stray end marker with no field of its own
//! ```
//!
//! The count token is tokenized into a [`RepeatSpec`]; anything that is not a
//! number, `[field_id]` or `[field_id]N` is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

const START_KEYWORD: &str = "startrepeat";
const SINGLE_KEYWORD: &str = "repeat";
const END_KEYWORD: &str = "endrepeat";

fn is_keyword(token: &str) -> bool {
    matches!(token, START_KEYWORD | SINGLE_KEYWORD | END_KEYWORD)
}

/// How many times a group repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatSpec {
    /// A literal iteration count.
    Fixed(u32),
    /// Driven by another field; the maximum comes from that field's upper
    /// validation bound or the configured default.
    Referenced { field: String },
    /// Driven by another field with an explicit maximum.
    ReferencedWithMax { field: String, max: u32 },
}

impl RepeatSpec {
    /// Tokenizes a count token. `record` names the begin marker in errors.
    pub fn parse(token: &str, record: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidRepeatCount {
            field: record.to_string(),
            token: token.to_string(),
        };

        if is_digits(token) {
            return token.parse().map(Self::Fixed).map_err(|_| invalid());
        }

        let inner = token.strip_prefix('[').ok_or_else(invalid)?;
        let (field, rest) = inner.split_once(']').ok_or_else(invalid)?;
        if field.is_empty()
            || !field
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(invalid());
        }
        if rest.is_empty() {
            return Ok(Self::Referenced {
                field: field.to_string(),
            });
        }
        if !is_digits(rest) {
            return Err(invalid());
        }
        let max = rest.parse().map_err(|_| invalid())?;
        Ok(Self::ReferencedWithMax {
            field: field.to_string(),
            max,
        })
    }

    /// The field whose value drives the iteration count, if any.
    pub fn driver(&self) -> Option<&str> {
        match self {
            Self::Fixed(_) => None,
            Self::Referenced { field } | Self::ReferencedWithMax { field, .. } => Some(field),
        }
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

impl fmt::Display for RepeatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(count) => write!(f, "{count}"),
            Self::Referenced { field } => write!(f, "[{field}]"),
            Self::ReferencedWithMax { field, max } => write!(f, "[{field}]{max}"),
        }
    }
}

/// The opening half of a group marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOpen {
    /// `repeat`: the group is this single row and closes itself.
    pub single_row: bool,
    pub count: RepeatSpec,
    /// Display name, e.g. `Medication`.
    pub name: String,
}

/// A group marker attached to an id cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupMarker {
    Begin(GroupOpen),
    End,
}

/// A tokenized id cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCell {
    /// Identifier without marker. Empty for a stray marker row.
    pub base: String,
    pub marker: Option<GroupMarker>,
}

impl IdCell {
    /// A cell with no marker.
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            marker: None,
        }
    }

    /// Tokenizes a raw id cell.
    pub fn parse(cell: &str) -> Result<Self> {
        let base = Self::base_of(cell);
        let mut tokens = cell.split_whitespace();
        if !base.is_empty() {
            tokens.next();
        }

        let marker = match tokens.next() {
            Some(END_KEYWORD) => Some(GroupMarker::End),
            Some(keyword @ (START_KEYWORD | SINGLE_KEYWORD)) => {
                let record = if base.is_empty() { cell.trim() } else { base };
                let (Some(count), Some(first_word)) = (tokens.next(), tokens.next()) else {
                    return Err(ModelError::MissingRepeatName {
                        field: record.to_string(),
                    });
                };
                let name = std::iter::once(first_word)
                    .chain(tokens)
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(GroupMarker::Begin(GroupOpen {
                    single_row: keyword == SINGLE_KEYWORD,
                    count: RepeatSpec::parse(count, record)?,
                    name,
                }))
            }
            _ => None,
        };

        Ok(Self {
            base: base.to_string(),
            marker,
        })
    }

    /// The identifier part of a raw id cell without tokenizing the marker.
    ///
    /// A cell starting with whitespace or with a marker keyword has no
    /// identifier.
    pub fn base_of(cell: &str) -> &str {
        if cell.starts_with(char::is_whitespace) {
            return "";
        }
        match cell.split_whitespace().next() {
            Some(token) if !is_keyword(token) => token,
            _ => "",
        }
    }

    pub fn begin(&self) -> Option<&GroupOpen> {
        match &self.marker {
            Some(GroupMarker::Begin(open)) => Some(open),
            _ => None,
        }
    }

    pub fn is_begin(&self) -> bool {
        self.begin().is_some()
    }

    pub fn is_end(&self) -> bool {
        matches!(self.marker, Some(GroupMarker::End))
    }

    /// True when this row lowers the group depth: an end marker or a
    /// self-closing single-row marker.
    pub fn closes_group(&self) -> bool {
        match &self.marker {
            Some(GroupMarker::End) => true,
            Some(GroupMarker::Begin(open)) => open.single_row,
            None => false,
        }
    }

    /// An end marker row with no identifier of its own.
    pub fn is_stray_end(&self) -> bool {
        self.base.is_empty() && self.is_end()
    }

    /// Renders the cell back into id-column text.
    pub fn render(&self) -> String {
        match &self.marker {
            None => self.base.clone(),
            Some(GroupMarker::End) => format!("{} {END_KEYWORD}", self.base),
            Some(GroupMarker::Begin(open)) => {
                let keyword = if open.single_row {
                    SINGLE_KEYWORD
                } else {
                    START_KEYWORD
                };
                format!("{} {keyword} {} {}", self.base, open.count, open.name)
            }
        }
    }
}
