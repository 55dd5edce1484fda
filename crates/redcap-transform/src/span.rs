//! Identity-span tagging of expanded records.
//!
//! A transformer turns one record into several. The group marker carried by
//! the original id has to survive so that the expanded run still opens and
//! closes its group: a begin marker moves to the first record of the run and
//! an end marker to the last. A self-closing `repeat` marker is split into a
//! `startrepeat` on the first record and an `endrepeat` on the last.

use redcap_model::{FieldRecord, GroupMarker, GroupOpen, IdCell};

use crate::error::Result;

/// Position of a record within an expanded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanPosition {
    Begin,
    Middle,
    End,
}

/// One record produced by a transformer, named by the suffix appended to the
/// original identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub suffix: String,
    pub record: FieldRecord,
}

impl Part {
    pub fn new(suffix: impl Into<String>, record: FieldRecord) -> Self {
        Self {
            suffix: suffix.into(),
            record,
        }
    }
}

/// Id cell for a record at `position` of a run expanded from `original`.
pub fn retag_id(original: &IdCell, position: SpanPosition, suffix: &str) -> IdCell {
    let marker = match (&original.marker, position) {
        (Some(GroupMarker::Begin(open)), SpanPosition::Begin) => {
            Some(GroupMarker::Begin(GroupOpen {
                single_row: false,
                ..open.clone()
            }))
        }
        (Some(GroupMarker::Begin(open)), SpanPosition::End) if open.single_row => {
            Some(GroupMarker::End)
        }
        (Some(GroupMarker::End), SpanPosition::End) => Some(GroupMarker::End),
        _ => None,
    };
    IdCell {
        base: format!("{}{suffix}", original.base),
        marker,
    }
}

/// Assigns final id cells to the parts expanded from `original`.
///
/// A single part keeps the original marker unchanged.
pub fn assign_span_ids(original: &FieldRecord, parts: Vec<Part>) -> Result<Vec<FieldRecord>> {
    let cell = original.id_cell()?;
    let last = parts.len().saturating_sub(1);
    let records = parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            let id = if last == 0 {
                IdCell {
                    base: format!("{}{}", cell.base, part.suffix),
                    marker: cell.marker.clone(),
                }
            } else {
                let position = match idx {
                    0 => SpanPosition::Begin,
                    idx if idx == last => SpanPosition::End,
                    _ => SpanPosition::Middle,
                };
                retag_id(&cell, position, &part.suffix)
            };
            FieldRecord {
                id: id.render(),
                ..part.record
            }
        })
        .collect();
    Ok(records)
}
