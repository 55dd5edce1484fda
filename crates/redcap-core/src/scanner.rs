//! Group boundary scanning over the pass 1 output.
//!
//! Rows are tokenized once into [`Row`]s; [`find_group`] then locates the
//! span of one (possibly nested) group by counting marker depth, and
//! [`partition`] splits a whole dictionary into pass-through fields and
//! top-level groups.

use redcap_model::{FieldRecord, GroupOpen, IdCell};

use crate::error::{RepeatError, Result};

/// A record paired with its tokenized id cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub cell: IdCell,
    pub record: &'a FieldRecord,
}

impl<'a> Row<'a> {
    pub fn new(record: &'a FieldRecord) -> Result<Self> {
        Ok(Self {
            cell: record.id_cell()?,
            record,
        })
    }

    /// Name used for this row in error messages.
    pub fn name(&self) -> String {
        if self.cell.base.is_empty() {
            self.record.id.trim().to_string()
        } else {
            self.cell.base.clone()
        }
    }
}

/// Tokenizes every id cell, failing on the first malformed marker.
pub fn tokenize(records: &[FieldRecord]) -> Result<Vec<Row<'_>>> {
    records.iter().map(Row::new).collect()
}

/// The rows of one group as found by [`find_group`].
#[derive(Debug, Clone, Copy)]
pub struct GroupSpan<'a> {
    /// Marker on the first row.
    pub open: &'a GroupOpen,
    /// Rows making up the group, without a trailing stray end marker.
    pub rows: &'a [Row<'a>],
    /// Rows consumed from the scanned sequence, the stray end marker included.
    pub consumed: usize,
}

impl<'a> GroupSpan<'a> {
    /// The begin marker row.
    pub fn head(&self) -> &'a Row<'a> {
        &self.rows[0]
    }
}

/// Finds the group opened by the first row of `rows`.
///
/// Depth rises on every begin marker and falls on every end marker or
/// self-closing `repeat` marker; the span ends where depth returns to zero.
/// A final end marker row with no identifier of its own is not part of the
/// returned rows but is counted in [`GroupSpan::consumed`].
pub fn find_group<'a>(rows: &'a [Row<'a>]) -> Result<GroupSpan<'a>> {
    let Some(head) = rows.first() else {
        return Err(RepeatError::NotGroupStart {
            field: String::new(),
        });
    };
    let open = head.cell.begin().ok_or_else(|| RepeatError::NotGroupStart {
        field: head.name(),
    })?;

    let mut depth = 0usize;
    for (index, row) in rows.iter().enumerate() {
        if row.cell.is_begin() {
            depth += 1;
        }
        if row.cell.closes_group() {
            depth -= 1;
        }
        if depth == 0 {
            let consumed = index + 1;
            let end = if index > 0 && row.cell.is_stray_end() {
                index
            } else {
                consumed
            };
            return Ok(GroupSpan {
                open,
                rows: &rows[..end],
                consumed,
            });
        }
    }

    Err(RepeatError::UnclosedGroup { field: head.name() })
}

/// One element of a partitioned dictionary.
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    /// A row outside any group.
    Field(&'a Row<'a>),
    /// A top-level group together with its index in the scanned rows.
    Group { start: usize, span: GroupSpan<'a> },
}

/// Splits `rows` into pass-through rows and top-level groups, in order.
///
/// An end marker outside any group is an error.
pub fn partition<'a>(rows: &'a [Row<'a>]) -> Result<Vec<Segment<'a>>> {
    let mut segments = Vec::new();
    let mut index = 0;
    while index < rows.len() {
        let row = &rows[index];
        if row.cell.is_begin() {
            let span = find_group(&rows[index..])?;
            segments.push(Segment::Group { start: index, span });
            index += span.consumed;
        } else if row.cell.is_end() {
            return Err(RepeatError::UnmatchedEnd { field: row.name() });
        } else {
            segments.push(Segment::Field(row));
            index += 1;
        }
    }
    Ok(segments)
}
