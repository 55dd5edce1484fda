//! Structure check: the group tree of a dictionary.

use redcap_model::{FieldRecord, RepeatSpec};

use crate::error::Result;
use crate::scanner::{GroupSpan, Row, Segment, find_group, partition, tokenize};

/// One group and the groups nested directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutline {
    pub name: String,
    pub count: RepeatSpec,
    /// Base id of the begin marker row.
    pub first_field: String,
    /// 1 for a top-level group.
    pub depth: usize,
    /// Index of the begin marker row in the checked sequence.
    pub start: usize,
    /// Rows spanned, markers included.
    pub rows: usize,
    pub single_row: bool,
    pub children: Vec<GroupOutline>,
}

impl GroupOutline {
    fn from_span(span: &GroupSpan<'_>, start: usize, depth: usize) -> Result<Self> {
        let mut children = Vec::new();
        let mut index = 1;
        while index < span.rows.len() {
            if span.rows[index].cell.is_begin() {
                let nested = find_group(&span.rows[index..])?;
                children.push(Self::from_span(&nested, start + index, depth + 1)?);
                index += nested.consumed;
            } else {
                index += 1;
            }
        }

        Ok(Self {
            name: span.open.name.clone(),
            count: span.open.count.clone(),
            first_field: span.head().name(),
            depth,
            start,
            rows: span.consumed,
            single_row: span.open.single_row,
            children,
        })
    }

    /// This group followed by all of its descendants, depth first.
    pub fn walk(&self) -> Vec<&GroupOutline> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Number of groups nested at any depth below this one.
    pub fn descendants(&self) -> usize {
        self.walk().len() - 1
    }
}

/// Checks marker balance over pass 1 output and returns the top-level groups.
///
/// # Errors
///
/// `UnclosedGroup` when a begin marker never closes, `UnmatchedEnd` when an
/// end marker appears outside any group, or a model error for an unreadable
/// marker.
pub fn check_structure(records: &[FieldRecord]) -> Result<Vec<GroupOutline>> {
    let rows = tokenize(records)?;
    outline_rows(&rows)
}

/// [`check_structure`] over rows that are already tokenized.
pub fn outline_rows<'a>(rows: &'a [Row<'a>]) -> Result<Vec<GroupOutline>> {
    partition(rows)?
        .iter()
        .filter_map(|segment| match segment {
            Segment::Group { start, span } => Some(GroupOutline::from_span(span, *start, 1)),
            Segment::Field(_) => None,
        })
        .collect()
}
