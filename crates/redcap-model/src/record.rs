//! Data dictionary field records.

use serde::{Deserialize, Serialize};

use crate::choice::ChoiceList;
use crate::error::Result;
use crate::marker::IdCell;

/// Column headers of a REDCap data dictionary, in file order.
///
/// Columns past the last entry are kept on [`FieldRecord::trailing`].
pub const DICTIONARY_COLUMNS: [&str; 16] = [
    "Variable / Field Name",
    "Form Name",
    "Section Header",
    "Field Type",
    "Field Label",
    "Choices, Calculations, OR Slider Labels",
    "Field Note",
    "Text Validation Type OR Show Slider Number",
    "Text Validation Min",
    "Text Validation Max",
    "Identifier?",
    "Branching Logic (Show field only if...)",
    "Required Field?",
    "Custom Alignment",
    "Question Number (surveys only)",
    "Matrix Group Name",
];

/// Number of named columns on a [`FieldRecord`].
pub const COLUMN_COUNT: usize = DICTIONARY_COLUMNS.len();

/// One row of a data dictionary.
///
/// The `id` cell holds the raw identifier token, which may carry a repeat
/// group marker (`med startrepeat 3 Medication`) or the `${d}` ordinal
/// placeholder. Use [`FieldRecord::id_cell`] to tokenize it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: String,
    pub form_name: String,
    pub section_header: String,
    pub field_kind: String,
    pub label: String,
    pub choices: String,
    pub note: String,
    pub validation_type: String,
    pub validation_min: String,
    pub validation_max: String,
    pub identifier: String,
    pub branching_logic: String,
    pub required: String,
    pub custom_alignment: String,
    pub question_number: String,
    pub matrix_group_name: String,
    /// Cells beyond the named columns, kept verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<String>,
}

impl FieldRecord {
    /// Creates a record with only the id and field kind set.
    pub fn new(id: impl Into<String>, field_kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_kind: field_kind.into(),
            ..Self::default()
        }
    }

    /// Builds a record from row cells in dictionary column order.
    ///
    /// Missing cells are left empty.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut record = Self::default();
        for (idx, cell) in cells.into_iter().enumerate() {
            let value = cell.into();
            match record.column_mut(idx) {
                Some(slot) => *slot = value,
                None => record.trailing.push(value),
            }
        }
        record
    }

    /// Returns the row cells, padded with empty cells to at least `width`.
    pub fn to_cells(&self, width: usize) -> Vec<String> {
        let mut cells: Vec<String> = [
            &self.id,
            &self.form_name,
            &self.section_header,
            &self.field_kind,
            &self.label,
            &self.choices,
            &self.note,
            &self.validation_type,
            &self.validation_min,
            &self.validation_max,
            &self.identifier,
            &self.branching_logic,
            &self.required,
            &self.custom_alignment,
            &self.question_number,
            &self.matrix_group_name,
        ]
        .into_iter()
        .cloned()
        .collect();
        cells.extend(self.trailing.iter().cloned());
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        cells
    }

    fn column_mut(&mut self, idx: usize) -> Option<&mut String> {
        let slot = match idx {
            0 => &mut self.id,
            1 => &mut self.form_name,
            2 => &mut self.section_header,
            3 => &mut self.field_kind,
            4 => &mut self.label,
            5 => &mut self.choices,
            6 => &mut self.note,
            7 => &mut self.validation_type,
            8 => &mut self.validation_min,
            9 => &mut self.validation_max,
            10 => &mut self.identifier,
            11 => &mut self.branching_logic,
            12 => &mut self.required,
            13 => &mut self.custom_alignment,
            14 => &mut self.question_number,
            15 => &mut self.matrix_group_name,
            _ => return None,
        };
        Some(slot)
    }

    /// Tokenizes the id cell into its base identifier and group marker.
    pub fn id_cell(&self) -> Result<IdCell> {
        IdCell::parse(&self.id)
    }

    /// The identifier without any group marker.
    pub fn base_id(&self) -> &str {
        IdCell::base_of(&self.id)
    }

    /// Parses the choices cell.
    pub fn choice_list(&self) -> Result<ChoiceList> {
        ChoiceList::parse(&self.choices, self.base_id())
    }

    /// Clears validation type and numeric bounds.
    pub fn clear_validation(&mut self) {
        self.validation_type.clear();
        self.validation_min.clear();
        self.validation_max.clear();
    }

    /// Sets an integer validation with the given bounds.
    pub fn set_integer_bounds(&mut self, min: u32, max: u32) {
        self.validation_type = "integer".to_string();
        self.validation_min = min.to_string();
        self.validation_max = max.to_string();
    }
}
