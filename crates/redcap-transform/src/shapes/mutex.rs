use redcap_common::clean_identifier;
use redcap_model::FieldRecord;
use tracing::debug;

use super::split_label;
use crate::error::Result;
use crate::kind::ChoiceKind;
use crate::registry::FieldTransformer;
use crate::span::Part;

/// Checkbox whose "none/unknown" style answers cannot be combined with any
/// other answer.
///
/// For each guarded choice a descriptive warning field is emitted that shows
/// when that choice and at least one other choice are both checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxMutex {
    synonyms: Vec<String>,
    /// Also emit a notes field for an `other` choice.
    other: bool,
}

impl CheckboxMutex {
    pub fn new(synonyms: Vec<String>, other: bool) -> Self {
        Self { synonyms, other }
    }

    fn guards(&self, label: &str) -> bool {
        self.synonyms.iter().any(|synonym| synonym == label)
    }
}

impl FieldTransformer for CheckboxMutex {
    fn description(&self) -> &'static str {
        "mutually exclusive checkbox"
    }

    fn expand(&self, record: &FieldRecord) -> Result<Vec<Part>> {
        let choices = record.choice_list()?;
        let field = record.base_id();
        let (base_label, _) = split_label(&record.label);

        let mut base = record.clone();
        base.field_kind = ChoiceKind::Checkbox.as_str().to_string();
        base.label = base_label.to_string();
        let mut parts = vec![Part::new("", base)];

        for choice in &choices {
            let label = choice.normalized_label();
            if self.guards(&label) {
                let others: Vec<String> = choices
                    .other_indices(&choice.index)
                    .map(|index| ChoiceKind::Checkbox.selected_condition(field, index))
                    .collect();
                if others.is_empty() {
                    debug!(field, choice = %label, "no other choices to exclude");
                    continue;
                }
                let mut warning = record.clone();
                warning.field_kind = "descriptive".to_string();
                warning.label = format!(
                    "You selected {label} and another answer choice. Please revise your answer."
                );
                warning.choices.clear();
                warning.section_header.clear();
                warning.note.clear();
                warning.clear_validation();
                warning.branching_logic = format!(
                    "{} and ({})",
                    ChoiceKind::Checkbox.selected_condition(field, &choice.index),
                    others.join(" or ")
                );
                parts.push(Part::new(format!("_{}", clean_identifier(&label)), warning));
            }

            if self.other && label == "other" {
                let mut other = record.clone();
                other.field_kind = "notes".to_string();
                other.label = "Please specify details for other".to_string();
                other.choices.clear();
                other.section_header.clear();
                other.branching_logic =
                    ChoiceKind::Checkbox.selected_condition(field, &choice.index);
                parts.push(Part::new("_other", other));
            }
        }

        Ok(parts)
    }
}
