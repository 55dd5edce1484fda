use redcap_common::{clean_identifier, fill_placeholder};
use redcap_model::FieldRecord;

use super::split_label;
use crate::error::{Result, TransformError};
use crate::kind::{ChoiceKind, DetailKind};
use crate::registry::FieldTransformer;
use crate::span::Part;

const OTHER_CHOICE: &str = "other";

/// Emits a choice field followed by one free-text detail field per choice that
/// needs detail, each shown only while its choice is selected.
///
/// The label cell may carry a detail prompt template after ` | `, in which
/// `$placeholder` is replaced by the choice label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceDetails {
    choice: ChoiceKind,
    detail: DetailKind,
    /// Only the `other` choice gets a detail field.
    other_only: bool,
}

impl ChoiceDetails {
    pub fn new(choice: ChoiceKind, detail: DetailKind, other_only: bool) -> Self {
        Self {
            choice,
            detail,
            other_only,
        }
    }
}

impl FieldTransformer for ChoiceDetails {
    fn description(&self) -> &'static str {
        if self.other_only {
            "choice with other detail"
        } else {
            "choice with details"
        }
    }

    fn expand(&self, record: &FieldRecord) -> Result<Vec<Part>> {
        let choices = record.choice_list()?;
        let field = record.base_id();
        let (base_label, prompt_template) = split_label(&record.label);

        let mut base = record.clone();
        base.field_kind = self.choice.as_str().to_string();
        base.label = base_label.to_string();
        let mut parts = vec![Part::new("", base)];

        // Errors name the tag as written, aliases included.
        let kind = record.field_kind.trim();
        if self.other_only {
            let others: Vec<String> = choices
                .iter()
                .filter(|choice| choice.normalized_label() == OTHER_CHOICE)
                .map(|choice| choice.index.clone())
                .collect();
            if others.len() > 1 {
                return Err(TransformError::AmbiguousOtherChoice {
                    field: field.to_string(),
                    kind: kind.to_string(),
                    indices: others,
                });
            }
        }

        for choice in &choices {
            let selected_for_detail = if self.other_only {
                choice.normalized_label() == OTHER_CHOICE
            } else {
                true
            };
            if !selected_for_detail {
                continue;
            }

            let prompt = match prompt_template {
                Some(template) => fill_placeholder(template, &choice.label),
                None if self.other_only => format!("Please specify other {base_label}"),
                None => format!("Please specify details for {}", choice.label),
            };

            let mut detail = record.clone();
            detail.field_kind = self.detail.as_str().to_string();
            detail.label = prompt;
            detail.choices.clear();
            detail.section_header.clear();
            detail.branching_logic = self.choice.selected_condition(field, &choice.index);
            parts.push(Part::new(
                format!("_{}_dtls", clean_identifier(&choice.label)),
                detail,
            ));
        }

        if parts.len() == 1 {
            let accepted = if self.other_only {
                vec![OTHER_CHOICE.to_string()]
            } else {
                choices.iter().map(|choice| choice.normalized_label()).collect()
            };
            return Err(TransformError::MissingDetailChoice {
                field: field.to_string(),
                kind: kind.to_string(),
                accepted,
            });
        }

        Ok(parts)
    }
}
