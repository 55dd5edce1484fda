//! Choice lists (`1, Yes | 2, No`).

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One `index, label` entry of a choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub index: String,
    pub label: String,
}

impl Choice {
    pub fn new(index: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            label: label.into(),
        }
    }

    /// Label lower-cased and trimmed, for synonym matching.
    pub fn normalized_label(&self) -> String {
        self.label.trim().to_lowercase()
    }
}

/// Ordered choices of a multiple- or single-choice field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceList {
    choices: Vec<Choice>,
}

impl ChoiceList {
    /// Parses a choices cell. `field` names the record in error messages.
    ///
    /// Entries are separated by `|`; each entry splits at its first comma into
    /// index and label. Blank entries are ignored.
    pub fn parse(cell: &str, field: &str) -> Result<Self> {
        let mut choices = Vec::new();
        for entry in cell.split('|') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let Some((index, label)) = entry.split_once(',') else {
                return Err(ModelError::MalformedChoice {
                    field: field.to_string(),
                    choice: entry.to_string(),
                });
            };
            choices.push(Choice::new(index.trim(), label.trim()));
        }
        Ok(Self { choices })
    }

    /// Builds the choices cell for labels enumerated from zero.
    pub fn enumerate_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = labels
            .into_iter()
            .enumerate()
            .map(|(idx, label)| Choice::new(idx.to_string(), label))
            .collect();
        Self { choices }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Indices of every choice except `index`, in list order.
    pub fn other_indices<'a>(&'a self, index: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.choices
            .iter()
            .map(|choice| choice.index.as_str())
            .filter(move |candidate| *candidate != index)
    }

    /// Renders the list back into a choices cell.
    pub fn to_cell(&self) -> String {
        self.choices
            .iter()
            .map(|choice| format!("{}, {}", choice.index, choice.label))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl<'a> IntoIterator for &'a ChoiceList {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.iter()
    }
}
