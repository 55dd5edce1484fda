//! Field-kind tags understood by the transformer registry.

use std::fmt;

/// Base field type of a details/other expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceKind {
    Checkbox,
    Radio,
    Dropdown,
}

impl ChoiceKind {
    pub const ALL: [ChoiceKind; 3] = [Self::Checkbox, Self::Radio, Self::Dropdown];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Dropdown => "dropdown",
        }
    }

    /// Condition that is true when the choice with `index` is selected.
    pub fn selected_condition(self, field: &str, index: &str) -> String {
        match self {
            Self::Checkbox => format!("[{field}({index})]='1'"),
            Self::Radio | Self::Dropdown => format!("[{field}]='{index}'"),
        }
    }
}

/// Field type of a synthesized detail field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Text,
    Notes,
}

impl DetailKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Notes => "notes",
        }
    }
}

/// A shorthand field kind with a registered transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    MinMax,
    ValueWithWeightUnits,
    ValueWithLengthUnits,
    ValueWithUnits,
    ValueWithUnitsAndMinMax,
    ValueWithUnitsAndNormalRange,
    RangeWithUnits,
    AgeWeeksDays,
    AgeYearsMonths,
    /// `{checkbox,radio,dropdown}_{details,other}[_text|_note]`.
    ChoiceDetails {
        choice: ChoiceKind,
        detail: DetailKind,
        other_only: bool,
    },
    /// `checkbox_mutex[_other]`.
    CheckboxMutex { other: bool },
}

const DETAIL_SUFFIXES: [(&str, DetailKind, bool); 6] = [
    ("details", DetailKind::Text, false),
    ("details_text", DetailKind::Text, false),
    ("details_note", DetailKind::Notes, false),
    ("other", DetailKind::Text, true),
    ("other_text", DetailKind::Text, true),
    ("other_note", DetailKind::Notes, true),
];

impl FieldKind {
    /// Looks up the kind for a field-type cell. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag.trim() {
            "minmax" => Self::MinMax,
            "value_with_weight_units" => Self::ValueWithWeightUnits,
            "value_with_length_units" => Self::ValueWithLengthUnits,
            "value_with_units" => Self::ValueWithUnits,
            "value_with_units_and_minmax" => Self::ValueWithUnitsAndMinMax,
            "value_with_units_and_normal_range" => Self::ValueWithUnitsAndNormalRange,
            "range_with_units" => Self::RangeWithUnits,
            "age_weeks_days" => Self::AgeWeeksDays,
            "age_years_months" => Self::AgeYearsMonths,
            "checkbox_mutex" => Self::CheckboxMutex { other: false },
            "checkbox_mutex_other" => Self::CheckboxMutex { other: true },
            other => return Self::choice_details_from_tag(other),
        };
        Some(kind)
    }

    fn choice_details_from_tag(tag: &str) -> Option<Self> {
        let (prefix, rest) = tag.split_once('_')?;
        let choice = ChoiceKind::ALL
            .into_iter()
            .find(|choice| choice.as_str() == prefix)?;
        DETAIL_SUFFIXES
            .iter()
            .find(|(suffix, _, _)| *suffix == rest)
            .map(|&(_, detail, other_only)| Self::ChoiceDetails {
                choice,
                detail,
                other_only,
            })
    }

    /// Every tag the registry recognizes, in documentation order.
    pub fn tags() -> Vec<String> {
        let mut tags: Vec<String> = [
            "minmax",
            "value_with_weight_units",
            "value_with_length_units",
            "value_with_units",
            "value_with_units_and_minmax",
            "value_with_units_and_normal_range",
            "range_with_units",
            "age_weeks_days",
            "age_years_months",
        ]
        .iter()
        .map(|tag| (*tag).to_string())
        .collect();
        for choice in ChoiceKind::ALL {
            for (suffix, _, _) in DETAIL_SUFFIXES {
                tags.push(format!("{}_{suffix}", choice.as_str()));
            }
        }
        tags.push("checkbox_mutex".to_string());
        tags.push("checkbox_mutex_other".to_string());
        tags
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinMax => f.write_str("minmax"),
            Self::ValueWithWeightUnits => f.write_str("value_with_weight_units"),
            Self::ValueWithLengthUnits => f.write_str("value_with_length_units"),
            Self::ValueWithUnits => f.write_str("value_with_units"),
            Self::ValueWithUnitsAndMinMax => f.write_str("value_with_units_and_minmax"),
            Self::ValueWithUnitsAndNormalRange => {
                f.write_str("value_with_units_and_normal_range")
            }
            Self::RangeWithUnits => f.write_str("range_with_units"),
            Self::AgeWeeksDays => f.write_str("age_weeks_days"),
            Self::AgeYearsMonths => f.write_str("age_years_months"),
            Self::ChoiceDetails {
                choice,
                detail,
                other_only,
            } => {
                let family = if *other_only { "other" } else { "details" };
                let detail = match detail {
                    DetailKind::Text => "",
                    DetailKind::Notes => "_note",
                };
                write!(f, "{}_{family}{detail}", choice.as_str())
            }
            Self::CheckboxMutex { other: false } => f.write_str("checkbox_mutex"),
            Self::CheckboxMutex { other: true } => f.write_str("checkbox_mutex_other"),
        }
    }
}
