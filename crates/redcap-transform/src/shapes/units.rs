use redcap_common::fill_placeholder;
use redcap_model::{ChoiceList, FieldRecord};

use super::MinMax;
use crate::error::Result;
use crate::registry::FieldTransformer;
use crate::span::Part;

const WEIGHT_UNIT: &str = "kg";
const POUND_UNIT: &str = "lb";
const OUNCES_NOTE: &str = "If units are lbs, specify ounces below";

/// Splits a measurement into a units selector and a value field, optionally
/// followed by a minimum/maximum pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueWithUnits {
    /// Field type of the units field (`dropdown` or free `text`).
    pub units_kind: &'static str,
    /// Fixed unit choices, enumerated from zero. Empty for free-text units.
    pub units: &'static [&'static str],
    /// Emit the value field. `range_with_units` only keeps units and bounds.
    pub with_value: bool,
    pub bounds: Option<MinMax>,
}

impl ValueWithUnits {
    pub const WEIGHT: ValueWithUnits = ValueWithUnits {
        units_kind: "dropdown",
        units: &[WEIGHT_UNIT, POUND_UNIT],
        with_value: true,
        bounds: None,
    };

    pub const LENGTH: ValueWithUnits = ValueWithUnits {
        units_kind: "dropdown",
        units: &["in", "cm"],
        with_value: true,
        bounds: None,
    };

    pub const FREE_TEXT: ValueWithUnits = ValueWithUnits {
        units_kind: "text",
        units: &[],
        with_value: true,
        bounds: None,
    };

    pub const WITH_MINMAX: ValueWithUnits = ValueWithUnits {
        bounds: Some(MinMax::PLAIN),
        ..Self::FREE_TEXT
    };

    pub const WITH_NORMAL_RANGE: ValueWithUnits = ValueWithUnits {
        bounds: Some(MinMax::NORMAL_RANGE),
        ..Self::FREE_TEXT
    };

    pub const RANGE: ValueWithUnits = ValueWithUnits {
        with_value: false,
        bounds: Some(MinMax::PLAIN),
        ..Self::FREE_TEXT
    };

    fn pound_index(&self) -> Option<usize> {
        if !self.units.contains(&WEIGHT_UNIT) {
            return None;
        }
        self.units.iter().position(|unit| *unit == POUND_UNIT)
    }
}

impl FieldTransformer for ValueWithUnits {
    fn description(&self) -> &'static str {
        "value with units"
    }

    fn expand(&self, record: &FieldRecord) -> Result<Vec<Part>> {
        let label = fill_placeholder(&record.label, "").trim().to_string();
        let base_id = record.base_id();

        let mut units = record.clone();
        units.field_kind = self.units_kind.to_string();
        units.label = format!("{label} units");
        units.note.clear();
        units.clear_validation();
        units.choices = if self.units.is_empty() {
            String::new()
        } else {
            ChoiceList::enumerate_labels(self.units.iter().copied()).to_cell()
        };
        let mut parts = vec![Part::new("_units", units)];

        let pound_index = self.pound_index();
        if self.with_value {
            let mut value = record.clone();
            value.field_kind = "text".to_string();
            value.label = label.clone();
            value.section_header.clear();
            value.choices.clear();
            if pound_index.is_some() {
                value.note = if value.note.trim().is_empty() {
                    OUNCES_NOTE.to_string()
                } else {
                    format!("{} ({OUNCES_NOTE})", value.note)
                };
            }
            parts.push(Part::new("", value));
        }

        if let Some(index) = pound_index
            && self.with_value
        {
            let mut ounces = record.clone();
            ounces.field_kind = "text".to_string();
            ounces.label = format!("{label} ounces");
            ounces.section_header.clear();
            ounces.choices.clear();
            ounces.note.clear();
            ounces.clear_validation();
            let shown = format!("[{base_id}_units] = '{index}'");
            ounces.branching_logic = if record.branching_logic.trim().is_empty() {
                shown
            } else {
                format!("({}) and {shown}", record.branching_logic)
            };
            parts.push(Part::new("_oz", ounces));
        }

        if let Some(bounds) = self.bounds {
            let mut unheaded = record.clone();
            unheaded.section_header.clear();
            parts.extend(bounds.bound_parts(&unheaded));
        }

        Ok(parts)
    }
}
