use redcap_model::FieldRecord;

use crate::error::Result;
use crate::registry::FieldTransformer;
use crate::span::Part;

/// One bounded integer component of an age split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeComponent {
    pub suffix: &'static str,
    /// Appended to the original label after a space.
    pub label: &'static str,
    pub max: u32,
}

/// Splits an age into a whole-unit field and a partial-unit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeSplit {
    pub major: AgeComponent,
    pub minor: AgeComponent,
    /// Field note on the major component pointing at the minor one.
    pub hint: &'static str,
}

impl AgeSplit {
    pub const WEEKS_DAYS: AgeSplit = AgeSplit {
        major: AgeComponent {
            suffix: "_weeks",
            label: "in full weeks",
            max: 52,
        },
        minor: AgeComponent {
            suffix: "_days",
            label: "in days (partial week)",
            max: 6,
        },
        hint: "Specify partial week in days below",
    };

    pub const YEARS_MONTHS: AgeSplit = AgeSplit {
        major: AgeComponent {
            suffix: "_years",
            label: "in full years",
            max: 100,
        },
        minor: AgeComponent {
            suffix: "_months",
            label: "additional months (partial year)",
            max: 11,
        },
        hint: "Specify partial years in months below",
    };
}

impl FieldTransformer for AgeSplit {
    fn description(&self) -> &'static str {
        "age split"
    }

    fn expand(&self, record: &FieldRecord) -> Result<Vec<Part>> {
        let component = |component: &AgeComponent| {
            let mut part = record.clone();
            part.field_kind = "text".to_string();
            part.label = format!("{} {}", record.label, component.label);
            part.set_integer_bounds(0, component.max);
            part
        };

        let mut major = component(&self.major);
        major.note = self.hint.to_string();

        let mut minor = component(&self.minor);
        minor.section_header.clear();
        minor.note.clear();

        Ok(vec![
            Part::new(self.major.suffix, major),
            Part::new(self.minor.suffix, minor),
        ])
    }
}
