use redcap_common::{clean_identifier, fill_placeholder};
use redcap_model::FieldRecord;

use crate::error::Result;
use crate::registry::FieldTransformer;
use crate::span::Part;

/// Splits a field into a minimum and a maximum text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinMax {
    pub minimum: &'static str,
    pub maximum: &'static str,
}

impl MinMax {
    pub const PLAIN: MinMax = MinMax {
        minimum: "minimum",
        maximum: "maximum",
    };

    pub const NORMAL_RANGE: MinMax = MinMax {
        minimum: "normal range minimum",
        maximum: "normal range maximum",
    };

    /// The two bound parts for `record`. Only the minimum keeps the section
    /// header.
    pub fn bound_parts(&self, record: &FieldRecord) -> Vec<Part> {
        let bound = |name: &str| {
            let mut part = record.clone();
            part.field_kind = "text".to_string();
            part.label = fill_placeholder(&record.label, name);
            Part::new(format!("_{}", clean_identifier(name)), part)
        };
        let minimum = bound(self.minimum);
        let mut maximum = bound(self.maximum);
        maximum.record.section_header.clear();
        vec![minimum, maximum]
    }
}

impl FieldTransformer for MinMax {
    fn description(&self) -> &'static str {
        "minimum/maximum pair"
    }

    fn expand(&self, record: &FieldRecord) -> Result<Vec<Part>> {
        Ok(self.bound_parts(record))
    }
}
