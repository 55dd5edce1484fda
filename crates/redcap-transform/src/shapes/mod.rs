//! Built-in shape transformers.
//!
//! | Shape | Tags |
//! |-------|------|
//! | [`MinMax`] | `minmax` |
//! | [`ValueWithUnits`] | `value_with_*units*`, `range_with_units` |
//! | [`AgeSplit`] | `age_weeks_days`, `age_years_months` |
//! | [`ChoiceDetails`] | `{checkbox,radio,dropdown}_{details,other}[_text\|_note]` |
//! | [`CheckboxMutex`] | `checkbox_mutex`, `checkbox_mutex_other` |

mod age;
mod details;
mod minmax;
mod mutex;
mod units;

pub use age::{AgeComponent, AgeSplit};
pub use details::ChoiceDetails;
pub use minmax::MinMax;
pub use mutex::CheckboxMutex;
pub use units::ValueWithUnits;

/// Splits a `base label | detail prompt` cell.
pub(crate) fn split_label(label: &str) -> (&str, Option<&str>) {
    let mut parts = label.split(" | ");
    let base = parts.next().unwrap_or_default();
    (base, parts.next())
}
