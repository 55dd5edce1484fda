//! Repeat-group unrolling (pass 2).
//!
//! A group repeated `N` times becomes `N` copies of its rows. In iteration `i`
//! every id gets `i` appended (or substituted for `${d}`) behind the path of the
//! enclosing groups, labels are numbered, and branching logic is rewritten and
//! gated so only the iterations in use are shown.
//!
//! How many iterations are in use depends on the [`UxScheme`]:
//!
//! | Scheme | Extra fields | Iteration `i` shown when |
//! |--------|--------------|--------------------------|
//! | `Upfront` | `<group>_group_no` count before the group | `[<group>_group_no]>=i` |
//! | `PromptToAddAnother` | `<group>_repeat<i>` checkbox after every iteration but the last | previous checkbox ticked |
//! | `AutoReveal` | none | first field of the previous iteration filled |
//!
//! A group whose count comes from another field (`[field]` or `[field]N`) is
//! gated by `[field]>=i` under every scheme.

use redcap_common::{clean_identifier, fill_placeholder, has_braced_placeholder, safe_substitute};
use redcap_model::{ExpandOptions, FieldRecord, RepeatSpec, UxScheme};
use tracing::{debug, debug_span, warn};

use crate::error::Result;
use crate::label::iteration_label;
use crate::logic::{IdRewrite, any_ticked, at_least, conjoin, filled, ticked};
use crate::naming::{GroupNamer, Pluralize};
use crate::scanner::{GroupSpan, Row, find_group};

/// The id `base` takes in one iteration, behind `prefix`.
///
/// ```
/// use redcap_core::iteration_id;
///
/// assert_eq!(iteration_id("", "dose", 2), "dose2");
/// assert_eq!(iteration_id("visit1_", "dose_${d}_mg", 2), "visit1_dose_2_mg");
/// ```
pub fn iteration_id(prefix: &str, base: &str, iteration: u32) -> String {
    if has_braced_placeholder(base, "d") {
        let numbered = safe_substitute(base, |name| (name == "d").then(|| iteration.to_string()));
        format!("{prefix}{numbered}")
    } else {
        format!("{prefix}{base}{iteration}")
    }
}

/// Where a group is being unrolled.
///
/// A nested group gets a fresh scope built from its enclosing iteration, so
/// nothing it adds is seen by the groups beside it.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    /// `<clean name><iteration>` of every enclosing group, outermost first.
    path: Vec<String>,
    /// Iteration of every enclosing group, outermost first.
    iterations: Vec<u32>,
    renames: IdRewrite,
    /// Rows searched first for the field a referenced count points at: the
    /// enclosing group's rows, or the rows before a top-level group.
    context: &'a [Row<'a>],
    /// Rows emitted before the top-level group, searched when `context` has
    /// no match.
    outer: &'a [Row<'a>],
    /// Condition under which the enclosing iteration is shown.
    active: Option<String>,
}

impl<'a> Scope<'a> {
    /// Scope of a top-level group; `context` holds the rows emitted before it.
    pub fn top_level(context: &'a [Row<'a>]) -> Self {
        Self {
            path: Vec::new(),
            iterations: Vec::new(),
            renames: IdRewrite::new(),
            context,
            outer: context,
            active: None,
        }
    }

    /// Nesting depth of a group unrolled in this scope, 1 at the top level.
    pub fn depth(&self) -> usize {
        self.iterations.len() + 1
    }

    fn prefix(&self) -> String {
        if self.path.is_empty() {
            String::new()
        } else {
            format!("{}_", self.path.join("_"))
        }
    }

    fn descend<'b>(
        &self,
        segment: String,
        iteration: u32,
        renames: IdRewrite,
        context: &'b [Row<'b>],
        active: Option<String>,
    ) -> Scope<'b>
    where
        'a: 'b,
    {
        let mut path = self.path.clone();
        path.push(segment);
        let mut iterations = self.iterations.clone();
        iterations.push(iteration);
        Scope {
            path,
            iterations,
            renames,
            context,
            outer: self.outer,
            active,
        }
    }
}

/// What every row of one iteration shares.
struct Iteration<'s> {
    prefix: &'s str,
    number: u32,
    /// Enclosing iterations followed by this one.
    levels: &'s [u32],
    renames: &'s IdRewrite,
    active: Option<&'s str>,
}

impl Iteration<'_> {
    fn record(&self, row: &Row<'_>, group_name: &str, validation: bool) -> FieldRecord {
        let mut record = row.record.clone();
        record.id = iteration_id(self.prefix, &row.cell.base, self.number);
        record.label = iteration_label(&row.record.label, group_name, self.levels);
        record.branching_logic =
            conjoin(&self.renames.apply(&row.record.branching_logic), self.active);

        let matrix = row.record.matrix_group_name.trim();
        if !matrix.is_empty() {
            record.matrix_group_name = iteration_id(self.prefix, matrix, self.number);
        }
        if !validation {
            record.clear_validation();
        }
        record
    }
}

/// Expands repeat groups into their iterations.
pub struct GroupUnroller<'a> {
    options: &'a ExpandOptions,
    namer: GroupNamer<'a>,
}

impl<'a> GroupUnroller<'a> {
    pub fn new(options: &'a ExpandOptions, pluralizer: &'a dyn Pluralize) -> Self {
        Self {
            options,
            namer: GroupNamer::new(options, pluralizer),
        }
    }

    /// Unrolls one group, nested groups included, in output order.
    ///
    /// # Errors
    ///
    /// Fails on a nested group that does not close inside this one, or on an
    /// unreadable choice cell when auto-reveal inspects a checkbox.
    pub fn unroll(&self, group: &GroupSpan<'_>, scope: &Scope<'_>) -> Result<Vec<FieldRecord>> {
        let open = group.open;
        let head = group.head();
        let span = debug_span!("unroll_group", group = %open.name, depth = scope.depth());
        let _guard = span.enter();

        let (times, driver) = self.resolve_count(&open.count, scope);
        let prefix = scope.prefix();
        let clean_name = clean_identifier(&open.name);
        let collective = self.namer.collective(&open.name);
        debug!(iterations = times, driver = ?driver, rows = group.rows.len(), "unrolling group");

        let mut out = Vec::new();
        let gate = match driver {
            Some(field) => Some(scope.renames.resolve(field).to_string()),
            None if self.options.ux_scheme.asks_count_upfront() => {
                let count = self.count_field(
                    head.record,
                    &open.name,
                    format!("{prefix}{clean_name}_group_no"),
                    times,
                    &collective,
                    scope,
                );
                let id = count.id.clone();
                out.push(count);
                Some(id)
            }
            None => None,
        };
        let header_on_first_row = out.is_empty();

        let items = plan(group)?;
        let mut levels = scope.iterations.clone();
        levels.push(1);
        let mut revealed = scope.active.clone();

        for number in 1..=times {
            if let Some(level) = levels.last_mut() {
                *level = number;
            }
            let active = match (&gate, driver) {
                (Some(field), Some(_)) => Some(conjoin(
                    &at_least(field, number),
                    scope.active.as_deref(),
                )),
                (Some(field), None) => Some(at_least(field, number)),
                (None, _) => revealed.clone(),
            };

            let mut renames = scope.renames.clone();
            for item in &items {
                if let Item::Field(row) = item
                    && !row.cell.base.is_empty()
                {
                    renames.insert(
                        row.cell.base.as_str(),
                        iteration_id(&prefix, &row.cell.base, number),
                    );
                }
            }
            let iteration = Iteration {
                prefix: &prefix,
                number,
                levels: &levels,
                renames: &renames,
                active: active.as_deref(),
            };

            for (position, item) in items.iter().enumerate() {
                match item {
                    Item::Field(row) => {
                        let mut record =
                            iteration.record(row, &open.name, self.options.validation_enabled);
                        record.section_header =
                            if header_on_first_row && position == 0 && number == 1 {
                                fill_placeholder(&row.record.section_header, &collective)
                            } else {
                                String::new()
                            };
                        out.push(record);
                    }
                    Item::Nested(nested) => {
                        let child = scope.descend(
                            format!("{clean_name}{number}"),
                            number,
                            renames.clone(),
                            group.rows,
                            active.clone(),
                        );
                        out.extend(self.unroll(nested, &child)?);
                    }
                }
            }

            if gate.is_some() || number == times {
                continue;
            }
            match self.options.ux_scheme {
                UxScheme::PromptToAddAnother => {
                    let id = format!("{prefix}{clean_name}_repeat{number}");
                    let logic = if number == 1 {
                        out.first()
                            .map(|record| record.branching_logic.clone())
                            .unwrap_or_default()
                    } else {
                        ticked(&format!("{prefix}{clean_name}_repeat{}", number - 1))
                    };
                    revealed = Some(ticked(&id));
                    out.push(add_another_field(head.record, &open.name, id, logic));
                }
                UxScheme::AutoReveal => {
                    revealed = Some(reveal_condition(head, &prefix, number)?);
                }
                UxScheme::Upfront => {}
            }
        }

        debug!(emitted = out.len(), "group unrolled");
        Ok(out)
    }

    /// Iteration count and the field whose value selects the iterations shown.
    fn resolve_count<'s>(&self, count: &'s RepeatSpec, scope: &Scope<'_>) -> (u32, Option<&'s str>) {
        match count {
            RepeatSpec::Fixed(times) => (*times, None),
            RepeatSpec::ReferencedWithMax { field, max } => (*max, Some(field.as_str())),
            RepeatSpec::Referenced { field } => {
                let bound = scope
                    .context
                    .iter()
                    .chain(scope.outer)
                    .find(|row| row.cell.base == *field)
                    .and_then(|row| row.record.validation_max.trim().parse::<u32>().ok());
                let times = bound.unwrap_or_else(|| {
                    warn!(
                        field = %field,
                        default = self.options.default_max_iterations,
                        "referenced count has no numeric maximum, using default"
                    );
                    self.options.default_max_iterations
                });
                (times, Some(field.as_str()))
            }
        }
    }

    fn count_field(
        &self,
        first: &FieldRecord,
        name: &str,
        id: String,
        times: u32,
        collective: &str,
        scope: &Scope<'_>,
    ) -> FieldRecord {
        let mut count = FieldRecord::new(id, "text");
        count.form_name = first.form_name.clone();
        count.section_header = fill_placeholder(&first.section_header, collective);
        count.label = self.namer.count_prompt(name, times);
        if self.options.validation_enabled {
            count.set_integer_bounds(0, times);
        }
        count.branching_logic = conjoin(
            &scope.renames.apply(&first.branching_logic),
            scope.active.as_deref(),
        );
        count
    }
}

/// A row of a group as unrolled: its own field or a whole nested group.
enum Item<'g> {
    Field(&'g Row<'g>),
    Nested(GroupSpan<'g>),
}

/// Splits a group into its own rows and its nested groups, in order.
fn plan<'g>(group: &GroupSpan<'g>) -> Result<Vec<Item<'g>>> {
    let mut items = Vec::new();
    let mut index = 0;
    while index < group.rows.len() {
        let row = &group.rows[index];
        if index > 0 && row.cell.is_begin() {
            let nested = find_group(&group.rows[index..])?;
            debug!(group = %nested.open.name, rows = nested.rows.len(), "found nested group");
            index += nested.consumed;
            items.push(Item::Nested(nested));
        } else {
            items.push(Item::Field(row));
            index += 1;
        }
    }
    Ok(items)
}

fn add_another_field(first: &FieldRecord, name: &str, id: String, logic: String) -> FieldRecord {
    let mut prompt = FieldRecord::new(id, "checkbox");
    prompt.form_name = first.form_name.clone();
    prompt.choices = format!("1, Add another {name}?");
    prompt.branching_logic = logic;
    prompt
}

/// Shows the iteration after `number` once its first field is answered.
fn reveal_condition(head: &Row<'_>, prefix: &str, number: u32) -> Result<String> {
    let first = iteration_id(prefix, &head.cell.base, number);
    if head.record.field_kind.trim() == "checkbox" {
        let choices = head.record.choice_list()?;
        if !choices.is_empty() {
            return Ok(any_ticked(
                &first,
                choices.iter().map(|choice| choice.index.as_str()),
            ));
        }
    }
    Ok(filled(&first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::EnglishPluralizer;
    use crate::scanner::tokenize;

    fn record(id: &str, label: &str) -> FieldRecord {
        let mut record = FieldRecord::new(id, "text");
        record.form_name = "meds".to_string();
        record.label = label.to_string();
        record
    }

    fn unroll(options: &ExpandOptions, records: &[FieldRecord]) -> Vec<FieldRecord> {
        let rows = tokenize(records).unwrap();
        let group = find_group(&rows).unwrap();
        let unroller = GroupUnroller::new(options, &EnglishPluralizer);
        unroller.unroll(&group, &Scope::top_level(&[])).unwrap()
    }

    fn ids(records: &[FieldRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn ordinal_placeholder_in_id() {
        assert_eq!(iteration_id("", "med_${d}_name", 3), "med_3_name");
        assert_eq!(iteration_id("a1_", "med", 3), "a1_med3");
    }

    #[test]
    fn upfront_count_precedes_iterations() {
        let mut first = record("med startrepeat 2 Medication", "Medication name");
        first.section_header = "Current $placeholder".to_string();
        let records = vec![first, record("med_dose endrepeat", "Dose")];
        let out = unroll(&ExpandOptions::default(), &records);

        assert_eq!(
            ids(&out),
            vec!["medication_group_no", "med1", "med_dose1", "med2", "med_dose2"]
        );
        let count = &out[0];
        assert_eq!(count.section_header, "Current medications");
        assert_eq!(count.form_name, "meds");
        assert_eq!(count.validation_max, "2");
        assert!(out[1..].iter().all(|record| record.section_header.is_empty()));
        assert_eq!(out[3].label, "Medication 2 name");
        assert_eq!(out[4].branching_logic, "[medication_group_no]>=2");
    }

    #[test]
    fn validation_off_strips_bounds() {
        let mut first = record("wt startrepeat 2 Weight", "Weight");
        first.validation_type = "number".to_string();
        first.validation_max = "500".to_string();
        let records = vec![first, record("wt_end endrepeat", "Date")];
        let out = unroll(&ExpandOptions::default().with_validation(false), &records);
        assert!(out.iter().all(|record| record.validation_type.is_empty()
            && record.validation_max.is_empty()));
    }

    #[test]
    fn prompt_scheme_chains_add_another() {
        let mut first = record("med startrepeat 3 Medication", "Name");
        first.branching_logic = "[on_meds]='1'".to_string();
        let records = vec![first, record("med_end endrepeat", "Dose")];
        let options = ExpandOptions::default().with_ux_scheme(UxScheme::PromptToAddAnother);
        let out = unroll(&options, &records);

        assert_eq!(
            ids(&out),
            vec![
                "med1",
                "med_end1",
                "medication_repeat1",
                "med2",
                "med_end2",
                "medication_repeat2",
                "med3",
                "med_end3",
            ]
        );
        assert_eq!(out[2].branching_logic, "[on_meds]='1'");
        assert_eq!(out[2].choices, "1, Add another Medication?");
        assert_eq!(out[3].branching_logic, "([on_meds]='1') and [medication_repeat1(1)]='1'");
        assert_eq!(out[5].branching_logic, "[medication_repeat1(1)]='1'");
        assert_eq!(out[7].branching_logic, "[medication_repeat2(1)]='1'");
    }

    #[test]
    fn auto_scheme_reveals_on_first_field() {
        let mut first = record("sx startrepeat 2 Symptom", "Symptom");
        first.field_kind = "checkbox".to_string();
        first.choices = "1, Fever | 2, Cough".to_string();
        let records = vec![first, record("sx_end endrepeat", "Onset")];
        let options = ExpandOptions::default().with_ux_scheme(UxScheme::AutoReveal);
        let out = unroll(&options, &records);

        assert_eq!(ids(&out), vec!["sx1", "sx_end1", "sx2", "sx_end2"]);
        assert!(out[0].branching_logic.is_empty());
        assert_eq!(out[2].branching_logic, "([sx1(1)] = '1' or [sx1(2)] = '1')");
    }

    #[test]
    fn referenced_count_uses_driver_field() {
        let mut driver = record("n_meds", "Number of medications");
        driver.validation_max = "3".to_string();
        let context_records = vec![driver];
        let context = tokenize(&context_records).unwrap();

        let records = vec![
            record("med startrepeat [n_meds] Medication", "Name"),
            record("med_end endrepeat", "Dose"),
        ];
        let rows = tokenize(&records).unwrap();
        let group = find_group(&rows).unwrap();
        let options = ExpandOptions::default();
        let out = GroupUnroller::new(&options, &EnglishPluralizer)
            .unroll(&group, &Scope::top_level(&context))
            .unwrap();

        assert_eq!(out.len(), 6);
        assert_eq!(out[0].id, "med1");
        assert_eq!(out[5].branching_logic, "[n_meds]>=3");
    }

    #[test]
    fn missing_driver_falls_back_to_default() {
        let records = vec![
            record("med startrepeat [n_meds] Medication", "Name"),
            record("med_end endrepeat", "Dose"),
        ];
        let options = ExpandOptions::default().with_default_max_iterations(4);
        let out = unroll(&options, &records);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn matrix_group_is_namespaced() {
        let mut first = record("pain startrepeat 2 Site", "Site");
        first.matrix_group_name = "pain_grid".to_string();
        let records = vec![first, record("pain_end endrepeat", "Notes")];
        let out = unroll(&ExpandOptions::default(), &records);
        assert_eq!(out[1].matrix_group_name, "pain_grid1");
        assert_eq!(out[3].matrix_group_name, "pain_grid2");
        assert!(out[2].matrix_group_name.is_empty());
    }
}
