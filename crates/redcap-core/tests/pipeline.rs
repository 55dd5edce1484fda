//! End-to-end tests for the two-pass pipeline.

mod common;

use common::{Answers, evaluate, ids, record, visible};
use redcap_core::{Pipeline, RepeatError};
use redcap_model::{ExpandOptions, FieldRecord, UxScheme};
use redcap_transform::TransformError;

fn render(records: &[FieldRecord]) -> String {
    records
        .iter()
        .map(|record| {
            let logic = if record.branching_logic.is_empty() {
                "-"
            } else {
                record.branching_logic.as_str()
            };
            format!("{} | {} | {}", record.id, record.label, logic)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn find<'a>(records: &'a [FieldRecord], id: &str) -> &'a FieldRecord {
    records
        .iter()
        .find(|record| record.id == id)
        .unwrap_or_else(|| panic!("no record {id}"))
}

fn medication_form() -> Vec<FieldRecord> {
    let mut first = record(
        "med_name startrepeat 3 Medication",
        "text",
        "Name of the $s medication",
    );
    first.section_header = "Current $placeholder".to_string();
    vec![
        record("name", "text", "Name"),
        first,
        record("med_dose endrepeat", "text", "Dose of the $s medication"),
    ]
}

#[test]
fn medication_group_unrolls_upfront() {
    let expansion = Pipeline::default().run(&medication_form()).unwrap();

    insta::assert_snapshot!(render(&expansion.records), @r"
    name | Name | -
    medication_group_no | How many medications would you like to enter (up to 3)? | -
    med_name1 | Name of the 1st medication | [medication_group_no]>=1
    med_dose1 | Dose of the 1st medication | [medication_group_no]>=1
    med_name2 | Name of the 2nd medication | [medication_group_no]>=2
    med_dose2 | Dose of the 2nd medication | [medication_group_no]>=2
    med_name3 | Name of the 3rd medication | [medication_group_no]>=3
    med_dose3 | Dose of the 3rd medication | [medication_group_no]>=3
    ");

    let count = &expansion.records[1];
    assert_eq!(count.field_kind, "text");
    assert_eq!(count.validation_type, "integer");
    assert_eq!((count.validation_min.as_str(), count.validation_max.as_str()), ("0", "3"));
    assert_eq!(count.section_header, "Current medications");
    assert_eq!(count.form_name, "intake");

    assert_eq!(expansion.stats.input_records, 3);
    assert_eq!(expansion.stats.transformed_records, 3);
    assert_eq!(expansion.stats.output_records, 8);
    assert_eq!(expansion.stats.groups, 1);
    assert_eq!(expansion.stats.nested_groups, 0);
}

#[test]
fn shapes_are_expanded_before_groups() {
    let input = vec![
        record("bp startrepeat 2 Reading", "minmax", "Blood pressure $placeholder"),
        record("bp_time endrepeat", "text", "Time"),
    ];
    let expansion = Pipeline::default().run(&input).unwrap();
    assert_eq!(
        ids(&expansion.records),
        vec![
            "reading_group_no",
            "bp_minimum1",
            "bp_maximum1",
            "bp_time1",
            "bp_minimum2",
            "bp_maximum2",
            "bp_time2",
        ]
    );
    assert_eq!(expansion.records[5].label, "Blood pressure maximum");
}

#[test]
fn sibling_subgroups_do_not_share_renames() {
    let mut med_dose = record("a_y endrepeat", "text", "Dose");
    med_dose.branching_logic = "[a_x] <> '' and [visit_date] <> ''".to_string();
    let mut lab = record("b_x startrepeat 2 Lab", "text", "Which test");
    lab.branching_logic = "[a_x] = '1'".to_string();
    let mut lab_result = record("b_y endrepeat", "text", "Result");
    lab_result.branching_logic = "[b_x] <> ''".to_string();
    let input = vec![
        record("visit_date startrepeat 2 Visit", "text", "Date"),
        record("a_x startrepeat 2 Med", "text", "Drug"),
        med_dose,
        lab,
        lab_result,
        record("visit_end endrepeat", "text", "Notes"),
    ];

    let expansion = Pipeline::default().run(&input).unwrap();
    let records = &expansion.records;

    insta::assert_snapshot!(ids(records).join("\n"), @r"
    visit_group_no
    visit_date1
    visit1_med_group_no
    visit1_a_x1
    visit1_a_y1
    visit1_a_x2
    visit1_a_y2
    visit1_lab_group_no
    visit1_b_x1
    visit1_b_y1
    visit1_b_x2
    visit1_b_y2
    visit_end1
    visit_date2
    visit2_med_group_no
    visit2_a_x1
    visit2_a_y1
    visit2_a_x2
    visit2_a_y2
    visit2_lab_group_no
    visit2_b_x1
    visit2_b_y1
    visit2_b_x2
    visit2_b_y2
    visit_end2
    ");

    assert_eq!(
        find(records, "visit2_a_y1").branching_logic,
        "([visit2_a_x1] <> '' and [visit_date2] <> '') and [visit2_med_group_no]>=1"
    );
    // The lab subgroup sees the visit scope only, never the med subgroup's renames.
    assert_eq!(
        find(records, "visit1_b_x2").branching_logic,
        "([a_x] = '1') and [visit1_lab_group_no]>=2"
    );
    assert_eq!(
        find(records, "visit1_b_y2").branching_logic,
        "([visit1_b_x2] <> '') and [visit1_lab_group_no]>=2"
    );
    assert_eq!(
        find(records, "visit2_lab_group_no").branching_logic,
        "([a_x] = '1') and [visit_group_no]>=2"
    );
    assert_eq!(
        find(records, "visit1_med_group_no").label,
        "How many meds would you like to enter (up to 2)?"
    );
    assert_eq!(expansion.stats.nested_groups, 2);
}

#[test]
fn nested_labels_address_enclosing_levels() {
    let input = vec![
        record("visit startrepeat 2 Visit", "text", "Visit date"),
        record("dose repeat 2 Dose", "text", "Dose $d of visit $d1 ($s2)"),
        record("visit_end endrepeat", "text", "Notes"),
    ];
    let expansion = Pipeline::default().run(&input).unwrap();
    assert_eq!(find(&expansion.records, "visit1").label, "Visit 1 date");
    assert_eq!(find(&expansion.records, "visit2_dose1").label, "Dose 1 of visit 2 (1st)");
    assert_eq!(find(&expansion.records, "visit1_dose2").label, "Dose 2 of visit 1 (2nd)");
}

#[test]
fn referenced_count_gates_on_outer_field() {
    let mut count = record("n_meds", "text", "How many medications?");
    count.validation_type = "integer".to_string();
    count.validation_max = "4".to_string();
    let input = vec![
        count,
        record("med startrepeat [n_meds] Medication", "text", "Drug"),
        record("med_end endrepeat", "text", "Dose"),
    ];
    let expansion = Pipeline::default().run(&input).unwrap();
    assert_eq!(expansion.records.len(), 9);
    assert_eq!(expansion.records[1].id, "med1");
    assert_eq!(expansion.records[8].branching_logic, "[n_meds]>=4");

    let mut answers = Answers::new();
    answers.set("n_meds", "2");
    assert_eq!(
        visible(&expansion.records, &answers),
        vec!["n_meds", "med1", "med_end1", "med2", "med_end2"]
    );
}

#[test]
fn placeholder_ids_rewrite_in_group_logic() {
    let mut dose = record("med_${d}_dose", "text", "Dose");
    dose.branching_logic = "[med_${d}_name] <> ''".to_string();
    let mut unit = record("med_${d}_unit endrepeat", "text", "Unit");
    unit.branching_logic = "[med_${d}_dose] > 0 and [name] <> ''".to_string();
    let input = vec![
        record("name", "text", "Name"),
        record(
            "med_${d}_name startrepeat 2 Medication",
            "text",
            "Name of the $s medication",
        ),
        dose,
        unit,
    ];
    let expansion = Pipeline::default().run(&input).unwrap();

    insta::assert_snapshot!(render(&expansion.records), @r"
    name | Name | -
    medication_group_no | How many medications would you like to enter (up to 2)? | -
    med_1_name | Name of the 1st medication | [medication_group_no]>=1
    med_1_dose | Dose | ([med_1_name] <> '') and [medication_group_no]>=1
    med_1_unit | Unit | ([med_1_dose] > 0 and [name] <> '') and [medication_group_no]>=1
    med_2_name | Name of the 2nd medication | [medication_group_no]>=2
    med_2_dose | Dose | ([med_2_name] <> '') and [medication_group_no]>=2
    med_2_unit | Unit | ([med_2_dose] > 0 and [name] <> '') and [medication_group_no]>=2
    ");
}

#[test]
fn nested_driver_defined_before_outer_group() {
    let mut count = record("n_doses", "text", "Doses per visit");
    count.validation_type = "integer".to_string();
    count.validation_max = "3".to_string();
    let input = vec![
        count,
        record("visit startrepeat 2 Visit", "text", "Visit date"),
        record("dose repeat [n_doses] Dose", "text", "Dose"),
        record("visit_end endrepeat", "text", "Notes"),
    ];
    let expansion = Pipeline::default().run(&input).unwrap();
    let records = &expansion.records;

    let doses: Vec<&str> = ids(records)
        .into_iter()
        .filter(|id| id.starts_with("visit2_dose"))
        .collect();
    assert_eq!(doses, vec!["visit2_dose1", "visit2_dose2", "visit2_dose3"]);
    assert_eq!(
        find(records, "visit2_dose2").branching_logic,
        "([n_doses]>=2) and [visit_group_no]>=2"
    );

    let mut answers = Answers::new();
    answers.set("visit_group_no", "1").set("n_doses", "2");
    assert_eq!(
        visible(records, &answers),
        vec!["n_doses", "visit_group_no", "visit1", "visit1_dose1", "visit1_dose2", "visit_end1"]
    );
}

#[test]
fn explicit_max_overrides_driver_bound() {
    let mut count = record("n_meds", "text", "How many medications?");
    count.validation_max = "9".to_string();
    let input = vec![
        count,
        record("med startrepeat [n_meds]2 Medication", "text", "Drug"),
        record("med_end endrepeat", "text", "Dose"),
    ];
    let expansion = Pipeline::default().run(&input).unwrap();
    assert_eq!(expansion.records.len(), 5);
}

#[test]
fn prompt_scheme_reveals_one_iteration_at_a_time() {
    let options = ExpandOptions::default().with_ux_scheme(UxScheme::PromptToAddAnother);
    let expansion = Pipeline::new(options).run(&medication_form()).unwrap();
    let records = &expansion.records;
    assert!(records.iter().all(|record| record.id != "medication_group_no"));
    assert_eq!(find(records, "med_name1").section_header, "Current medications");

    let mut answers = Answers::new();
    assert_eq!(
        visible(records, &answers),
        vec!["name", "med_name1", "med_dose1", "medication_repeat1"]
    );
    answers.tick("medication_repeat1", "1");
    assert!(evaluate(&find(records, "med_dose2").branching_logic, &answers));
    assert!(!evaluate(&find(records, "med_dose3").branching_logic, &answers));
    answers.tick("medication_repeat2", "1");
    assert!(evaluate(&find(records, "med_dose3").branching_logic, &answers));
}

#[test]
fn auto_scheme_reveals_after_first_field() {
    let options = ExpandOptions::default().with_ux_scheme(UxScheme::AutoReveal);
    let expansion = Pipeline::new(options).run(&medication_form()).unwrap();
    let records = &expansion.records;
    assert_eq!(records.len(), 7);

    let mut answers = Answers::new();
    answers.set("med_name1", "aspirin");
    assert_eq!(
        visible(records, &answers),
        vec!["name", "med_name1", "med_dose1", "med_name2", "med_dose2"]
    );
}

#[test]
fn group_name_override_changes_wording() {
    let options = ExpandOptions::default().with_group_display_name(Some("items".to_string()));
    let expansion = Pipeline::new(options).run(&medication_form()).unwrap();
    let count = &expansion.records[1];
    assert_eq!(
        count.label,
        "How many medication items would you like to enter (up to 3)?"
    );
    assert_eq!(count.section_header, "Current medication items");
}

#[test]
fn stray_end_marker_is_dropped() {
    let input = vec![
        record("med startrepeat 2 Medication", "text", "Drug"),
        record("dose", "text", "Dose"),
        record(" endrepeat", "text", ""),
        record("after", "text", "After"),
    ];
    let expansion = Pipeline::default().run(&input).unwrap();
    assert_eq!(
        ids(&expansion.records),
        vec!["medication_group_no", "med1", "dose1", "med2", "dose2", "after"]
    );
}

#[test]
fn unclosed_group_aborts_run() {
    let input = vec![
        record("med startrepeat 2 Medication", "text", "Drug"),
        record("dose", "text", "Dose"),
    ];
    assert_eq!(
        Pipeline::default().run(&input).unwrap_err(),
        RepeatError::UnclosedGroup {
            field: "med".to_string()
        }
    );
}

#[test]
fn malformed_choice_aborts_run() {
    let mut bad = record("race", "checkbox_other", "Race");
    bad.choices = "1 White | 2, Other".to_string();
    let err = Pipeline::default().run(&[bad]).unwrap_err();
    assert!(matches!(err, RepeatError::Transform(TransformError::Model(_))));
    assert!(err.to_string().contains("'race'"));
}

#[test]
fn check_reports_groups_after_pass_one() {
    let input = vec![
        record("bp startrepeat 2 Reading", "minmax", "BP $placeholder"),
        record("bp_time endrepeat", "text", "Time"),
    ];
    let groups = Pipeline::default().check(&input).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].rows, 3);
    assert_eq!(groups[0].first_field, "bp_minimum");
}
