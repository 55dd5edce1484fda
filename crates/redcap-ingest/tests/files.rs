//! File round trips through temporary directories.

use std::fs;

use redcap_ingest::{
    DEFAULT_PLURALS_FILE, IngestError, load_plurals, read_dictionary, write_dictionary,
};
use redcap_model::FieldRecord;
use tempfile::TempDir;

const INPUT: &str = "\
Variable / Field Name,Form Name,Section Header,Field Type,Field Label,Choices,Field Note,Validation,Min,Max,Identifier?,Branching Logic,Required Field?,Custom Alignment,Question Number,Matrix Group Name,Site Notes
record_id,intake,,text,Record ID,,,,,,,,,,,,
med startrepeat 2 Medication,intake,,text,\"Drug, brand name\",,,,,,,[on_meds] = '1',,,,,from pharmacy
";

#[test]
fn dictionary_file_keeps_extra_columns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dd.csv");
    fs::write(&input, INPUT).unwrap();

    let dictionary = read_dictionary(&input).unwrap();
    assert_eq!(dictionary.width(), 17);
    assert_eq!(dictionary.header[16], "Site Notes");
    let med = &dictionary.records[1];
    assert_eq!(med.label, "Drug, brand name");
    assert_eq!(med.branching_logic, "[on_meds] = '1'");
    assert_eq!(med.trailing, vec!["from pharmacy".to_string()]);

    let mut records = dictionary.records.clone();
    records.push(FieldRecord::new("med1", "text"));
    let output = dir.path().join("out.csv");
    write_dictionary(&output, &dictionary.with_records(records)).unwrap();

    let written = fs::read_to_string(&output).unwrap().replace("\r\n", "\n");
    insta::assert_snapshot!(written, @r#"
    Variable / Field Name,Form Name,Section Header,Field Type,Field Label,Choices,Field Note,Validation,Min,Max,Identifier?,Branching Logic,Required Field?,Custom Alignment,Question Number,Matrix Group Name,Site Notes
    record_id,intake,,text,Record ID,,,,,,,,,,,,
    med startrepeat 2 Medication,intake,,text,"Drug, brand name",,,,,,,[on_meds] = '1',,,,,from pharmacy
    med1,,,text,,,,,,,,,,,,,
    "#);
}

#[test]
fn missing_dictionary_reports_path() {
    let dir = TempDir::new().unwrap();
    let err = read_dictionary(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn default_plural_table_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(DEFAULT_PLURALS_FILE),
        r#"{"Person": "People", "cactus": "cacti"}"#,
    )
    .unwrap();
    let table = load_plurals(None, dir.path()).unwrap();
    assert_eq!(table.get("Person").map(String::as_str), Some("People"));
    assert_eq!(table.len(), 2);
}

#[test]
fn missing_default_plural_table_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(load_plurals(None, dir.path()).unwrap().is_empty());
}

#[test]
fn broken_default_plural_table_is_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(DEFAULT_PLURALS_FILE), "[1, 2").unwrap();
    assert!(load_plurals(None, dir.path()).unwrap().is_empty());
}

#[test]
fn broken_explicit_plural_table_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{"person": 3}"#).unwrap();
    let err = load_plurals(Some(&path), dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::PluralTable { .. }));
}
