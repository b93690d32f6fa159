//! End-to-end behavior of the maintenance log through the public API.

use breakmywallet::{ErrorKind, ImportCause, RecordRow, Store, catalog, view};
use std::fs;
use tempfile::TempDir;

const M3: &str = "2008 BMW M3";
const X3: &str = "2021 BMW X3 sDrive30i";

fn open(temp: &TempDir, name: &str) -> Store {
    Store::open(temp.path().join(name)).unwrap()
}

#[test]
fn vehicles_without_history_show_default_tasks() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp, "maint.db");

    for vehicle in catalog::list_vehicles() {
        let records = store.list_records(vehicle.name).unwrap();
        assert!(records.is_empty());

        let rows = view::display_rows(&records);
        let tasks: Vec<_> = rows.iter().map(|r| r.task.as_str()).collect();
        let defaults: Vec<_> = catalog::list_default_tasks().iter().map(|t| t.task_name).collect();
        assert_eq!(tasks, defaults);
    }
}

#[test]
fn form_insert_then_list() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "maint.db");

    let row = RecordRow::from_form(M3, "Oil Change", "2024-01-15", "7500", "synthetic").unwrap();
    let id = store.insert_record(&row).unwrap();

    let records = store.list_records(M3).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].to_row(), row);
}

#[test]
fn empty_task_leaves_store_unchanged() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "maint.db");
    store.insert_record(&RecordRow::new(M3, "Spark Plugs")).unwrap();

    let row = RecordRow::from_form(M3, "", "2024-01-15", "7500", "").unwrap();
    let err = store.insert_record(&row).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Task name is required.");
    assert_eq!(store.count_records().unwrap(), 1);
}

#[test]
fn export_then_import_into_empty_store() {
    let temp = TempDir::new().unwrap();
    let mut source = open(&temp, "source.db");

    source
        .insert_record(&RecordRow::new(M3, "Oil Change").with_date("2024-01-15").with_mileage(7500))
        .unwrap();
    source.insert_record(&RecordRow::new(X3, "Air Filter").with_notes("cabin too")).unwrap();
    source.insert_record(&RecordRow::new(M3, "Brake Fluid").with_mileage(0)).unwrap();

    let path = temp.path().join("export.json");
    source.export_to_file(&path).unwrap();

    let mut target = open(&temp, "target.db");
    target.import_from_file(&path).unwrap();

    for vehicle in [M3, X3] {
        let before: Vec<_> = source.list_records(vehicle).unwrap().iter().map(|r| r.to_row()).collect();
        let after: Vec<_> = target.list_records(vehicle).unwrap().iter().map(|r| r.to_row()).collect();
        assert_eq!(before, after);
    }
}

#[test]
fn importing_twice_appends_with_fresh_ids() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "maint.db");
    let path = temp.path().join("one.json");
    fs::write(&path, r#"[["2008 BMW M3", "Oil Change", "2024-01-15", 7500, ""]]"#).unwrap();

    store.import_from_file(&path).unwrap();
    store.import_from_file(&path).unwrap();

    let records = store.list_records(M3).unwrap();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].id, records[1].id);
    assert_eq!(records[0].to_row(), records[1].to_row());
}

#[test]
fn invalid_third_row_keeps_first_two() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "maint.db");

    let path = temp.path().join("partial.json");
    fs::write(
        &path,
        r#"[
  ["2008 BMW M3", "Oil Change", "2024-01-15", 7500, "synthetic"],
  ["2008 BMW M3", "Air Filter", null, null, ""],
  ["2008 BMW M3", "Coolant Flush", "2024-03-01"],
  ["2008 BMW M3", "Spark Plugs", null, 45000, ""]
]"#,
    )
    .unwrap();

    let err = store.import_from_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Import);
    assert!(err.to_string().contains("partial.json"));
    match err {
        breakmywallet::Error::Import {
            committed,
            cause: ImportCause::RowShape { index, .. },
            ..
        } => {
            assert_eq!(committed, 2);
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let tasks: Vec<_> = store.list_records(M3).unwrap().into_iter().map(|r| r.task).collect();
    assert_eq!(tasks, vec!["Oil Change", "Air Filter"]);
}

#[test]
fn malformed_file_inserts_nothing() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "maint.db");

    let path = temp.path().join("broken.json");
    fs::write(&path, r#"[["2008 BMW M3", "Oil Change""#).unwrap();

    let err = store.import_from_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Import);
    assert_eq!(store.count_records().unwrap(), 0);
}

#[test]
fn blank_mileage_is_distinct_from_zero() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp, "maint.db");

    store
        .insert_record(&RecordRow::from_form(X3, "Oil Change", "", "", "").unwrap())
        .unwrap();
    store
        .insert_record(&RecordRow::from_form(X3, "Oil Change", "", "0", "").unwrap())
        .unwrap();

    let mileages: Vec<_> = store
        .list_records(X3)
        .unwrap()
        .into_iter()
        .map(|r| r.last_mileage)
        .collect();
    assert_eq!(mileages, vec![None, Some(0)]);

    let path = temp.path().join("export.json");
    store.export_to_file(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("null"));
    assert!(content.contains("    0,"));
}
