use std::fs;
use std::path::Path;

use idef_ingest::{
    IngestError, load_definition, load_existing, load_mapping, load_source, read_csv_table,
};
use idef_model::{CellValue, DefinitionError};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

const DEFINITION: &str = r#"{
  "schema_version": "1",
  "entity": "customer",
  "fields": [
    { "key": "full_name", "label": "Name", "required": true, "type": "string" }
  ]
}"#;

#[test]
fn loads_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "rows.csv", "\u{feff}Name,Tel\nAlice,03-1234\n\nBob,\n");
    let table = read_csv_table(&path).unwrap();
    assert_eq!(table.columns, ["Name", "Tel"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[1]["Name"], CellValue::from("Bob"));
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = read_csv_table(Path::new("/definitely/missing.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(err.to_string().contains("/definitely/missing.csv"));
}

#[test]
fn loads_definition_and_mapping() {
    let dir = TempDir::new().unwrap();
    let definition = load_definition(&write(&dir, "def.json", DEFINITION)).unwrap();
    assert_eq!(definition.entity, "customer");

    let mapping = load_mapping(&write(&dir, "map.json", r#"{ "full_name": "Name" }"#)).unwrap();
    assert_eq!(mapping.source_column("full_name"), Some("Name"));
}

#[test]
fn invalid_definition_wraps_definition_error() {
    let dir = TempDir::new().unwrap();
    let broken = DEFINITION.replace(r#""required": true"#, r#""required": true, "normalizers": ["shout"]"#);
    let err = load_definition(&write(&dir, "def.json", &broken)).unwrap_err();
    assert!(matches!(
        err,
        IngestError::InvalidDefinition {
            source: DefinitionError::Schema(_),
            ..
        }
    ));
}

#[test]
fn loads_json_rows_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "rows.json",
        r#"{ "columns": ["Name", "Age"], "rows": [{ "Name": "Alice", "Age": 30, "Note": null }] }"#,
    );
    let table = load_source(&path).unwrap();
    assert_eq!(table.rows[0]["Age"], CellValue::Integer(30));
    assert!(table.rows[0]["Note"].is_null());
}

#[test]
fn loads_existing_pool() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "existing.json",
        r#"[{ "full_name": "Tanaka Taro", "address_line1": "Tokyo" }]"#,
    );
    let pool = load_existing(&path).unwrap();
    assert_eq!(pool[0]["full_name"], "Tanaka Taro");

    let bad = write(&dir, "bad.json", "[1, 2]");
    assert!(matches!(load_existing(&bad), Err(IngestError::JsonParse { .. })));
}
