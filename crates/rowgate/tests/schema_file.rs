// Integration tests for loading table definitions from disk

mod common;

use common::{session, RecordingEngine, SCHEMA};
use rowgate::{ColumnType, Error, ReadOptions, RowsService, SchemaProvider, StaticSchemaProvider};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_schema_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("schema.json");
    fs::write(&path, SCHEMA).expect("Failed to write schema");

    let provider = StaticSchemaProvider::from_json_file(&path).expect("Failed to load schema");
    assert_eq!(provider.len(), 3);

    let posts = provider.table("ks", "posts").unwrap();
    let tags = posts.column("tags").unwrap();
    assert_eq!(tags.column_type(), &ColumnType::Set(Box::new(ColumnType::Text)));
    assert_eq!(tags.column_type().to_string(), "set<text>");

    let service = RowsService::new(provider, RecordingEngine::with_users(2));
    let response = service
        .get_rows(&session(), "ks", "users", &["1"], &ReadOptions::default())
        .expect("Failed to read");
    assert_eq!(response.rows().len(), 2);
}

#[test]
fn test_missing_schema_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = StaticSchemaProvider::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_invalid_schema_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{"tables": [{"keyspace": "ks", "name": "t", "columns": [
            {"name": "id", "type": "int", "kind": "partition_key"},
            {"name": "id", "type": "text"}
        ]}]}"#,
    )
    .expect("Failed to write schema");

    assert!(StaticSchemaProvider::from_json_file(&path).is_err());
}
