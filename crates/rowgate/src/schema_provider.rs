//! File-driven schema source.
//!
//! Loads table definitions from a JSON document of the form
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "keyspace": "ks",
//!       "name": "users",
//!       "columns": [
//!         {"name": "id", "type": "int", "kind": "partition_key"},
//!         {"name": "name", "type": "text"}
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::SchemaProvider;
use rowgate_core::error::{Error, Result};
use rowgate_core::Table;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
struct SchemaDocument {
    tables: Vec<Table>,
}

/// In-memory schema provider keyed by `(keyspace, table)`.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    tables: HashMap<(String, String), Table>,
}

impl StaticSchemaProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a table definition.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        let key = (table.keyspace().to_string(), table.name().to_string());
        self.tables.insert(key, table)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }

    /// Parses a schema document.
    ///
    /// Every table is validated on the way in; a later definition of the
    /// same table replaces an earlier one.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(text)
            .map_err(|e| Error::InvalidInput(format!("invalid schema document: {}", e)))?;
        let mut provider = Self::new();
        for table in document.tables {
            provider.insert(table);
        }
        debug!(tables = provider.len(), "schema loaded");
        Ok(provider)
    }

    /// Reads and parses a schema document from disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!("cannot read schema file {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Number of known tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true when no table is known.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn table(&self, keyspace: &str, table: &str) -> Result<Table> {
        self.tables
            .get(&(keyspace.to_string(), table.to_string()))
            .cloned()
            .ok_or_else(|| Error::TableNotFound {
                keyspace: keyspace.to_string(),
                table: table.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgate_core::{ColumnKind, ColumnType};

    const DOCUMENT: &str = r#"{
        "tables": [
            {
                "keyspace": "shop",
                "name": "orders",
                "columns": [
                    {"name": "customer", "type": "text", "kind": "partition_key"},
                    {"name": "placed", "type": "timestamp", "kind": "clustering"},
                    {"name": "items", "type": "map<text, int>"},
                    {"name": "total", "type": "decimal"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let provider = StaticSchemaProvider::from_json(DOCUMENT).unwrap();
        assert_eq!(provider.len(), 1);

        let table = provider.table("shop", "orders").unwrap();
        assert_eq!(table.partition_key_len(), 1);
        let placed = table.column("placed").unwrap();
        assert_eq!(placed.kind(), ColumnKind::Clustering);
        assert_eq!(placed.column_type(), &ColumnType::Timestamp);
        assert_eq!(table.column("total").unwrap().kind(), ColumnKind::Regular);
    }

    #[test]
    fn test_missing_table() {
        let provider = StaticSchemaProvider::from_json(DOCUMENT).unwrap();
        let err = provider.table("shop", "invoices").unwrap_err();
        assert!(matches!(err, Error::TableNotFound { .. }));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(StaticSchemaProvider::from_json("[]").is_err());
        // no partition key
        assert!(StaticSchemaProvider::from_json(
            r#"{"tables": [{"keyspace": "k", "name": "t", "columns": [{"name": "a", "type": "int"}]}]}"#
        )
        .is_err());
        // unknown type
        assert!(StaticSchemaProvider::from_json(
            r#"{"tables": [{"keyspace": "k", "name": "t", "columns": [{"name": "a", "type": "money", "kind": "partition_key"}]}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_insert_replaces() {
        let mut provider = StaticSchemaProvider::new();
        assert!(provider.is_empty());
        let first = Table::builder("ks", "t")
            .partition_key("id", ColumnType::Int)
            .build()
            .unwrap();
        let second = Table::builder("ks", "t")
            .partition_key("id", ColumnType::Text)
            .build()
            .unwrap();
        assert!(provider.insert(first).is_none());
        assert!(provider.insert(second.clone()).is_some());
        assert_eq!(provider.table("ks", "t").unwrap(), second);
    }
}
