// Common test utilities for RowsService integration tests
#![allow(dead_code)]

use rowgate::{
    Error, ExecutionEngine, PagingState, Result, ResultPage, RowMap, StatementDescriptor,
    StatementKind, StaticSchemaProvider,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Mutex;

/// Session token the engine accepts
pub const TOKEN: &str = "valid-token";

pub const SCHEMA: &str = r#"{
    "tables": [
        {
            "keyspace": "ks",
            "name": "users",
            "columns": [
                {"name": "id", "type": "int", "kind": "partition_key"},
                {"name": "name", "type": "text"},
                {"name": "age", "type": "int"}
            ]
        },
        {
            "keyspace": "ks",
            "name": "posts",
            "columns": [
                {"name": "author", "type": "text", "kind": "partition_key"},
                {"name": "posted", "type": "timestamp", "kind": "clustering"},
                {"name": "title", "type": "text"},
                {"name": "tags", "type": "set<text>"}
            ]
        },
        {
            "keyspace": "ks",
            "name": "post_stats",
            "columns": [
                {"name": "author", "type": "text", "kind": "partition_key"},
                {"name": "posted", "type": "timestamp", "kind": "clustering"},
                {"name": "views", "type": "counter"}
            ]
        }
    ]
}"#;

pub fn schema() -> StaticSchemaProvider {
    StaticSchemaProvider::from_json(SCHEMA).expect("Failed to load test schema")
}

pub fn session() -> String {
    TOKEN.to_string()
}

/// Position inside the fixture rows, carried in the paging state
#[derive(Debug, Serialize, Deserialize)]
struct Cursor {
    table: String,
    offset: usize,
}

/// Engine double that records every statement and pages over fixed rows
pub struct RecordingEngine {
    rows: Vec<RowMap>,
    executed: Mutex<Vec<StatementDescriptor>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<RowMap>) -> Self {
        Self {
            rows,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Engine serving `n` user rows with ids 1..=n
    pub fn with_users(n: usize) -> Self {
        let rows = (1..=n)
            .map(|i| {
                json!({"id": i, "name": format!("user{}", i), "age": 20 + i})
                    .as_object()
                    .cloned()
                    .expect("object")
            })
            .collect();
        Self::with_rows(rows)
    }

    pub fn executed(&self) -> Vec<StatementDescriptor> {
        self.executed.lock().unwrap().clone()
    }

    pub fn last(&self) -> StatementDescriptor {
        self.executed().pop().expect("No statement executed")
    }

    fn page(&self, statement: &StatementDescriptor) -> Result<ResultPage> {
        let table = statement.statement().target().to_string();
        let offset = match statement.paging_state() {
            Some(state) => {
                let cursor: Cursor =
                    bincode::deserialize(state.as_bytes()).map_err(Error::execution)?;
                if cursor.table != table {
                    return Err(Error::execution_with_status(400, "paging state from another table"));
                }
                cursor.offset
            }
            None => 0,
        };
        let page_size = statement.page_size().unwrap_or(100) as usize;
        let end = (offset + page_size).min(self.rows.len());
        let rows = self.rows.get(offset..end).unwrap_or_default().to_vec();

        let paging_state = if end < self.rows.len() {
            let bytes = bincode::serialize(&Cursor { table, offset: end }).map_err(Error::execution)?;
            Some(PagingState::from_bytes(bytes))
        } else {
            None
        };
        Ok(ResultPage::new(rows, paging_state))
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine for RecordingEngine {
    type Session = String;

    fn execute(&self, session: &String, statement: &StatementDescriptor) -> Result<ResultPage> {
        if session != TOKEN {
            return Err(Error::execution_with_status(401, "invalid token"));
        }
        self.executed.lock().unwrap().push(statement.clone());
        match statement.kind() {
            StatementKind::Select => self.page(statement),
            _ => Ok(ResultPage::default()),
        }
    }
}
