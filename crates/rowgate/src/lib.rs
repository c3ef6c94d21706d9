//! # Rowgate
//!
//! Typed row access over CQL tables. Rowgate turns REST-style requests
//! (primary key path segments, JSON bodies, `where`/`fields`/`sort`
//! parameters, opaque page states) into typed statements and runs them on
//! an execution engine you provide.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowgate::{
//!     ExecutionEngine, ReadOptions, Result, ResultPage, RowsService, StatementDescriptor,
//!     StaticSchemaProvider,
//! };
//!
//! struct Driver;
//!
//! impl ExecutionEngine for Driver {
//!     type Session = String;
//!
//!     fn execute(&self, _token: &String, statement: &StatementDescriptor) -> Result<ResultPage> {
//!         println!("{}", statement.cql());
//!         Ok(ResultPage::default())
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let schema = StaticSchemaProvider::from_json_file("schema.json")?;
//!     let service = RowsService::new(schema, Driver);
//!     let token = "token".to_string();
//!
//!     // GET /v2/keyspaces/ks/users/7
//!     let rows = service.get_rows(&token, "ks", "users", &["7"], &ReadOptions::default())?;
//!     println!("{}", serde_json::to_string(&rows).unwrap_or_default());
//!
//!     // ALTER TABLE ks.users DROP (age, nickname)
//!     service.drop_columns(&token, "ks", "users", &["age", "nickname"])?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod response;
pub mod schema_provider;
pub mod security;
pub mod service;

use std::sync::Arc;

// Re-export core types
pub use rowgate_core::{Error, Result};

pub use rowgate_core::{
    alter_table, build_add_columns, build_drop_columns, build_path_predicates,
    ensure_partition_key, insert_row, parse_where, resolve_page_size, Column, ColumnKind,
    ColumnType, Consistency, Converter, CqlValue, DeleteBuilder, Direction, InsertBuilder,
    Operator, PagingState, Predicate, RowMap, SelectBuilder, SortSpec, StatementDescriptor,
    StatementKind, Table, TableBuilder, TypedValue, UpdateBuilder, DEFAULT_PAGE_SIZE,
};

pub use config::{RequestLimits, ServiceConfig};
pub use logging::{LogConfig, LogFormat, LogOutput};
pub use response::{ApiError, GetResponse, ResponseWrapper, RowsResponse, UpdateResponse};
pub use schema_provider::StaticSchemaProvider;
pub use service::{parse_fields, ReadOptions, RowsService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source of table metadata.
///
/// Called once per request; implementations decide whether to cache.
pub trait SchemaProvider {
    /// Returns the table, or [`Error::TableNotFound`].
    fn table(&self, keyspace: &str, table: &str) -> Result<Table>;
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for &T {
    fn table(&self, keyspace: &str, table: &str) -> Result<Table> {
        (**self).table(keyspace, table)
    }
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for Arc<T> {
    fn table(&self, keyspace: &str, table: &str) -> Result<Table> {
        (**self).table(keyspace, table)
    }
}

/// Runs finalized statements.
///
/// Failures should be reported through [`Error::execution`] or
/// [`Error::execution_with_status`]; they are passed to the caller as-is.
pub trait ExecutionEngine {
    /// Identity the statement runs under, e.g. an auth token or a driver
    /// session. Opaque to Rowgate.
    type Session;

    /// Executes one statement. Reads return a page of rows and the state to
    /// resume from; writes and schema changes return an empty page.
    fn execute(&self, session: &Self::Session, statement: &StatementDescriptor)
        -> Result<ResultPage>;
}

impl<T: ExecutionEngine + ?Sized> ExecutionEngine for &T {
    type Session = T::Session;

    fn execute(&self, session: &Self::Session, statement: &StatementDescriptor) -> Result<ResultPage> {
        (**self).execute(session, statement)
    }
}

impl<T: ExecutionEngine + ?Sized> ExecutionEngine for Arc<T> {
    type Session = T::Session;

    fn execute(&self, session: &Self::Session, statement: &StatementDescriptor) -> Result<ResultPage> {
        (**self).execute(session, statement)
    }
}

/// One page of results from the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    /// Rows as column name to JSON value maps
    pub rows: Vec<RowMap>,
    /// Where the next page starts; `None` on the last page
    pub paging_state: Option<PagingState>,
}

impl ResultPage {
    /// A page of rows.
    pub fn new(rows: Vec<RowMap>, paging_state: Option<PagingState>) -> Self {
        Self { rows, paging_state }
    }
}
