//! # Rowgate Core
//!
//! Schema-aware translation of row-oriented requests (key paths, JSON
//! bodies, filter expressions) into typed CQL statement descriptors.
//!
//! Nothing in this crate talks to a database. Every builder ends in a
//! [`StatementDescriptor`] that an execution layer can run as-is.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod ident;
pub mod paging;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod sort;
pub mod value;

pub use error::{Error, Result};
pub use filter::parse_where;
pub use paging::{resolve_page_size, PagingState, DEFAULT_PAGE_SIZE};
pub use predicate::{build_path_predicates, ensure_partition_key, Operator, Predicate};
pub use query::{
    alter_table, build_add_columns, build_drop_columns, insert_row, Consistency, DeleteBuilder,
    InsertBuilder, SelectBuilder, StatementDescriptor, StatementKind, UpdateBuilder,
};
pub use schema::{Column, ColumnKind, ColumnType, Table, TableBuilder};
pub use sort::{Direction, SortSpec};
pub use value::{CqlValue, Converter, RowMap, TypedValue};
