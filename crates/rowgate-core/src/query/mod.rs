/// Query assembly
///
/// Statement tree, builders and the descriptors handed to the engine.
/// Statement tree
#[allow(missing_docs)]
pub mod ast;
/// DML builders
pub mod builder;
/// Engine-ready statement descriptors
#[allow(missing_docs)]
pub mod descriptor;
/// ALTER TABLE builders
pub mod schema_change;

// Re-export main types
pub use ast::*;
pub use builder::{insert_row, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
pub use descriptor::{
    Consistency, StatementDescriptor, StatementKind, READ_CONSISTENCY, WRITE_CONSISTENCY,
};
pub use schema_change::{
    alter_table, build_add_columns, build_drop_columns, AlterTableAddColumnEnd,
    AlterTableDropColumnEnd, AlterTableStart,
};
