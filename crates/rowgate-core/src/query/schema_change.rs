/// Schema mutation builder
///
/// A typed chain for ALTER TABLE: `alter_table(ks, t)` opens it, the first
/// `drop_column`/`add_column` moves it to a state that can be built, and
/// `build` consumes the chain.
use super::ast::{AlterClause, AlterTableStatement, Statement, TableRef};
use super::descriptor::StatementDescriptor;
use crate::error::{Error, Result};
use crate::schema::ColumnType;

/// Opens an ALTER TABLE chain.
pub fn alter_table(keyspace: impl Into<String>, table: impl Into<String>) -> AlterTableStart {
    AlterTableStart::new(keyspace, table)
}

/// ALTER TABLE with no clause yet. Can not be built.
#[derive(Debug, Clone)]
pub struct AlterTableStart {
    target: TableRef,
}

impl AlterTableStart {
    /// Targets `keyspace.table`.
    pub fn new(keyspace: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            target: TableRef {
                keyspace: keyspace.into(),
                table: table.into(),
            },
        }
    }

    /// Starts a DROP clause.
    pub fn drop_column(self, column: impl Into<String>) -> AlterTableDropColumnEnd {
        AlterTableDropColumnEnd {
            target: self.target,
            columns: vec![column.into()],
        }
    }

    /// Starts an ADD clause.
    pub fn add_column(self, column: impl Into<String>, ty: ColumnType) -> AlterTableAddColumnEnd {
        AlterTableAddColumnEnd {
            target: self.target,
            columns: vec![(column.into(), ty)],
        }
    }
}

/// ALTER TABLE ... DROP with at least one column.
#[derive(Debug, Clone)]
pub struct AlterTableDropColumnEnd {
    target: TableRef,
    columns: Vec<String>,
}

impl AlterTableDropColumnEnd {
    /// Drops one more column.
    pub fn drop_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Finalizes the statement. Schema changes carry no consistency level.
    pub fn build(self) -> StatementDescriptor {
        let statement = Statement::AlterTable(AlterTableStatement {
            target: self.target,
            clause: AlterClause::Drop(self.columns),
        });
        StatementDescriptor::new(statement, None)
    }
}

/// ALTER TABLE ... ADD with at least one column.
#[derive(Debug, Clone)]
pub struct AlterTableAddColumnEnd {
    target: TableRef,
    columns: Vec<(String, ColumnType)>,
}

impl AlterTableAddColumnEnd {
    /// Adds one more column.
    pub fn add_column(mut self, column: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.push((column.into(), ty));
        self
    }

    /// Finalizes the statement.
    pub fn build(self) -> StatementDescriptor {
        let statement = Statement::AlterTable(AlterTableStatement {
            target: self.target,
            clause: AlterClause::Add(self.columns),
        });
        StatementDescriptor::new(statement, None)
    }
}

/// Builds `ALTER TABLE keyspace.table DROP ...` for a runtime list of
/// columns, in the order given.
pub fn build_drop_columns<S: AsRef<str>>(
    keyspace: &str,
    table: &str,
    to_drop: &[S],
) -> Result<StatementDescriptor> {
    let (first, rest) = to_drop.split_first().ok_or_else(|| {
        Error::InvalidMutation("toDrop must contain at least one element".to_string())
    })?;
    let chain = rest.iter().fold(
        alter_table(keyspace, table).drop_column(first.as_ref()),
        |chain, column| chain.drop_column(column.as_ref()),
    );
    Ok(chain.build())
}

/// Builds `ALTER TABLE keyspace.table ADD ...` for a runtime list of
/// column definitions.
pub fn build_add_columns(
    keyspace: &str,
    table: &str,
    to_add: &[(String, ColumnType)],
) -> Result<StatementDescriptor> {
    let ((name, ty), rest) = to_add.split_first().ok_or_else(|| {
        Error::InvalidMutation("toAdd must contain at least one element".to_string())
    })?;
    let chain = rest.iter().fold(
        alter_table(keyspace, table).add_column(name.as_str(), ty.clone()),
        |chain, (name, ty)| chain.add_column(name.as_str(), ty.clone()),
    );
    Ok(chain.build())
}
