/// Query assembler
///
/// Builders for the four DML shapes. Each builder only ever accumulates
/// (columns, predicates, assignments) and `build(self)` consumes it, so a
/// finalized statement can not be extended or built twice.
use super::ast::*;
use super::descriptor::{StatementDescriptor, READ_CONSISTENCY, WRITE_CONSISTENCY};
use crate::error::{Error, Result};
use crate::paging::{resolve_page_size, PagingState, DEFAULT_PAGE_SIZE};
use crate::predicate::{ensure_partition_key, Operator, Predicate};
use crate::schema::{ColumnType, Table};
use crate::sort::SortSpec;
use crate::value::{Converter, RowMap, TypedValue};
use serde_json::Value as JsonValue;

fn target_of(table: &Table) -> TableRef {
    TableRef {
        keyspace: table.keyspace().to_string(),
        table: table.name().to_string(),
    }
}

fn check_predicates(table: &Table, predicates: &[Predicate]) -> Result<()> {
    for predicate in predicates {
        table.require_column(predicate.column())?;
    }
    Ok(())
}

/// Builds a SELECT.
pub struct SelectBuilder<'a> {
    table: &'a Table,
    columns: Vec<String>,
    predicates: Vec<Predicate>,
    order_by: SortSpec,
    page_size: u32,
    paging_state: Option<PagingState>,
}

impl<'a> SelectBuilder<'a> {
    /// Starts a full scan of every declared column.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            predicates: Vec::new(),
            order_by: SortSpec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            paging_state: None,
        }
    }

    /// Projects the given columns; an empty list keeps all columns.
    pub fn columns<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in columns {
            let column = self.table.require_column(name.as_ref())?;
            self.columns.push(column.name().to_string());
        }
        Ok(self)
    }

    /// Adds predicates, ANDed with any already present.
    pub fn filter(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// Sets the sort order.
    pub fn order_by(mut self, order_by: SortSpec) -> Result<Self> {
        order_by.validate(self.table)?;
        self.order_by = order_by;
        Ok(self)
    }

    /// Sets the page size; non-positive or absent means the default.
    pub fn page_size(mut self, requested: Option<i64>) -> Self {
        self.page_size = resolve_page_size(requested, DEFAULT_PAGE_SIZE);
        self
    }

    /// Resumes from a previously issued paging state.
    pub fn paging_state(mut self, state: Option<PagingState>) -> Self {
        self.paging_state = state;
        self
    }

    /// Finalizes the statement.
    pub fn build(self) -> Result<StatementDescriptor> {
        check_predicates(self.table, &self.predicates)?;

        let columns = if self.columns.is_empty() {
            self.table
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect()
        } else {
            self.columns
        };
        let allow_filtering = needs_filtering(self.table, &self.predicates);

        let statement = Statement::Select(SelectStatement {
            target: target_of(self.table),
            columns,
            predicates: self.predicates,
            order_by: self.order_by,
            allow_filtering,
        });
        Ok(StatementDescriptor::new(statement, Some(READ_CONSISTENCY))
            .with_paging(self.page_size, self.paging_state))
    }
}

/// A read needs `ALLOW FILTERING` when it restricts anything beyond a key
/// prefix: regular columns, collections, or a key column out of order.
fn needs_filtering(table: &Table, predicates: &[Predicate]) -> bool {
    let keys = table.primary_key_columns();
    let mut prefix_open = true;
    for (position, key) in keys.iter().enumerate() {
        let restricted = predicates.iter().any(|p| p.column() == key.name());
        if !restricted {
            prefix_open = false;
            continue;
        }
        let only_eq = predicates
            .iter()
            .filter(|p| p.column() == key.name())
            .all(|p| matches!(p.operator(), Operator::Eq | Operator::In));
        let is_partition = position < table.partition_key_len();
        if !prefix_open || (is_partition && !only_eq) {
            return true;
        }
        if !only_eq {
            prefix_open = false;
        }
    }
    predicates.iter().any(|p| {
        table
            .column(p.column())
            .map_or(false, |c| !c.is_primary_key())
    })
}

/// Builds an INSERT.
pub struct InsertBuilder<'a> {
    table: &'a Table,
    values: Vec<(String, TypedValue)>,
}

impl<'a> InsertBuilder<'a> {
    /// Starts an insert into `table`.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            values: Vec::new(),
        }
    }

    /// Converts and adds every field of `row`.
    pub fn row(mut self, row: &RowMap) -> Result<Self> {
        for (column, value) in Converter::new(self.table).convert_row(row)? {
            if column.column_type() == &ColumnType::Counter {
                return Err(Error::InvalidInput(format!(
                    "counter column '{}' can only be updated",
                    column.name()
                )));
            }
            self.values.push((column.name().to_string(), value));
        }
        Ok(self)
    }

    /// Finalizes the statement.
    pub fn build(self) -> Result<StatementDescriptor> {
        if self.values.is_empty() {
            return Err(Error::InvalidInput(
                "insert requires at least one field".to_string(),
            ));
        }
        let statement = Statement::Insert(InsertStatement {
            target: target_of(self.table),
            values: self.values,
        });
        Ok(StatementDescriptor::new(statement, Some(WRITE_CONSISTENCY)))
    }
}

/// Builds an insert and echoes the primary key fields of `row`.
///
/// The echo is taken from the request itself, not re-read from storage; key
/// columns absent from the request are echoed as null.
pub fn insert_row(table: &Table, row: &RowMap) -> Result<(StatementDescriptor, RowMap)> {
    let descriptor = InsertBuilder::new(table).row(row)?.build()?;
    let keys = table
        .primary_key_columns()
        .into_iter()
        .map(|column| {
            let value = row.get(column.name()).cloned().unwrap_or(JsonValue::Null);
            (column.name().to_string(), value)
        })
        .collect();
    Ok((descriptor, keys))
}

/// Builds an UPDATE.
pub struct UpdateBuilder<'a> {
    table: &'a Table,
    assignments: Vec<(String, Assignment)>,
    predicates: Vec<Predicate>,
}

impl<'a> UpdateBuilder<'a> {
    /// Starts an update of `table`.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Converts and adds every field of `row` as an assignment.
    pub fn set_row(mut self, row: &RowMap) -> Result<Self> {
        for (column, value) in Converter::new(self.table).convert_row(row)? {
            if column.is_primary_key() {
                return Err(Error::InvalidInput(format!(
                    "primary key column '{}' cannot be updated",
                    column.name()
                )));
            }
            let assignment = if column.column_type() == &ColumnType::Counter {
                Assignment::Increment(value)
            } else {
                Assignment::Set(value)
            };
            self.assignments.push((column.name().to_string(), assignment));
        }
        Ok(self)
    }

    /// Adds predicates identifying the target rows.
    pub fn filter(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// Finalizes the statement.
    pub fn build(self) -> Result<StatementDescriptor> {
        check_predicates(self.table, &self.predicates)?;
        ensure_partition_key(self.table, &self.predicates)?;
        if self.assignments.is_empty() {
            return Err(Error::InvalidInput(
                "update requires at least one field to change".to_string(),
            ));
        }
        let statement = Statement::Update(UpdateStatement {
            target: target_of(self.table),
            assignments: self.assignments,
            predicates: self.predicates,
        });
        Ok(StatementDescriptor::new(statement, Some(WRITE_CONSISTENCY)))
    }
}

/// Builds a DELETE.
pub struct DeleteBuilder<'a> {
    table: &'a Table,
    predicates: Vec<Predicate>,
}

impl<'a> DeleteBuilder<'a> {
    /// Starts a delete from `table`.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            predicates: Vec::new(),
        }
    }

    /// Adds predicates identifying the target rows.
    pub fn filter(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// Finalizes the statement.
    pub fn build(self) -> Result<StatementDescriptor> {
        check_predicates(self.table, &self.predicates)?;
        ensure_partition_key(self.table, &self.predicates)?;
        let statement = Statement::Delete(DeleteStatement {
            target: target_of(self.table),
            predicates: self.predicates,
        });
        Ok(StatementDescriptor::new(statement, Some(WRITE_CONSISTENCY)))
    }
}
