/// Statement descriptors handed to the execution layer
use super::ast::Statement;
use crate::paging::PagingState;
use crate::value::TypedValue;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Consistency levels understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consistency {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
    Serial,
    LocalSerial,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Consistency::Any => "ANY",
            Consistency::One => "ONE",
            Consistency::Two => "TWO",
            Consistency::Three => "THREE",
            Consistency::Quorum => "QUORUM",
            Consistency::All => "ALL",
            Consistency::LocalQuorum => "LOCAL_QUORUM",
            Consistency::EachQuorum => "EACH_QUORUM",
            Consistency::LocalOne => "LOCAL_ONE",
            Consistency::Serial => "SERIAL",
            Consistency::LocalSerial => "LOCAL_SERIAL",
        };
        write!(f, "{}", name)
    }
}

/// Consistency for every read. Fixed policy, not configurable.
pub const READ_CONSISTENCY: Consistency = Consistency::LocalQuorum;

/// Consistency for every insert, update and delete. Fixed policy, independent
/// of [`READ_CONSISTENCY`].
pub const WRITE_CONSISTENCY: Consistency = Consistency::LocalQuorum;

/// Statement kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    SchemaChange,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::SchemaChange => "schema_change",
        };
        write!(f, "{}", name)
    }
}

/// A finalized, engine-ready statement.
///
/// Carries both the structured statement and its rendered text, the values
/// to bind, the consistency level (DML only) and, for reads, the page size
/// and the paging state to resume from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementDescriptor {
    statement: Statement,
    cql: String,
    values: Vec<TypedValue>,
    consistency: Option<Consistency>,
    page_size: Option<u32>,
    paging_state: Option<PagingState>,
}

impl StatementDescriptor {
    pub(crate) fn new(statement: Statement, consistency: Option<Consistency>) -> Self {
        let cql = statement.to_string();
        let values = statement.bound_values();
        let descriptor = Self {
            statement,
            cql,
            values,
            consistency,
            page_size: None,
            paging_state: None,
        };
        debug!(
            kind = %descriptor.kind(),
            table = %descriptor.statement.target(),
            cql = %descriptor.cql,
            bound = descriptor.values.len(),
            "statement assembled"
        );
        descriptor
    }

    pub(crate) fn with_paging(mut self, page_size: u32, paging_state: Option<PagingState>) -> Self {
        self.page_size = Some(page_size);
        self.paging_state = paging_state;
        self
    }

    /// Statement kind.
    pub fn kind(&self) -> StatementKind {
        match self.statement {
            Statement::Select(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
            Statement::AlterTable(_) => StatementKind::SchemaChange,
        }
    }

    /// Structured statement.
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Statement text with `?` bind markers.
    pub fn cql(&self) -> &str {
        &self.cql
    }

    /// Values for the bind markers, in order.
    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    /// Consistency level; `None` for schema changes.
    pub fn consistency(&self) -> Option<Consistency> {
        self.consistency
    }

    /// Requested page size (reads only).
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Paging state to resume from (reads only).
    pub fn paging_state(&self) -> Option<&PagingState> {
        self.paging_state.as_ref()
    }

    /// Statement text with values inlined as literals, for diagnostics.
    pub fn to_inlined_cql(&self) -> String {
        let mut out = String::with_capacity(self.cql.len());
        let mut values = self.values.iter();
        let mut in_string = false;
        let mut in_ident = false;
        for c in self.cql.chars() {
            match c {
                '\'' if !in_ident => in_string = !in_string,
                '"' if !in_string => in_ident = !in_ident,
                '?' if !in_string && !in_ident => {
                    if let Some(value) = values.next() {
                        out.push_str(&value.to_string());
                        continue;
                    }
                }
                _ => {}
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for StatementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::builder::{SelectBuilder, UpdateBuilder};
    use crate::predicate::build_path_predicates;
    use crate::schema::{ColumnType, Table};
    use serde_json::json;

    fn notes() -> Table {
        Table::builder("app", "notes")
            .partition_key("owner", ColumnType::Text)
            .clustering("id", ColumnType::Int)
            .column("body", ColumnType::Text)
            .column("data", ColumnType::Blob)
            .build()
            .unwrap()
    }

    #[test]
    fn test_consistency_names() {
        assert_eq!(READ_CONSISTENCY.to_string(), "LOCAL_QUORUM");
        assert_eq!(WRITE_CONSISTENCY.to_string(), "LOCAL_QUORUM");
        assert_eq!(
            serde_json::to_value(Consistency::LocalOne).unwrap(),
            json!("LOCAL_ONE")
        );
    }

    #[test]
    fn test_inlined_cql() {
        let table = notes();
        let row = json!({"body": "what?", "data": "0xcafe"});
        let stmt = UpdateBuilder::new(&table)
            .set_row(row.as_object().unwrap())
            .unwrap()
            .filter(build_path_predicates(&table, &["o'neil", "3"]).unwrap())
            .build()
            .unwrap();

        assert_eq!(
            stmt.to_string(),
            "UPDATE app.notes SET body = ?, data = ? WHERE owner = ? AND id = ?"
        );
        assert_eq!(
            stmt.to_inlined_cql(),
            "UPDATE app.notes SET body = 'what?', data = 0xcafe WHERE owner = 'o''neil' AND id = 3"
        );
    }

    #[test]
    fn test_inlined_in_list() {
        let table = notes();
        let predicates =
            crate::filter::parse_where(r#"{"owner": {"$eq": "a"}, "id": {"$in": [1, 2]}}"#, &table)
                .unwrap();
        let stmt = SelectBuilder::new(&table)
            .columns(["body"])
            .unwrap()
            .filter(predicates)
            .build()
            .unwrap();

        assert_eq!(stmt.cql(), "SELECT body FROM app.notes WHERE owner = ? AND id IN ?");
        assert_eq!(
            stmt.to_inlined_cql(),
            "SELECT body FROM app.notes WHERE owner = 'a' AND id IN (1, 2)"
        );
    }

    #[test]
    fn test_serializes_for_diagnostics() {
        let table = notes();
        let stmt = SelectBuilder::new(&table)
            .columns(["body"])
            .unwrap()
            .build()
            .unwrap();
        let value = serde_json::to_value(&stmt).unwrap();

        assert_eq!(value["cql"], json!("SELECT body FROM app.notes"));
        assert_eq!(value["consistency"], json!("LOCAL_QUORUM"));
        assert_eq!(value["page_size"], json!(100));
        assert_eq!(value["statement"]["statement"], json!("select"));
    }
}
