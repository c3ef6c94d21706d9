/// Statement tree for the CQL subset Rowgate emits
///
/// Rendering (`Display`) produces statement text with a `?` bind marker for
/// every value; [`Statement::bound_values`] yields the values in marker order.
use crate::ident;
use crate::predicate::Predicate;
use crate::schema::ColumnType;
use crate::sort::SortSpec;
use crate::value::TypedValue;
use serde::Serialize;
use std::fmt;

/// A complete statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    AlterTable(AlterTableStatement),
}

/// Target table of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRef {
    pub keyspace: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    pub target: TableRef,
    pub columns: Vec<String>,
    pub predicates: Vec<Predicate>,
    pub order_by: SortSpec,
    pub allow_filtering: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStatement {
    pub target: TableRef,
    pub values: Vec<(String, TypedValue)>,
}

/// Right-hand side of an UPDATE assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// `col = ?`
    Set(TypedValue),
    /// `col = col + ?` (counter columns)
    Increment(TypedValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatement {
    pub target: TableRef,
    pub assignments: Vec<(String, Assignment)>,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStatement {
    pub target: TableRef,
    pub predicates: Vec<Predicate>,
}

/// One clause of an ALTER TABLE
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlterClause {
    Drop(Vec<String>),
    Add(Vec<(String, ColumnType)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterTableStatement {
    pub target: TableRef,
    pub clause: AlterClause,
}

impl Statement {
    /// Values to bind, in bind-marker order.
    pub fn bound_values(&self) -> Vec<TypedValue> {
        match self {
            Statement::Select(s) => predicate_values(&s.predicates),
            Statement::Insert(s) => s.values.iter().map(|(_, v)| v.clone()).collect(),
            Statement::Update(s) => s
                .assignments
                .iter()
                .map(|(_, a)| match a {
                    Assignment::Set(v) | Assignment::Increment(v) => v.clone(),
                })
                .chain(predicate_values(&s.predicates))
                .collect(),
            Statement::Delete(s) => predicate_values(&s.predicates),
            Statement::AlterTable(_) => Vec::new(),
        }
    }

    /// Table the statement targets.
    pub fn target(&self) -> &TableRef {
        match self {
            Statement::Select(s) => &s.target,
            Statement::Insert(s) => &s.target,
            Statement::Update(s) => &s.target,
            Statement::Delete(s) => &s.target,
            Statement::AlterTable(s) => &s.target,
        }
    }
}

fn predicate_values(predicates: &[Predicate]) -> Vec<TypedValue> {
    predicates.iter().map(|p| p.value().clone()).collect()
}

// Display implementations render statement text

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(s) => write!(f, "{}", s),
            Statement::Insert(s) => write!(f, "{}", s),
            Statement::Update(s) => write!(f, "{}", s),
            Statement::Delete(s) => write!(f, "{}", s),
            Statement::AlterTable(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ident::qualified(&self.keyspace, &self.table))
    }
}

fn write_where(f: &mut fmt::Formatter<'_>, predicates: &[Predicate]) -> fmt::Result {
    for (i, predicate) in predicates.iter().enumerate() {
        let keyword = if i == 0 { " WHERE " } else { " AND " };
        write!(f, "{}{}", keyword, predicate.to_cql_with_marker())?;
    }
    Ok(())
}

fn write_names(f: &mut fmt::Formatter<'_>, names: impl Iterator<Item = impl AsRef<str>>) -> fmt::Result {
    for (i, name) in names.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ident::quote(name.as_ref()))?;
    }
    Ok(())
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        write_names(f, self.columns.iter())?;
        write!(f, " FROM {}", self.target)?;
        write_where(f, &self.predicates)?;
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", self.order_by)?;
        }
        if self.allow_filtering {
            write!(f, " ALLOW FILTERING")?;
        }
        Ok(())
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} (", self.target)?;
        write_names(f, self.values.iter().map(|(name, _)| name))?;
        write!(f, ") VALUES (")?;
        for i in 0..self.values.len() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.target)?;
        for (i, (name, assignment)) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let column = ident::quote(name);
            match assignment {
                Assignment::Set(_) => write!(f, "{} = ?", column)?,
                Assignment::Increment(_) => write!(f, "{} = {} + ?", column, column)?,
            }
        }
        write_where(f, &self.predicates)
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.target)?;
        write_where(f, &self.predicates)
    }
}

impl fmt::Display for AlterTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {} ", self.target)?;
        match &self.clause {
            AlterClause::Drop(columns) if columns.len() == 1 => {
                write!(f, "DROP {}", ident::quote(&columns[0]))
            }
            AlterClause::Drop(columns) => {
                write!(f, "DROP (")?;
                write_names(f, columns.iter())?;
                write!(f, ")")
            }
            AlterClause::Add(columns) => {
                let multiple = columns.len() > 1;
                write!(f, "ADD {}", if multiple { "(" } else { "" })?;
                for (i, (name, ty)) in columns.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", ident::quote(name), ty)?;
                }
                write!(f, "{}", if multiple { ")" } else { "" })
            }
        }
    }
}
