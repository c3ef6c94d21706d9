//! Predicates and the primary-key path builder.

use crate::error::{Error, Result};
use crate::ident;
use crate::schema::Table;
use crate::value::{Converter, TypedValue};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `IN`
    In,
    /// `CONTAINS`
    Contains,
    /// `CONTAINS KEY`
    ContainsKey,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "IN",
            Operator::Contains => "CONTAINS",
            Operator::ContainsKey => "CONTAINS KEY",
        };
        write!(f, "{}", op)
    }
}

/// A single `column <op> value` condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    column: String,
    operator: Operator,
    value: TypedValue,
}

impl Predicate {
    /// Creates a predicate. Values come from the converter only.
    pub fn new(column: impl Into<String>, operator: Operator, value: TypedValue) -> Self {
        Self {
            column: column.into(),
            operator,
            value,
        }
    }

    /// Column the predicate applies to.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Converted operand.
    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    /// Renders the predicate with a bind marker in place of the value.
    pub(crate) fn to_cql_with_marker(&self) -> String {
        format!("{} {} ?", ident::quote(&self.column), self.operator)
    }
}

/// Renders the predicate with its value inlined as a literal.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            ident::quote(&self.column),
            self.operator,
            self.value
        )
    }
}

/// Maps positional path segments onto the table's primary key.
///
/// Segment `i` binds to primary key column `i` (partition key columns first,
/// then clustering columns). At least the full partition key must be given;
/// more segments than primary key columns is an error as well.
pub fn build_path_predicates<S: AsRef<str>>(table: &Table, segments: &[S]) -> Result<Vec<Predicate>> {
    let required = table.partition_key_len();
    if segments.len() < required {
        return Err(Error::InsufficientKeyPath {
            required,
            supplied: segments.len(),
        });
    }

    let keys = table.primary_key_columns();
    if segments.len() > keys.len() {
        return Err(Error::TooManyKeySegments {
            max: keys.len(),
            supplied: segments.len(),
        });
    }

    let converter = Converter::new(table);
    let predicates = segments
        .iter()
        .zip(keys)
        .map(|(segment, column)| converter.convert_path_segment(segment.as_ref(), column))
        .collect::<Result<Vec<_>>>()?;

    trace!(
        table = table.name(),
        segments = segments.len(),
        "built key path predicates"
    );
    Ok(predicates)
}

/// Checks that `predicates` pin every partition key column with equality.
///
/// Used for statements that must target rows by key (update, delete).
pub fn ensure_partition_key(table: &Table, predicates: &[Predicate]) -> Result<()> {
    let required = table.partition_key_len();
    let covered = table
        .partition_key_columns()
        .filter(|column| {
            predicates.iter().any(|p| {
                p.column() == column.name() && matches!(p.operator(), Operator::Eq | Operator::In)
            })
        })
        .count();

    if covered < required {
        return Err(Error::InsufficientKeyPath {
            required,
            supplied: covered,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use crate::value::CqlValue;

    fn users() -> Table {
        Table::builder("ks", "users")
            .partition_key("id", ColumnType::Int)
            .column("name", ColumnType::Text)
            .column("age", ColumnType::Int)
            .build()
            .unwrap()
    }

    fn readings() -> Table {
        Table::builder("ks", "readings")
            .partition_key("sensor", ColumnType::Text)
            .partition_key("day", ColumnType::Date)
            .clustering("ts", ColumnType::Timestamp)
            .clustering("seq", ColumnType::Int)
            .column("value", ColumnType::Double)
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_partition_key() {
        let predicates = build_path_predicates(&users(), &["7"]).unwrap();
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].column(), "id");
        assert_eq!(predicates[0].value().value(), &CqlValue::Int(7));
        assert_eq!(predicates[0].to_string(), "id = 7");
    }

    #[test]
    fn test_empty_path_rejected() {
        let empty: [&str; 0] = [];
        match build_path_predicates(&users(), &empty) {
            Err(Error::InsufficientKeyPath { required, supplied }) => {
                assert_eq!(required, 1);
                assert_eq!(supplied, 0);
            }
            other => panic!("Expected InsufficientKeyPath, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_lengths_follow_key_order() {
        let table = readings();
        let full = ["s1", "2024-05-01", "2024-05-01T10:00:00Z", "3"];
        let expected = ["sensor", "day", "ts", "seq"];

        for len in 0..=full.len() + 1 {
            let segments: Vec<&str> = full.iter().cycle().take(len).copied().collect();
            let result = build_path_predicates(&table, &segments);
            if (2..=4).contains(&len) {
                let columns: Vec<String> = result
                    .unwrap()
                    .iter()
                    .map(|p| p.column().to_string())
                    .collect();
                assert_eq!(columns, expected[..len]);
            } else {
                assert!(result.is_err(), "length {} should fail", len);
            }
        }
    }

    #[test]
    fn test_too_many_segments() {
        assert!(matches!(
            build_path_predicates(&users(), &["1", "2"]),
            Err(Error::TooManyKeySegments { max: 1, supplied: 2 })
        ));
    }

    #[test]
    fn test_segment_type_checked() {
        assert!(matches!(
            build_path_predicates(&users(), &["abc"]),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_ensure_partition_key() {
        let table = readings();
        let partial = build_path_predicates(&table, &["s1", "2024-05-01"]).unwrap();
        assert!(ensure_partition_key(&table, &partial).is_ok());
        assert!(matches!(
            ensure_partition_key(&table, &partial[..1]),
            Err(Error::InsufficientKeyPath { required: 2, supplied: 1 })
        ));
    }
}
