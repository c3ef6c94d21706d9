//! Filter expressions for reads by condition.
//!
//! A filter is a JSON object mapping column names to operator objects:
//!
//! ```json
//! {"name": {"$eq": "Ann"}, "age": {"$gte": 18, "$lt": 65}}
//! ```
//!
//! Every operand is converted through the typed value converter, so the
//! resulting predicates carry engine-typed values only.

use crate::error::{Error, Result};
use crate::predicate::{Operator, Predicate};
use crate::schema::{Column, ColumnType, Table};
use crate::value::{convert_as, TypedValue};
use serde_json::Value as JsonValue;

fn operator_for(name: &str) -> Option<Operator> {
    let op = match name {
        "$eq" => Operator::Eq,
        "$ne" => Operator::Ne,
        "$lt" => Operator::Lt,
        "$lte" => Operator::Le,
        "$gt" => Operator::Gt,
        "$gte" => Operator::Ge,
        "$in" => Operator::In,
        "$contains" => Operator::Contains,
        "$containsKey" => Operator::ContainsKey,
        _ => return None,
    };
    Some(op)
}

/// Parses a filter expression into predicates, in the order written.
pub fn parse_where(text: &str, table: &Table) -> Result<Vec<Predicate>> {
    let parsed: JsonValue =
        serde_json::from_str(text).map_err(|e| Error::InvalidFilter(e.to_string()))?;
    let JsonValue::Object(fields) = parsed else {
        return Err(Error::InvalidFilter(
            "expected a JSON object of column conditions".to_string(),
        ));
    };
    if fields.is_empty() {
        return Err(Error::InvalidFilter(
            "at least one condition is required".to_string(),
        ));
    }

    let mut predicates = Vec::new();
    for (name, conditions) in &fields {
        let column = table.require_column(name)?;
        let JsonValue::Object(conditions) = conditions else {
            return Err(Error::InvalidFilter(format!(
                "conditions for '{}' must be an object such as {{\"$eq\": value}}",
                name
            )));
        };
        if conditions.is_empty() {
            return Err(Error::InvalidFilter(format!("no condition given for '{}'", name)));
        }

        for (op_name, operand) in conditions {
            let operator = operator_for(op_name).ok_or_else(|| {
                Error::InvalidFilter(format!("unsupported operator '{}'", op_name))
            })?;
            if operand.is_null() {
                return Err(Error::InvalidFilter(format!(
                    "'{}' on '{}' cannot compare against null",
                    op_name, name
                )));
            }
            let value = operand_for(column, operator, operand)?;
            predicates.push(Predicate::new(column.name(), operator, value));
        }
    }
    Ok(predicates)
}

fn operand_for(column: &Column, operator: Operator, operand: &JsonValue) -> Result<TypedValue> {
    let ty = column.column_type();
    match operator {
        Operator::In => {
            let JsonValue::Array(items) = operand else {
                return Err(Error::InvalidFilter(format!(
                    "'$in' on '{}' expects an array",
                    column.name()
                )));
            };
            if items.is_empty() {
                return Err(Error::InvalidFilter(format!(
                    "'$in' on '{}' expects at least one value",
                    column.name()
                )));
            }
            if items.iter().any(JsonValue::is_null) {
                return Err(Error::InvalidFilter(format!(
                    "'$in' on '{}' cannot contain null",
                    column.name()
                )));
            }
            let values = items
                .iter()
                .map(|item| convert_as(column, ty, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(TypedValue::list_of(ty, values))
        }
        Operator::Contains => {
            let elem = match ty.unfrozen() {
                ColumnType::List(elem) | ColumnType::Set(elem) => elem,
                ColumnType::Map(_, value) => value,
                _ => return Err(not_a_collection(column, "$contains")),
            };
            convert_as(column, elem, operand)
        }
        Operator::ContainsKey => match ty.unfrozen() {
            ColumnType::Map(key, _) => convert_as(column, key, operand),
            _ => Err(not_a_collection(column, "$containsKey")),
        },
        _ => convert_as(column, ty, operand),
    }
}

fn not_a_collection(column: &Column, op: &str) -> Error {
    Error::InvalidFilter(format!(
        "'{}' requires a collection column, '{}' is {}",
        op,
        column.name(),
        column.column_type()
    ))
}
