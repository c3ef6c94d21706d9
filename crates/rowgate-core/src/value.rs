//! Typed value conversion.
//!
//! Untyped request input (path segments, JSON payload values) is turned into
//! engine-typed values here, driven by the declared type of the target
//! column. Nothing untyped leaves this module.

use crate::error::{Error, Result};
use crate::predicate::{Operator, Predicate};
use crate::schema::{Column, ColumnType, Table};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// Ordered, untyped key/value payload as received from a client.
pub type RowMap = Map<String, JsonValue>;

/// Concrete engine value.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CqlValue {
    Null,
    Ascii(String),
    Text(String),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Counter(i64),
    /// Canonical signed decimal digits
    Varint(String),
    Float(f32),
    Double(f64),
    /// Canonical decimal text
    Decimal(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Uuid(Uuid),
    TimeUuid(Uuid),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Inet(IpAddr),
    /// Duration literal as supplied (`1h30m`, `P1DT2H`)
    Duration(String),
    List(Vec<CqlValue>),
    Set(Vec<CqlValue>),
    Map(Vec<(CqlValue, CqlValue)>),
    Tuple(Vec<CqlValue>),
}

/// A value paired with the type it was converted to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedValue {
    column_type: ColumnType,
    value: CqlValue,
    /// Operand of `IN`; rendered as a parenthesized value list
    #[serde(skip)]
    in_list: bool,
}

impl TypedValue {
    /// Type the value was converted to.
    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// The concrete value.
    pub fn value(&self) -> &CqlValue {
        &self.value
    }

    /// True for an explicit null.
    pub fn is_null(&self) -> bool {
        self.value == CqlValue::Null
    }

    /// Consumes the wrapper.
    pub fn into_value(self) -> CqlValue {
        self.value
    }

    /// Bundles converted elements into one `list<ty>` operand (for `IN`).
    pub(crate) fn list_of(ty: &ColumnType, items: Vec<TypedValue>) -> Self {
        Self {
            column_type: ColumnType::List(Box::new(ty.clone())),
            value: CqlValue::List(items.into_iter().map(TypedValue::into_value).collect()),
            in_list: true,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            CqlValue::List(items) if self.in_list => write_seq(f, "(", items, ")"),
            value => write!(f, "{}", value),
        }
    }
}

/// Renders values as CQL literals.
impl fmt::Display for CqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlValue::Null => write!(f, "NULL"),
            CqlValue::Ascii(s) | CqlValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            CqlValue::TinyInt(v) => write!(f, "{}", v),
            CqlValue::SmallInt(v) => write!(f, "{}", v),
            CqlValue::Int(v) => write!(f, "{}", v),
            CqlValue::BigInt(v) | CqlValue::Counter(v) => write!(f, "{}", v),
            CqlValue::Varint(s) | CqlValue::Decimal(s) | CqlValue::Duration(s) => {
                write!(f, "{}", s)
            }
            CqlValue::Float(v) => write_float(f, f64::from(*v)),
            CqlValue::Double(v) => write_float(f, *v),
            CqlValue::Boolean(b) => write!(f, "{}", b),
            CqlValue::Blob(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            CqlValue::Uuid(u) | CqlValue::TimeUuid(u) => write!(f, "{}", u),
            CqlValue::Timestamp(ts) => {
                write!(f, "'{}'", ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            CqlValue::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            CqlValue::Time(t) => write!(f, "'{}'", t.format("%H:%M:%S%.9f")),
            CqlValue::Inet(ip) => write!(f, "'{}'", ip),
            CqlValue::List(items) => write_seq(f, "[", items, "]"),
            CqlValue::Set(items) => write_seq(f, "{", items, "}"),
            CqlValue::Tuple(items) => write_seq(f, "(", items, ")"),
            CqlValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        write!(f, "NaN")
    } else if v.is_infinite() {
        write!(f, "{}Infinity", if v < 0.0 { "-" } else { "" })
    } else {
        write!(f, "{}", v)
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[CqlValue], close: &str) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

/// Converts raw input against the columns of one table.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    table: &'a Table,
}

impl<'a> Converter<'a> {
    /// Creates a converter bound to a schema snapshot.
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// The table this converter resolves names against.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Converts `raw` for the column called `column`.
    ///
    /// Fails with [`Error::UnknownColumn`] when the table has no such column
    /// and with [`Error::TypeMismatch`] when the value does not parse as the
    /// column's declared type.
    pub fn convert(&self, column: &str, raw: &JsonValue) -> Result<TypedValue> {
        let column = self.table.require_column(column)?;
        convert_value(column, raw)
    }

    /// Converts one primary-key path segment into an equality predicate.
    pub fn convert_path_segment(&self, segment: &str, column: &Column) -> Result<Predicate> {
        let value = convert_segment(column, segment)?;
        Ok(Predicate::new(column.name(), Operator::Eq, value))
    }

    /// Converts every entry of a payload, preserving its order.
    pub fn convert_row(&self, row: &RowMap) -> Result<Vec<(&'a Column, TypedValue)>> {
        row.iter()
            .map(|(name, raw)| {
                let column = self.table.require_column(name)?;
                Ok((column, convert_value(column, raw)?))
            })
            .collect()
    }
}

/// Converts a JSON value for `column`.
pub fn convert_value(column: &Column, raw: &JsonValue) -> Result<TypedValue> {
    if raw.is_null() && column.is_primary_key() {
        return Err(mismatch(
            column,
            column.column_type(),
            "primary key columns cannot be null".to_string(),
        ));
    }
    convert_as(column, column.column_type(), raw)
}

/// Converts a single path segment for `column`.
pub fn convert_segment(column: &Column, segment: &str) -> Result<TypedValue> {
    let ty = column.column_type();
    let value = from_str(ty, segment).map_err(|reason| mismatch(column, ty, reason))?;
    Ok(TypedValue {
        column_type: ty.clone(),
        value,
        in_list: false,
    })
}

/// Converts a JSON value to `ty`, reporting failures against `column`.
///
/// Used where the target type differs from the column's own type, e.g. the
/// element type of a collection column.
pub fn convert_as(column: &Column, ty: &ColumnType, raw: &JsonValue) -> Result<TypedValue> {
    let value = from_json(ty, raw).map_err(|reason| mismatch(column, ty, reason))?;
    Ok(TypedValue {
        column_type: ty.clone(),
        value,
        in_list: false,
    })
}

fn mismatch(column: &Column, ty: &ColumnType, reason: String) -> Error {
    Error::TypeMismatch {
        column: column.name().to_string(),
        expected: ty.to_string(),
        reason,
    }
}

type Conversion = std::result::Result<CqlValue, String>;

fn from_json(ty: &ColumnType, raw: &JsonValue) -> Conversion {
    match raw {
        JsonValue::Null => Ok(CqlValue::Null),
        JsonValue::String(s) => from_str(ty, s),
        JsonValue::Bool(b) => match ty.unfrozen() {
            ColumnType::Boolean => Ok(CqlValue::Boolean(*b)),
            _ => Err("unexpected boolean".to_string()),
        },
        JsonValue::Number(n) => from_number(ty, n),
        JsonValue::Array(items) => from_array(ty, items),
        JsonValue::Object(entries) => from_object(ty, entries),
    }
}

fn from_number(ty: &ColumnType, n: &Number) -> Conversion {
    let integer = || {
        n.as_i64()
            .ok_or_else(|| format!("'{}' is not an integer", n))
    };
    let narrow = |v: i64| format!("{} is out of range", v);

    match ty.unfrozen() {
        ColumnType::TinyInt => {
            let v = integer()?;
            i8::try_from(v).map(CqlValue::TinyInt).map_err(|_| narrow(v))
        }
        ColumnType::SmallInt => {
            let v = integer()?;
            i16::try_from(v).map(CqlValue::SmallInt).map_err(|_| narrow(v))
        }
        ColumnType::Int => {
            let v = integer()?;
            i32::try_from(v).map(CqlValue::Int).map_err(|_| narrow(v))
        }
        ColumnType::BigInt => integer().map(CqlValue::BigInt),
        ColumnType::Counter => integer().map(CqlValue::Counter),
        ColumnType::Varint if n.is_i64() || n.is_u64() => Ok(CqlValue::Varint(n.to_string())),
        ColumnType::Float => {
            let v = n.as_f64().ok_or_else(|| format!("'{}' is not a number", n))?;
            let narrowed = v as f32;
            if v.is_finite() && !narrowed.is_finite() {
                return Err(format!("{} is out of range for float", n));
            }
            Ok(CqlValue::Float(narrowed))
        }
        ColumnType::Double => n
            .as_f64()
            .map(CqlValue::Double)
            .ok_or_else(|| format!("'{}' is not a number", n)),
        ColumnType::Decimal => Ok(CqlValue::Decimal(n.to_string())),
        ColumnType::Timestamp => timestamp_from_millis(integer()?),
        _ => Err(format!("unexpected number {}", n)),
    }
}

fn from_array(ty: &ColumnType, items: &[JsonValue]) -> Conversion {
    match ty.unfrozen() {
        ColumnType::List(elem) => collect_elements(elem, items).map(CqlValue::List),
        ColumnType::Set(elem) => collect_elements(elem, items).map(CqlValue::Set),
        ColumnType::Tuple(types) => {
            if types.len() != items.len() {
                return Err(format!(
                    "expected {} tuple components, found {}",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| from_json(ty, item))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(CqlValue::Tuple)
        }
        _ => Err("unexpected array".to_string()),
    }
}

fn collect_elements(elem: &ColumnType, items: &[JsonValue]) -> std::result::Result<Vec<CqlValue>, String> {
    items
        .iter()
        .map(|item| {
            if item.is_null() {
                return Err("collections cannot contain null elements".to_string());
            }
            from_json(elem, item)
        })
        .collect()
}

fn from_object(ty: &ColumnType, entries: &Map<String, JsonValue>) -> Conversion {
    let ColumnType::Map(key_ty, value_ty) = ty.unfrozen() else {
        return Err("unexpected object".to_string());
    };
    entries
        .iter()
        .map(|(k, v)| {
            if v.is_null() {
                return Err(format!("map entry '{}' has a null value", k));
            }
            Ok((from_str(key_ty, k)?, from_json(value_ty, v)?))
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(CqlValue::Map)
}

fn from_str(ty: &ColumnType, s: &str) -> Conversion {
    let parse_err = |e: &dyn fmt::Display| format!("'{}' {}", s, e);

    match ty.unfrozen() {
        ColumnType::Ascii if s.is_ascii() => Ok(CqlValue::Ascii(s.to_string())),
        ColumnType::Ascii => Err(format!("'{}' contains non-ASCII characters", s)),
        ColumnType::Text => Ok(CqlValue::Text(s.to_string())),
        ColumnType::TinyInt => s
            .trim()
            .parse()
            .map(CqlValue::TinyInt)
            .map_err(|e| parse_err(&e)),
        ColumnType::SmallInt => s
            .trim()
            .parse()
            .map(CqlValue::SmallInt)
            .map_err(|e| parse_err(&e)),
        ColumnType::Int => s.trim().parse().map(CqlValue::Int).map_err(|e| parse_err(&e)),
        ColumnType::BigInt => s
            .trim()
            .parse()
            .map(CqlValue::BigInt)
            .map_err(|e| parse_err(&e)),
        ColumnType::Counter => s
            .trim()
            .parse()
            .map(CqlValue::Counter)
            .map_err(|e| parse_err(&e)),
        ColumnType::Varint => parse_varint(s.trim()).map(CqlValue::Varint),
        ColumnType::Float => {
            let v: f32 = s.trim().parse().map_err(|e| parse_err(&e))?;
            check_float_range(s, v.is_infinite()).map(|_| CqlValue::Float(v))
        }
        ColumnType::Double => {
            let v: f64 = s.trim().parse().map_err(|e| parse_err(&e))?;
            check_float_range(s, v.is_infinite()).map(|_| CqlValue::Double(v))
        }
        ColumnType::Decimal => parse_decimal(s.trim()).map(CqlValue::Decimal),
        ColumnType::Boolean => match s.trim() {
            v if v.eq_ignore_ascii_case("true") => Ok(CqlValue::Boolean(true)),
            v if v.eq_ignore_ascii_case("false") => Ok(CqlValue::Boolean(false)),
            _ => Err(format!("'{}' is not a boolean", s)),
        },
        ColumnType::Blob => {
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .ok_or_else(|| format!("'{}' must be 0x-prefixed hex", s))?;
            hex::decode(digits)
                .map(CqlValue::Blob)
                .map_err(|e| parse_err(&e))
        }
        ColumnType::Uuid => Uuid::parse_str(s.trim())
            .map(CqlValue::Uuid)
            .map_err(|e| parse_err(&e)),
        ColumnType::TimeUuid => {
            let u = Uuid::parse_str(s.trim()).map_err(|e| parse_err(&e))?;
            if u.get_version_num() != 1 {
                return Err(format!("'{}' is not a version 1 uuid", s));
            }
            Ok(CqlValue::TimeUuid(u))
        }
        ColumnType::Timestamp => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Ok(CqlValue::Timestamp(ts.with_timezone(&Utc)));
            }
            let millis: i64 = s
                .parse()
                .map_err(|_| format!("'{}' is neither RFC 3339 nor epoch milliseconds", s))?;
            timestamp_from_millis(millis)
        }
        ColumnType::Date => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(CqlValue::Date)
            .map_err(|e| parse_err(&e)),
        ColumnType::Time => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f")
            .map(CqlValue::Time)
            .map_err(|e| parse_err(&e)),
        ColumnType::Inet => s
            .trim()
            .parse::<IpAddr>()
            .map(CqlValue::Inet)
            .map_err(|e| parse_err(&e)),
        ColumnType::Duration => parse_duration(s.trim()).map(CqlValue::Duration),
        ColumnType::List(_) | ColumnType::Set(_) | ColumnType::Map(_, _) | ColumnType::Tuple(_) => {
            let parsed: JsonValue =
                serde_json::from_str(s).map_err(|e| format!("'{}' is not a JSON literal: {}", s, e))?;
            if !(parsed.is_array() || parsed.is_object()) {
                return Err(format!("'{}' is not a collection literal", s));
            }
            from_json(ty, &parsed)
        }
        ColumnType::Frozen(inner) => from_str(inner, s),
    }
}

fn timestamp_from_millis(millis: i64) -> Conversion {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(CqlValue::Timestamp)
        .ok_or_else(|| format!("{} is out of the timestamp range", millis))
}

/// Infinity is accepted only when spelled out, not as the result of overflow.
fn check_float_range(s: &str, infinite: bool) -> std::result::Result<(), String> {
    let body = s.trim().trim_start_matches(['-', '+']);
    let explicit = body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity");
    if infinite && !explicit {
        return Err(format!("'{}' is out of range", s));
    }
    Ok(())
}

fn parse_varint(s: &str) -> std::result::Result<String, String> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not an integer", s));
    }
    let trimmed = digits.trim_start_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
    if s.starts_with('-') && trimmed != "0" {
        Ok(format!("-{}", trimmed))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_decimal(s: &str) -> std::result::Result<String, String> {
    let valid_chars = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'));
    match s.parse::<f64>() {
        Ok(v) if valid_chars && v.is_finite() => Ok(s.to_string()),
        _ => Err(format!("'{}' is not a decimal", s)),
    }
}

/// Accepts the CQL unit form (`1h30m`, `-2d`) and ISO 8601 (`P1DT2H`).
fn parse_duration(s: &str) -> std::result::Result<String, String> {
    let invalid = || format!("'{}' is not a duration", s);
    let body = s.strip_prefix('-').unwrap_or(s);

    if let Some(iso) = body.strip_prefix('P') {
        let ok = !iso.is_empty()
            && iso
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'Y' | b'M' | b'W' | b'D' | b'T' | b'H' | b'S'));
        return if ok { Ok(s.to_string()) } else { Err(invalid()) };
    }

    const UNITS: [&str; 11] = ["mo", "ms", "us", "µs", "ns", "y", "w", "d", "h", "m", "s"];
    let mut rest = body.to_ascii_lowercase();
    if rest.is_empty() {
        return Err(invalid());
    }
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(invalid());
        }
        rest.drain(..digits);
        let unit = UNITS
            .iter()
            .find(|u| rest.starts_with(**u))
            .ok_or_else(invalid)?;
        rest.drain(..unit.len());
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnKind;
    use serde_json::json;

    fn users() -> Table {
        Table::builder("ks", "users")
            .partition_key("id", ColumnType::Int)
            .column("name", ColumnType::Text)
            .column("age", ColumnType::Int)
            .column("tags", ColumnType::Set(Box::new(ColumnType::Text)))
            .column(
                "scores",
                ColumnType::Map(Box::new(ColumnType::Text), Box::new(ColumnType::Double)),
            )
            .column("avatar", ColumnType::Blob)
            .column("seen", ColumnType::Timestamp)
            .build()
            .unwrap()
    }

    #[test]
    fn test_convert_scalars() {
        let table = users();
        let conv = Converter::new(&table);

        let age = conv.convert("age", &json!("42")).unwrap();
        assert_eq!(age.value(), &CqlValue::Int(42));
        assert_eq!(age.column_type(), &ColumnType::Int);

        let age = conv.convert("age", &json!(42)).unwrap();
        assert_eq!(age.value(), &CqlValue::Int(42));

        let name = conv.convert("name", &json!("O'Brien")).unwrap();
        assert_eq!(name.to_string(), "'O''Brien'");
    }

    #[test]
    fn test_type_mismatch() {
        let table = users();
        let conv = Converter::new(&table);

        match conv.convert("age", &json!("not-a-number")) {
            Err(Error::TypeMismatch { column, expected, .. }) => {
                assert_eq!(column, "age");
                assert_eq!(expected, "int");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
        assert!(conv.convert("age", &json!(1.5)).is_err());
        assert!(conv.convert("age", &json!(true)).is_err());
        assert!(conv.convert("age", &json!(i64::MAX)).is_err());
        assert!(conv.convert("name", &json!(7)).is_err());
    }

    #[test]
    fn test_unknown_column() {
        let table = users();
        let conv = Converter::new(&table);
        assert!(matches!(
            conv.convert("email", &json!("x")),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_null_handling() {
        let table = users();
        let conv = Converter::new(&table);

        assert!(conv.convert("name", &json!(null)).unwrap().is_null());
        assert!(matches!(
            conv.convert("id", &json!(null)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(conv.convert("tags", &json!(["a", null])).is_err());
    }

    #[test]
    fn test_collections() {
        let table = users();
        let conv = Converter::new(&table);

        let tags = conv.convert("tags", &json!(["a", "b"])).unwrap();
        assert_eq!(tags.to_string(), "{'a', 'b'}");

        let tags = conv.convert("tags", &json!("[\"x\"]")).unwrap();
        assert_eq!(
            tags.value(),
            &CqlValue::Set(vec![CqlValue::Text("x".to_string())])
        );

        let scores = conv.convert("scores", &json!({"math": 9.5})).unwrap();
        assert_eq!(scores.to_string(), "{'math': 9.5}");

        assert!(conv.convert("scores", &json!({"math": "high"})).is_err());
        assert!(conv.convert("tags", &json!("plain")).is_err());
    }

    #[test]
    fn test_blob_and_timestamp() {
        let table = users();
        let conv = Converter::new(&table);

        let blob = conv.convert("avatar", &json!("0xCAFE")).unwrap();
        assert_eq!(blob.value(), &CqlValue::Blob(vec![0xca, 0xfe]));
        assert_eq!(blob.to_string(), "0xcafe");
        assert!(conv.convert("avatar", &json!("cafe")).is_err());

        let ts = conv.convert("seen", &json!("2024-01-02T03:04:05Z")).unwrap();
        assert_eq!(ts.to_string(), "'2024-01-02T03:04:05.000Z'");
        let ts = conv.convert("seen", &json!(0)).unwrap();
        assert_eq!(ts.to_string(), "'1970-01-01T00:00:00.000Z'");
        assert!(conv.convert("seen", &json!("yesterday")).is_err());
    }

    #[test]
    fn test_path_segment_predicate() {
        let table = users();
        let conv = Converter::new(&table);
        let id = table.column("id").unwrap();

        let predicate = conv.convert_path_segment("7", id).unwrap();
        assert_eq!(predicate.column(), "id");
        assert_eq!(predicate.operator(), Operator::Eq);
        assert_eq!(predicate.value().value(), &CqlValue::Int(7));

        assert!(conv.convert_path_segment("seven", id).is_err());
    }

    #[test]
    fn test_misc_types() {
        let col = |ty: ColumnType| Column::new("c", ty, ColumnKind::Regular);

        let v = convert_value(&col(ColumnType::Varint), &json!("-000123")).unwrap();
        assert_eq!(v.value(), &CqlValue::Varint("-123".to_string()));
        assert!(convert_value(&col(ColumnType::Varint), &json!("12a")).is_err());

        assert!(convert_value(&col(ColumnType::Decimal), &json!("12.50")).is_ok());
        assert!(convert_value(&col(ColumnType::Decimal), &json!("NaN")).is_err());

        assert!(convert_value(&col(ColumnType::Duration), &json!("1h30m")).is_ok());
        assert!(convert_value(&col(ColumnType::Duration), &json!("P1DT2H")).is_ok());
        assert!(convert_value(&col(ColumnType::Duration), &json!("90 minutes")).is_err());

        assert!(convert_value(&col(ColumnType::Inet), &json!("::1")).is_ok());
        assert!(convert_value(&col(ColumnType::Date), &json!("2024-02-30")).is_err());
        assert!(convert_value(&col(ColumnType::Time), &json!("12:30:00.5")).is_ok());
        assert!(convert_value(&col(ColumnType::Boolean), &json!("TRUE")).is_ok());
        assert!(convert_value(&col(ColumnType::Ascii), &json!("héllo")).is_err());

        let v4 = "550e8400-e29b-41d4-a716-446655440000";
        assert!(convert_value(&col(ColumnType::Uuid), &json!(v4)).is_ok());
        assert!(convert_value(&col(ColumnType::TimeUuid), &json!(v4)).is_err());
        assert!(convert_value(
            &col(ColumnType::TimeUuid),
            &json!("c0a8b0f4-1dd2-11ef-9262-0242ac120002")
        )
        .is_ok());

        let tuple = ColumnType::Tuple(vec![ColumnType::Int, ColumnType::Text]);
        assert_eq!(
            convert_value(&col(tuple.clone()), &json!([1, "a"]))
                .unwrap()
                .to_string(),
            "(1, 'a')"
        );
        assert!(convert_value(&col(tuple), &json!([1])).is_err());
    }

    #[test]
    fn test_float_overflow_is_rejected() {
        let float = Column::new("f", ColumnType::Float, ColumnKind::Regular);
        let double = Column::new("d", ColumnType::Double, ColumnKind::Regular);

        assert!(matches!(
            convert_value(&float, &json!(1e300)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            convert_value(&float, &json!("1e300")),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            convert_value(&double, &json!("1e400")),
            Err(Error::TypeMismatch { .. })
        ));

        assert_eq!(
            convert_value(&float, &json!(1.5)).unwrap().value(),
            &CqlValue::Float(1.5)
        );
        assert_eq!(
            convert_value(&double, &json!("1e300")).unwrap().value(),
            &CqlValue::Double(1e300)
        );
        assert_eq!(
            convert_value(&float, &json!("-Infinity")).unwrap().value(),
            &CqlValue::Float(f32::NEG_INFINITY)
        );
        assert!(convert_value(&double, &json!("NaN")).is_ok());
    }

    #[test]
    fn test_convert_row_keeps_order() {
        let table = users();
        let conv = Converter::new(&table);
        let row = json!({"name": "Ann", "id": 1, "age": "30"});
        let converted = conv.convert_row(row.as_object().unwrap()).unwrap();
        let names: Vec<&str> = converted.iter().map(|(c, _)| c.name()).collect();
        assert_eq!(names, vec!["name", "id", "age"]);
    }
}
