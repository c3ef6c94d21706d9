//! Schema metadata view.
//!
//! A read-only snapshot of one table: its columns, their declared types and
//! the role each column plays in the primary key. Instances are supplied by
//! the schema provider for every request and are never mutated here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Declared type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    /// US-ASCII string
    Ascii,
    /// UTF-8 string (`text` / `varchar`)
    Text,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// 64-bit distributed counter
    Counter,
    /// Arbitrary-precision integer
    Varint,
    /// 32-bit IEEE-754 float
    Float,
    /// 64-bit IEEE-754 float
    Double,
    /// Arbitrary-precision decimal
    Decimal,
    /// Boolean
    Boolean,
    /// Arbitrary bytes
    Blob,
    /// Any UUID
    Uuid,
    /// Version 1 UUID
    TimeUuid,
    /// Millisecond-precision instant
    Timestamp,
    /// Calendar date without time zone
    Date,
    /// Time of day with nanosecond precision
    Time,
    /// IPv4 or IPv6 address
    Inet,
    /// Duration in months, days and nanoseconds
    Duration,
    /// Ordered collection
    List(Box<ColumnType>),
    /// Unordered collection of unique elements
    Set(Box<ColumnType>),
    /// Key/value collection
    Map(Box<ColumnType>, Box<ColumnType>),
    /// Fixed-length heterogeneous sequence
    Tuple(Vec<ColumnType>),
    /// Frozen (serialized as a single cell) wrapper
    Frozen(Box<ColumnType>),
}

impl ColumnType {
    /// Strips any `frozen<>` wrapper.
    pub fn unfrozen(&self) -> &ColumnType {
        match self {
            ColumnType::Frozen(inner) => inner.unfrozen(),
            other => other,
        }
    }

    /// True for list, set and map (frozen or not).
    pub fn is_collection(&self) -> bool {
        matches!(
            self.unfrozen(),
            ColumnType::List(_) | ColumnType::Set(_) | ColumnType::Map(_, _)
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Ascii => write!(f, "ascii"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::TinyInt => write!(f, "tinyint"),
            ColumnType::SmallInt => write!(f, "smallint"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::BigInt => write!(f, "bigint"),
            ColumnType::Counter => write!(f, "counter"),
            ColumnType::Varint => write!(f, "varint"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Decimal => write!(f, "decimal"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Blob => write!(f, "blob"),
            ColumnType::Uuid => write!(f, "uuid"),
            ColumnType::TimeUuid => write!(f, "timeuuid"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Time => write!(f, "time"),
            ColumnType::Inet => write!(f, "inet"),
            ColumnType::Duration => write!(f, "duration"),
            ColumnType::List(elem) => write!(f, "list<{}>", elem),
            ColumnType::Set(elem) => write!(f, "set<{}>", elem),
            ColumnType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            ColumnType::Tuple(types) => {
                write!(f, "tuple<")?;
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                write!(f, ">")
            }
            ColumnType::Frozen(inner) => write!(f, "frozen<{}>", inner),
        }
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(open) = s.find('<') else {
            return parse_simple_type(s);
        };
        if !s.ends_with('>') {
            return Err(Error::InvalidInput(format!("unterminated type '{}'", s)));
        }
        let name = s[..open].trim().to_ascii_lowercase();
        let args = split_type_args(&s[open + 1..s.len() - 1])?;

        let one = |args: Vec<ColumnType>| -> Result<Box<ColumnType>> {
            match <[ColumnType; 1]>::try_from(args) {
                Ok([ty]) => Ok(Box::new(ty)),
                Err(_) => Err(Error::InvalidInput(format!(
                    "'{}' takes exactly one type argument",
                    name
                ))),
            }
        };

        match name.as_str() {
            "list" => Ok(ColumnType::List(one(args)?)),
            "set" => Ok(ColumnType::Set(one(args)?)),
            "frozen" => Ok(ColumnType::Frozen(one(args)?)),
            "map" => match <[ColumnType; 2]>::try_from(args) {
                Ok([key, value]) => Ok(ColumnType::Map(Box::new(key), Box::new(value))),
                Err(_) => Err(Error::InvalidInput(
                    "'map' takes exactly two type arguments".to_string(),
                )),
            },
            "tuple" if !args.is_empty() => Ok(ColumnType::Tuple(args)),
            _ => Err(Error::InvalidInput(format!("unsupported type '{}'", s))),
        }
    }
}

fn parse_simple_type(s: &str) -> Result<ColumnType> {
    let ty = match s.to_ascii_lowercase().as_str() {
        "ascii" => ColumnType::Ascii,
        "text" | "varchar" => ColumnType::Text,
        "tinyint" => ColumnType::TinyInt,
        "smallint" => ColumnType::SmallInt,
        "int" => ColumnType::Int,
        "bigint" => ColumnType::BigInt,
        "counter" => ColumnType::Counter,
        "varint" => ColumnType::Varint,
        "float" => ColumnType::Float,
        "double" => ColumnType::Double,
        "decimal" => ColumnType::Decimal,
        "boolean" => ColumnType::Boolean,
        "blob" => ColumnType::Blob,
        "uuid" => ColumnType::Uuid,
        "timeuuid" => ColumnType::TimeUuid,
        "timestamp" => ColumnType::Timestamp,
        "date" => ColumnType::Date,
        "time" => ColumnType::Time,
        "inet" => ColumnType::Inet,
        "duration" => ColumnType::Duration,
        _ => return Err(Error::InvalidInput(format!("unsupported type '{}'", s))),
    };
    Ok(ty)
}

/// Splits `a, map<b, c>, d` on top-level commas and parses each part.
fn split_type_args(inner: &str) -> Result<Vec<ColumnType>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::InvalidInput(format!("unbalanced type '{}'", inner)))?;
            }
            ',' if depth == 0 => {
                args.push(inner[start..i].parse()?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Error::InvalidInput(format!("unbalanced type '{}'", inner)));
    }
    args.push(inner[start..].parse()?);
    Ok(args)
}

impl TryFrom<String> for ColumnType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.to_string()
    }
}

/// Role of a column in the table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Part of the partition key
    PartitionKey,
    /// Part of the clustering key
    Clustering,
    /// Static column shared by a partition
    Static,
    /// Any other column
    #[default]
    Regular,
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(default)]
    kind: ColumnKind,
}

impl Column {
    /// Creates a column description.
    pub fn new(name: impl Into<String>, column_type: ColumnType, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            column_type,
            kind,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// Primary key role.
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// True for partition key and clustering columns.
    pub fn is_primary_key(&self) -> bool {
        matches!(self.kind, ColumnKind::PartitionKey | ColumnKind::Clustering)
    }
}

/// Serialized shape of a [`Table`], validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableDef {
    keyspace: String,
    name: String,
    columns: Vec<Column>,
}

/// Metadata for one table.
///
/// The partition key is never empty and column names are unique; both are
/// checked when the table is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableDef", into = "TableDef")]
pub struct Table {
    keyspace: String,
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table from its columns in declaration order.
    pub fn new(
        keyspace: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let table = Self {
            keyspace: keyspace.into(),
            name: name.into(),
            columns,
        };

        let mut seen = HashSet::new();
        for column in &table.columns {
            if !seen.insert(column.name()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate column '{}' in table '{}'",
                    column.name(),
                    table.name
                )));
            }
        }
        if table.partition_key_columns().next().is_none() {
            return Err(Error::InvalidInput(format!(
                "table '{}' has no partition key",
                table.name
            )));
        }
        table.check_counters()?;

        Ok(table)
    }

    /// Counter tables hold only counters outside the primary key.
    fn check_counters(&self) -> Result<()> {
        if let Some(key) = self
            .columns
            .iter()
            .find(|c| c.is_primary_key() && c.column_type().unfrozen() == &ColumnType::Counter)
        {
            return Err(Error::InvalidInput(format!(
                "primary key column '{}' of table '{}' cannot be a counter",
                key.name(),
                self.name
            )));
        }

        let is_counter = |c: &&Column| c.column_type() == &ColumnType::Counter;
        let mut values = self.columns.iter().filter(|c| !c.is_primary_key());
        if values.clone().any(|c| is_counter(&c)) {
            if let Some(other) = values.find(|c| !is_counter(c)) {
                return Err(Error::InvalidInput(format!(
                    "table '{}' mixes counter and non-counter column '{}'",
                    self.name,
                    other.name()
                )));
            }
        }
        Ok(())
    }

    /// Starts a [`TableBuilder`].
    pub fn builder(keyspace: impl Into<String>, name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            keyspace: keyspace.into(),
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Keyspace the table belongs to.
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a column, failing with [`Error::UnknownColumn`].
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| Error::UnknownColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Partition key columns in declaration order.
    pub fn partition_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::PartitionKey)
    }

    /// Clustering columns in declaration order.
    pub fn clustering_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Clustering)
    }

    /// Partition key columns followed by clustering columns.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.partition_key_columns()
            .chain(self.clustering_columns())
            .collect()
    }

    /// Number of partition key columns.
    pub fn partition_key_len(&self) -> usize {
        self.partition_key_columns().count()
    }
}

impl TryFrom<TableDef> for Table {
    type Error = Error;

    fn try_from(def: TableDef) -> Result<Self> {
        Table::new(def.keyspace, def.name, def.columns)
    }
}

impl From<Table> for TableDef {
    fn from(table: Table) -> Self {
        TableDef {
            keyspace: table.keyspace,
            name: table.name,
            columns: table.columns,
        }
    }
}

/// Fluent constructor for [`Table`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    keyspace: String,
    name: String,
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Adds a partition key column.
    pub fn partition_key(self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.with(name, ty, ColumnKind::PartitionKey)
    }

    /// Adds a clustering column.
    pub fn clustering(self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.with(name, ty, ColumnKind::Clustering)
    }

    /// Adds a static column.
    pub fn static_column(self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.with(name, ty, ColumnKind::Static)
    }

    /// Adds a regular column.
    pub fn column(self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.with(name, ty, ColumnKind::Regular)
    }

    fn with(mut self, name: impl Into<String>, ty: ColumnType, kind: ColumnKind) -> Self {
        self.columns.push(Column::new(name, ty, kind));
        self
    }

    /// Validates and returns the table.
    pub fn build(self) -> Result<Table> {
        Table::new(self.keyspace, self.name, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Table {
        Table::builder("ks", "events")
            .column("payload", ColumnType::Text)
            .clustering("ts", ColumnType::Timestamp)
            .partition_key("tenant", ColumnType::Text)
            .clustering("seq", ColumnType::Int)
            .partition_key("day", ColumnType::Date)
            .build()
            .unwrap()
    }

    #[test]
    fn test_primary_key_order() {
        let table = events();
        let names: Vec<&str> = table.primary_key_columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["tenant", "day", "ts", "seq"]);
        assert_eq!(table.partition_key_len(), 2);
    }

    #[test]
    fn test_partition_key_required() {
        let result = Table::builder("ks", "bad")
            .column("a", ColumnType::Int)
            .build();
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = Table::builder("ks", "bad")
            .partition_key("a", ColumnType::Int)
            .column("a", ColumnType::Text)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_counter_tables() {
        let counters = Table::builder("ks", "page_views")
            .partition_key("page", ColumnType::Text)
            .column("views", ColumnType::Counter)
            .column("shares", ColumnType::Counter)
            .build();
        assert!(counters.is_ok());

        let mixed = Table::builder("ks", "pages")
            .partition_key("page", ColumnType::Text)
            .column("views", ColumnType::Counter)
            .column("title", ColumnType::Text)
            .build();
        assert!(matches!(mixed, Err(Error::InvalidInput(_))));

        let counter_key = Table::builder("ks", "pages")
            .partition_key("views", ColumnType::Counter)
            .build();
        assert!(matches!(counter_key, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_require_column() {
        let table = events();
        assert!(table.require_column("payload").is_ok());
        match table.require_column("missing") {
            Err(Error::UnknownColumn { column, table }) => {
                assert_eq!(column, "missing");
                assert_eq!(table, "events");
            }
            other => panic!("Expected UnknownColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_types() {
        assert_eq!("INT".parse::<ColumnType>().unwrap(), ColumnType::Int);
        assert_eq!("varchar".parse::<ColumnType>().unwrap(), ColumnType::Text);
        assert_eq!(
            "map<text, frozen<list<int>>>".parse::<ColumnType>().unwrap(),
            ColumnType::Map(
                Box::new(ColumnType::Text),
                Box::new(ColumnType::Frozen(Box::new(ColumnType::List(Box::new(
                    ColumnType::Int
                )))))
            )
        );
        assert_eq!(
            "tuple<int, text>".parse::<ColumnType>().unwrap().to_string(),
            "tuple<int, text>"
        );
        assert!("list<int, int>".parse::<ColumnType>().is_err());
        assert!("map<text>".parse::<ColumnType>().is_err());
        assert!("list<int".parse::<ColumnType>().is_err());
        assert!("geometry".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "keyspace": "ks",
            "name": "users",
            "columns": [
                {"name": "id", "type": "int", "kind": "partition_key"},
                {"name": "tags", "type": "set<text>"}
            ]
        }"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert_eq!(table.partition_key_len(), 1);
        assert_eq!(
            table.column("tags").unwrap().column_type(),
            &ColumnType::Set(Box::new(ColumnType::Text))
        );
        assert_eq!(table.column("tags").unwrap().kind(), ColumnKind::Regular);

        let no_key = r#"{"keyspace": "ks", "name": "t", "columns": [{"name": "a", "type": "int"}]}"#;
        assert!(serde_json::from_str::<Table>(no_key).is_err());
    }
}
