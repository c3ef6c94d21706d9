//! Sort specifications.

use crate::error::{Error, Result};
use crate::ident;
use crate::schema::Table;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending (default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "ASC"),
            Direction::Desc => write!(f, "DESC"),
        }
    }
}

/// Ordered list of sort columns; earlier entries take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SortSpec {
    entries: Vec<(String, Direction)>,
}

impl SortSpec {
    /// An empty spec (engine order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an ascending column.
    pub fn asc(self, column: impl Into<String>) -> Self {
        self.then(column, Direction::Asc)
    }

    /// Appends a descending column.
    pub fn desc(self, column: impl Into<String>) -> Self {
        self.then(column, Direction::Desc)
    }

    /// Appends a column with an explicit direction.
    pub fn then(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.entries.push((column.into(), direction));
        self
    }

    /// Parses `{"age":"desc","name":"asc"}`; key order is precedence.
    ///
    /// Directions are case-insensitive. An empty string counts as ascending.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::new());
        }
        let parsed: JsonValue =
            serde_json::from_str(text).map_err(|e| Error::InvalidSort(e.to_string()))?;
        let JsonValue::Object(map) = parsed else {
            return Err(Error::InvalidSort(
                "expected an object of column to direction".to_string(),
            ));
        };

        let mut spec = Self::new();
        for (column, direction) in map {
            let direction = match direction.as_str().map(str::to_ascii_lowercase).as_deref() {
                Some("asc") | Some("") => Direction::Asc,
                Some("desc") => Direction::Desc,
                _ => {
                    return Err(Error::InvalidSort(format!(
                        "invalid direction {} for '{}', expected \"asc\" or \"desc\"",
                        direction, column
                    )))
                }
            };
            spec = spec.then(column, direction);
        }
        Ok(spec)
    }

    /// Fails with [`Error::UnknownColumn`] for a column the table lacks.
    pub fn validate(&self, table: &Table) -> Result<()> {
        for (column, _) in &self.entries {
            table.require_column(column)?;
        }
        Ok(())
    }

    /// True when no ordering was requested.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in precedence order.
    pub fn entries(&self) -> &[(String, Direction)] {
        &self.entries
    }
}

/// Renders the `ORDER BY` list body, e.g. `age DESC, name ASC`.
impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (column, direction)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", ident::quote(column), direction)?;
        }
        Ok(())
    }
}
