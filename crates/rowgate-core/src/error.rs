//! Error types for Rowgate.

use std::fmt;

/// The main error type for Rowgate operations.
///
/// Every variant except [`Error::Execution`] and [`Error::TableNotFound`] is a
/// client-input failure raised while a statement is being built, before
/// anything reaches the execution layer.
#[derive(Debug)]
pub enum Error {
    /// A requested column or field does not exist on the table
    UnknownColumn {
        /// Table the lookup was made against
        table: String,
        /// Name supplied by the client
        column: String,
    },

    /// A raw value could not be converted to the column's declared type
    TypeMismatch {
        /// Target column
        column: String,
        /// Declared type, rendered in CQL spelling
        expected: String,
        /// Why the conversion failed
        reason: String,
    },

    /// Fewer path segments than partition key columns
    InsufficientKeyPath {
        /// Number of partition key columns of the table
        required: usize,
        /// Number of segments supplied
        supplied: usize,
    },

    /// More path segments than primary key columns
    TooManyKeySegments {
        /// Number of primary key columns of the table
        max: usize,
        /// Number of segments supplied
        supplied: usize,
    },

    /// Schema mutation request that cannot be built
    InvalidMutation(String),

    /// Paging state could not be decoded
    InvalidPagingState(String),

    /// Malformed filter expression
    InvalidFilter(String),

    /// Malformed sort specification
    InvalidSort(String),

    /// Any other malformed request input
    InvalidInput(String),

    /// The schema provider has no such table
    TableNotFound {
        /// Keyspace of the lookup
        keyspace: String,
        /// Table of the lookup
        table: String,
    },

    /// Opaque failure from the execution layer
    Execution {
        /// Status assigned by the execution layer, if any
        status: Option<u16>,
        /// Underlying failure
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wraps an execution-layer failure without reinterpreting it.
    pub fn execution<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Execution {
            status: None,
            source: err.into(),
        }
    }

    /// Wraps an execution-layer failure that carries its own status code.
    pub fn execution_with_status<E>(status: u16, err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Execution {
            status: Some(status),
            source: err.into(),
        }
    }

    /// Returns true when the failure was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Execution { .. })
    }

    /// HTTP-equivalent status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::TableNotFound { .. } => 404,
            Error::Execution { status, .. } => status.unwrap_or(500),
            _ => 400,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownColumn { table, column } => {
                write!(f, "Unknown field name '{}' in table '{}'", column, table)
            }
            Error::TypeMismatch {
                column,
                expected,
                reason,
            } => write!(
                f,
                "Invalid value for column '{}' of type {}: {}",
                column, expected, reason
            ),
            Error::InsufficientKeyPath { required, .. } => write!(
                f,
                "Invalid number of key values required ({}). All partition key columns values \
                 are required plus 0..all clustering columns values in proper order.",
                required
            ),
            Error::TooManyKeySegments { max, supplied } => write!(
                f,
                "Too many key values provided ({}), the primary key has {} columns",
                supplied, max
            ),
            Error::InvalidMutation(msg) => write!(f, "Invalid schema mutation: {}", msg),
            Error::InvalidPagingState(msg) => write!(f, "Invalid page state: {}", msg),
            Error::InvalidFilter(msg) => write!(f, "Invalid where clause: {}", msg),
            Error::InvalidSort(msg) => write!(f, "Invalid sort: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::TableNotFound { keyspace, table } => {
                write!(f, "Table '{}' not found in keyspace '{}'", table, keyspace)
            }
            Error::Execution { source, .. } => write!(f, "Execution error: {}", source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Execution { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(format!("malformed JSON: {}", err))
    }
}

/// A specialized `Result` type for Rowgate operations.
pub type Result<T> = std::result::Result<T, Error>;
