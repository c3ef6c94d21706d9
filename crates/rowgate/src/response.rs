//! Response models returned by [`RowsService`](crate::RowsService).
//!
//! All of them serialize to the JSON shapes clients see.

use rowgate_core::{Error, RowMap};
use serde::{Deserialize, Serialize};

/// Wrapped read result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    /// Number of rows in `data`
    pub count: usize,
    /// Base64 paging state to request the next page with; absent on the
    /// last page
    #[serde(rename = "pageState", skip_serializing_if = "Option::is_none", default)]
    pub page_state: Option<String>,
    /// Rows of this page
    pub data: Vec<RowMap>,
}

impl GetResponse {
    /// Wraps a page of rows.
    pub fn new(data: Vec<RowMap>, page_state: Option<String>) -> Self {
        Self {
            count: data.len(),
            page_state,
            data,
        }
    }
}

/// Wrapper for non-read payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseWrapper<T> {
    /// Payload
    pub data: T,
}

/// Result of a read.
///
/// `raw` requests get the bare row list; everything else gets a
/// [`GetResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowsResponse {
    /// `{count, pageState, data}`
    Wrapped(GetResponse),
    /// Bare rows
    Raw(Vec<RowMap>),
}

impl RowsResponse {
    /// Rows regardless of shape.
    pub fn rows(&self) -> &[RowMap] {
        match self {
            RowsResponse::Wrapped(response) => &response.data,
            RowsResponse::Raw(rows) => rows,
        }
    }

    /// Next paging state; raw responses never carry one.
    pub fn page_state(&self) -> Option<&str> {
        match self {
            RowsResponse::Wrapped(response) => response.page_state.as_deref(),
            RowsResponse::Raw(_) => None,
        }
    }
}

/// Result of an update: the applied field map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateResponse {
    /// `{data: {...}}`
    Wrapped(ResponseWrapper<RowMap>),
    /// Bare field map
    Raw(RowMap),
}

impl UpdateResponse {
    /// Applied fields regardless of shape.
    pub fn fields(&self) -> &RowMap {
        match self {
            UpdateResponse::Wrapped(wrapper) => &wrapper.data,
            UpdateResponse::Raw(fields) => fields,
        }
    }
}

/// Error body sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message
    pub description: String,
    /// HTTP-style status code
    pub code: u16,
}

impl ApiError {
    /// Builds an error body.
    pub fn new(description: impl Into<String>, code: u16) -> Self {
        Self {
            description: description.into(),
            code,
        }
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        let description = if err.is_client_error() {
            err.to_string()
        } else {
            match err {
                Error::Execution { source, .. } => source.to_string(),
                other => other.to_string(),
            }
        };
        ApiError::new(description, err.status_code())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::from(&err)
    }
}
