/// Input validation for untrusted request data
///
/// Every check here runs before the schema provider is consulted, so
/// oversized or malformed requests are rejected without touching storage.
use crate::config::RequestLimits;
use rowgate_core::error::{Error, Result};

/// Maximum length of a keyspace or table name
pub const MAX_NAME_LENGTH: usize = 48;

/// Maximum length of a column name
pub const MAX_COLUMN_NAME_LENGTH: usize = u16::MAX as usize;

/// Validates a keyspace or table name
///
/// # Security
///
/// - Prevents empty names
/// - Prevents names longer than the engine accepts
/// - Prevents null bytes
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    check_name(kind, name, MAX_NAME_LENGTH)
}

/// Validates a column name
///
/// Column names are not bound by the keyspace and table limit; only the
/// identifier length the engine can store applies.
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_column_name(name: &str) -> Result<()> {
    check_name("Column", name, MAX_COLUMN_NAME_LENGTH)
}

fn check_name(kind: &str, name: &str, max: usize) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(format!("{} name cannot be empty", kind)));
    }

    if name.len() > max {
        return Err(Error::InvalidInput(format!(
            "{} name length {} exceeds maximum {}",
            kind,
            name.len(),
            max
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidInput(format!(
            "{} name cannot contain null bytes",
            kind
        )));
    }

    Ok(())
}

/// Validates row path segments
///
/// # Security
///
/// - Bounds the number of segments
/// - Bounds each segment's length
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_path<S: AsRef<str>>(segments: &[S], limits: &RequestLimits) -> Result<()> {
    if segments.len() > limits.max_path_segments {
        return Err(Error::InvalidInput(format!(
            "Path has {} segments, maximum is {}",
            segments.len(),
            limits.max_path_segments
        )));
    }

    for segment in segments {
        let len = segment.as_ref().len();
        if len > limits.max_segment_len {
            return Err(Error::InvalidInput(format!(
                "Path segment length {} exceeds maximum {}",
                len, limits.max_segment_len
            )));
        }
    }

    Ok(())
}

/// Validates a JSON request body
///
/// # Security
///
/// - Prevents empty bodies
/// - Prevents oversized bodies to avoid OOM while parsing
///
/// # Errors
///
/// Returns Error::InvalidInput if validation fails
#[inline]
pub fn validate_payload(payload: &str, limits: &RequestLimits) -> Result<()> {
    if payload.trim().is_empty() {
        return Err(Error::InvalidInput("Request body cannot be empty".to_string()));
    }

    if payload.len() > limits.max_payload_len {
        return Err(Error::InvalidInput(format!(
            "Request body size {} exceeds maximum {}",
            payload.len(),
            limits.max_payload_len
        )));
    }

    Ok(())
}

/// Validates a `where` expression
///
/// # Errors
///
/// Returns Error::InvalidFilter if the expression is empty or too long
#[inline]
pub fn validate_filter(filter: &str, limits: &RequestLimits) -> Result<()> {
    if filter.trim().is_empty() {
        return Err(Error::InvalidFilter(
            "where parameter is required".to_string(),
        ));
    }

    if filter.len() > limits.max_filter_len {
        return Err(Error::InvalidFilter(format!(
            "where length {} exceeds maximum {}",
            filter.len(),
            limits.max_filter_len
        )));
    }

    Ok(())
}

/// Validates an encoded paging state
///
/// # Errors
///
/// Returns Error::InvalidPagingState if the state is too long
#[inline]
pub fn validate_paging_state(state: &str, limits: &RequestLimits) -> Result<()> {
    if state.len() > limits.max_paging_state_len {
        return Err(Error::InvalidPagingState(format!(
            "page-state length {} exceeds maximum {}",
            state.len(),
            limits.max_paging_state_len
        )));
    }

    Ok(())
}

/// Validates a column count (projection, drop list)
///
/// # Errors
///
/// Returns Error::InvalidInput if there are too many columns
#[inline]
pub fn validate_field_count(count: usize, limits: &RequestLimits) -> Result<()> {
    if count > limits.max_fields {
        return Err(Error::InvalidInput(format!(
            "{} columns requested, maximum is {}",
            count, limits.max_fields
        )));
    }

    Ok(())
}
