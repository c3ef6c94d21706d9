//! Opaque paging state and page sizing.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use std::fmt;

/// Page size used when the client supplies none or a non-positive one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Resolves a client-requested page size.
pub fn resolve_page_size(requested: Option<i64>, default: u32) -> u32 {
    match requested {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => default,
    }
}

/// Resume position issued by the execution engine.
///
/// The bytes are never inspected here; they only travel between the engine
/// and the client, base64-encoded on the client side.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PagingState(Vec<u8>);

impl PagingState {
    /// Wraps raw bytes issued by the engine.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decodes the textual form received from a client.
    pub fn from_base64(text: &str) -> Result<Self> {
        BASE64
            .decode(text.trim())
            .map(Self)
            .map_err(|e| Error::InvalidPagingState(e.to_string()))
    }

    /// Encodes for a client.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Raw bytes for the engine.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the state.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for PagingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PagingState({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_round_trip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let state = PagingState::from_bytes(bytes.clone());
        let text = state.to_base64();
        let decoded = PagingState::from_base64(&text).unwrap();
        assert_eq!(decoded.as_bytes(), bytes.as_slice());
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            PagingState::from_base64("not base64!"),
            Err(Error::InvalidPagingState(_))
        ));
    }

    #[test]
    fn test_page_size_defaults() {
        assert_eq!(resolve_page_size(None, DEFAULT_PAGE_SIZE), 100);
        assert_eq!(resolve_page_size(Some(0), DEFAULT_PAGE_SIZE), 100);
        assert_eq!(resolve_page_size(Some(-5), DEFAULT_PAGE_SIZE), 100);
        assert_eq!(resolve_page_size(Some(25), DEFAULT_PAGE_SIZE), 25);
    }
}
