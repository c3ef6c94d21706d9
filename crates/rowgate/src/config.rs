//! Service configuration
//!
//! Paging defaults and the per-request limits applied before any schema
//! lookup happens.

use rowgate_core::DEFAULT_PAGE_SIZE;

/// Upper bounds on untrusted request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLimits {
    /// Maximum number of key segments in a row path
    pub max_path_segments: usize,
    /// Maximum byte length of one path segment
    pub max_segment_len: usize,
    /// Maximum byte length of a JSON request body
    pub max_payload_len: usize,
    /// Maximum byte length of a `where` expression
    pub max_filter_len: usize,
    /// Maximum byte length of a base64 paging state
    pub max_paging_state_len: usize,
    /// Maximum number of projected or dropped columns
    pub max_fields: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_path_segments: 64,
            max_segment_len: 64 * 1024,       // 64 KB
            max_payload_len: 4 * 1024 * 1024, // 4 MB
            max_filter_len: 64 * 1024,        // 64 KB
            max_paging_state_len: 16 * 1024,  // 16 KB
            max_fields: 1024,
        }
    }
}

impl RequestLimits {
    /// Set the maximum number of path segments
    pub fn with_max_path_segments(mut self, max: usize) -> Self {
        self.max_path_segments = max;
        self
    }

    /// Set the maximum path segment length
    pub fn with_max_segment_len(mut self, max: usize) -> Self {
        self.max_segment_len = max;
        self
    }

    /// Set the maximum request body length
    pub fn with_max_payload_len(mut self, max: usize) -> Self {
        self.max_payload_len = max;
        self
    }

    /// Set the maximum filter expression length
    pub fn with_max_filter_len(mut self, max: usize) -> Self {
        self.max_filter_len = max;
        self
    }

    /// Set the maximum encoded paging state length
    pub fn with_max_paging_state_len(mut self, max: usize) -> Self {
        self.max_paging_state_len = max;
        self
    }

    /// Set the maximum number of columns per request
    pub fn with_max_fields(mut self, max: usize) -> Self {
        self.max_fields = max;
        self
    }
}

/// Configuration for [`RowsService`](crate::RowsService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Page size used when a read does not ask for a positive one
    pub default_page_size: u32,
    /// Requested page sizes are clamped to this
    pub max_page_size: u32,
    /// Input limits
    pub limits: RequestLimits,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 10_000,
            limits: RequestLimits::default(),
        }
    }
}

impl ServiceConfig {
    /// Set the default page size
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the page size ceiling
    pub fn with_max_page_size(mut self, size: u32) -> Self {
        self.max_page_size = size;
        self
    }

    /// Replace the request limits
    pub fn with_limits(mut self, limits: RequestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolves the page size for a read.
    ///
    /// Absent or non-positive requests get the default; everything is
    /// clamped to `max_page_size`.
    pub fn page_size_for(&self, requested: Option<i64>) -> u32 {
        rowgate_core::resolve_page_size(requested, self.default_page_size)
            .min(self.max_page_size)
            .max(1)
    }
}
