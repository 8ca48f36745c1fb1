//! Offset pagination with clamped page parameters.

use serde::Deserialize;

/// Upper bound on page size for every list endpoint.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for document listings.
pub const DEFAULT_DOCUMENT_PAGE_SIZE: i64 = 10;

/// Default page size for comment listings.
pub const DEFAULT_COMMENT_PAGE_SIZE: i64 = 20;

/// A requested page, as received from a caller.
///
/// Use [`PageRequest::clamped`] before querying: pages below 1 become 1 and
/// the page size is held to `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Normalize page and page size into their valid ranges.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset for this page. Assumes a clamped request.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Number of pages needed to hold `total` rows (`ceil(total / page_size)`).
///
/// Zero rows yields zero pages.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}
