//! Pagination for the records table
//!
//! Pages are 1-indexed. `per_page` falls back to the dashboard's configured
//! table page size when the client does not send one.
//!
//! # Examples
//!
//! ```rust,ignore
//! let params = PaginationParams::new(Some(2), Some(20));
//! let rows = records.window(params.offset(10), params.per_page(10));
//! let meta = PaginationMetadata::new(params.page(), params.per_page(10), records.len());
//! ```

use serde::{Deserialize, Serialize};

use crate::config::MAX_TABLE_PAGE_SIZE;

/// Query string parameters of a paginated request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

impl PaginationParams {
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self { page, per_page }
    }

    /// Page number, defaulting to 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Items per page, defaulting to `default_per_page` and clamped to 1..=MAX_TABLE_PAGE_SIZE
    pub fn per_page(&self, default_per_page: usize) -> usize {
        self.per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_TABLE_PAGE_SIZE)
    }

    /// Index of the first item on the requested page
    pub fn offset(&self, default_per_page: usize) -> usize {
        (self.page() - 1).saturating_mul(self.per_page(default_per_page))
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.page == Some(0) {
            return Err("Page must be greater than 0");
        }
        if let Some(per_page) = self.per_page {
            if per_page == 0 || per_page > MAX_TABLE_PAGE_SIZE {
                return Err("Per page must be between 1 and 100");
            }
        }
        Ok(())
    }
}

/// Pagination metadata for response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let pages = total.div_ceil(per_page.max(1));

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}
