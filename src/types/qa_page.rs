use serde::{Deserialize, Serialize};

use crate::types::QaPair;

/// Number of records the backend returns per listing page.
pub const PAGE_SIZE: u64 = 10;

/// One page of the paginated question/answer listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QaPage {
    /// Records on this page.
    pub results: Vec<QaPair>,

    /// Total number of records matching the query, across all pages.
    pub count: u64,
}

/// Query parameters of a listing request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageQuery {
    /// One-based page number.
    pub page: u64,

    /// Free-text filter; empty matches everything.
    pub search: String,
}

impl PageQuery {
    /// Create a new `PageQuery`.
    pub fn new(page: u64, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            search: search.into(),
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, "")
    }
}

/// Number of pages needed to show `count` records.
pub fn total_pages(count: u64) -> u64 {
    count.div_ceil(PAGE_SIZE)
}
