use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Pagination metadata returned next to a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Pagination {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }
}

/// `ceil(total / limit)`; zero when there is nothing to page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Rows to skip for `page`. Saturates instead of overflowing, so an absurd
/// page number just lands past the last row.
pub fn offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(0))
}

/// Clamp user-supplied paging values into the accepted range.
pub fn normalize(page: i64, limit: i64) -> (i64, i64) {
    (page.max(1), limit.clamp(1, MAX_LIMIT))
}
