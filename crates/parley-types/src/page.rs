//! Offset/limit pagination with a fixed clamping policy.
//!
//! Out-of-range values are clamped rather than rejected: a negative skip
//! becomes 0, a limit below 1 becomes 1, a limit above the maximum becomes
//! the maximum. The repository layer can therefore accept any `Page`
//! without further validation.

use serde::{Deserialize, Serialize};

/// Default number of records per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Upper bound on `limit` for list endpoints.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Upper bound on `limit` for the latest-messages endpoint.
pub const MAX_LATEST_LIMIT: i64 = 100;

/// A clamped offset/limit window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    skip: i64,
    limit: i64,
}

impl Page {
    /// Build a page, clamping `skip` to `>= 0` and `limit` to `1..=MAX_PAGE_LIMIT`.
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

/// Clamp a latest-messages limit to `1..=MAX_LATEST_LIMIT`.
pub fn clamp_latest_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LATEST_LIMIT)
}
