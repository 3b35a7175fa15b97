//! SQLite-backed persistence.
//!
//! All repositories share the split read/write `DatabasePool` and store
//! timestamps as RFC3339 strings.

pub mod chat;
pub mod message;
pub mod pool;
pub mod user;

#[cfg(test)]
pub(crate) mod test_util;

use chrono::{DateTime, Utc};
use parley_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
