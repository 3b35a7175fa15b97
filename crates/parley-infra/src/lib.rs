//! Infrastructure implementations for Parley.
//!
//! SQLite repositories (sqlx, split read/write pools), bearer-token
//! authentication backed by the same database, and the HTTP client for
//! the remote completion service.

pub mod auth;
pub mod llm;
pub mod sqlite;
