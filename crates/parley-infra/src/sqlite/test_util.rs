//! Shared fixtures for the SQLite repository tests.

use chrono::Utc;
use uuid::Uuid;

use super::pool::DatabasePool;

/// A pool over a fresh temporary database file.
pub(crate) async fn test_pool() -> DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    // Leak the tempdir so it outlives the test body
    std::mem::forget(dir);
    DatabasePool::new(&url).await.unwrap()
}

/// Insert a user row (needed for foreign keys) and return its id.
pub(crate) async fn seed_user(pool: &DatabasePool, email: &str) -> Uuid {
    let id = Uuid::now_v7();
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"INSERT INTO users (id, email, password_hash, is_active, is_superuser, is_verified, created_at, updated_at)
           VALUES (?, ?, ?, 1, 0, 0, ?, ?)"#,
    )
    .bind(id.to_string())
    .bind(email)
    .bind("unused-hash")
    .bind(&now)
    .bind(&now)
    .execute(&pool.writer)
    .await
    .unwrap();
    id
}
