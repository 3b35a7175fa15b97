//! SQLite user store.
//!
//! Users are created through the admin CLI, never through the chat API;
//! the core only ever reads them. There is deliberately no update or
//! delete surface here.

use parley_types::error::RepositoryError;
use parley_types::user::User;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed user persistence.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: DatabasePool,
}

impl SqliteUserStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Persist a new user. The email must be unique.
    pub async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO users (id, email, password_hash, is_active, is_superuser, is_verified, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.is_verified)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.message().contains("UNIQUE") => {
                RepositoryError::Conflict(format!("email '{}' already registered", user.email))
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        Ok(user.clone())
    }

    /// Get a user by id.
    pub async fn get(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Get a user by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }
}

pub(crate) fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let id =
        Uuid::parse_str(&id).map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let updated_at: String = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(User {
        id,
        email: row
            .try_get("email")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        is_active: row
            .try_get("is_active")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        is_superuser: row
            .try_get("is_superuser")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        is_verified: row
            .try_get("is_verified")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}
