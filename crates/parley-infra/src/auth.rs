//! Bearer-token authentication and credential hashing.
//!
//! Tokens are random 32-byte values presented as `parley_<hex>`; only the
//! SHA-256 hash is stored, in the `access_tokens` table, with an expiry
//! derived from the configured lifetime. Passwords are hashed with
//! argon2id. Issuance happens through the admin CLI; the HTTP layer only
//! ever validates.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use parley_types::error::RepositoryError;
use parley_types::user::User;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::sqlite::pool::DatabasePool;
use crate::sqlite::user::user_from_row;

/// Compute the SHA-256 hash of a bearer token (lowercase hex).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Issues and validates bearer tokens against the database.
#[derive(Clone)]
pub struct TokenAuthenticator {
    pool: DatabasePool,
    lifetime: std::time::Duration,
}

impl TokenAuthenticator {
    pub fn new(pool: DatabasePool, lifetime: std::time::Duration) -> Self {
        Self { pool, lifetime }
    }

    /// Mint a token for a user and store its hash. Returns the plaintext
    /// token -- shown once, never recoverable afterwards.
    pub async fn issue(&self, user_id: &Uuid) -> Result<String, RepositoryError> {
        let mut token_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut token_bytes);
        let token = format!(
            "parley_{}",
            token_bytes
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<String>()
        );

        let now = Utc::now();
        let lifetime = Duration::from_std(self.lifetime)
            .map_err(|e| RepositoryError::Query(format!("invalid token lifetime: {e}")))?;

        sqlx::query(
            "INSERT INTO access_tokens (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(hash_token(&token))
        .bind(user_id.to_string())
        .bind(now.to_rfc3339())
        .bind((now + lifetime).to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::debug!(user_id = %user_id, "access token issued");
        Ok(token)
    }

    /// Resolve a bearer token to its active user.
    ///
    /// Returns `None` for unknown or expired tokens and for inactive
    /// users; the caller cannot distinguish these on purpose.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT u.* FROM access_tokens t
               JOIN users u ON u.id = t.user_id
               WHERE t.token_hash = ? AND t.expires_at > ?"#,
        )
        .bind(hash_token(token))
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = user_from_row(&row)?;
        if !user.is_active {
            return Ok(None);
        }
        Ok(Some(user))
    }
}
