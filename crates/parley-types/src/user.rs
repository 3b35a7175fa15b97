//! User identity record.
//!
//! Users are owned by the authentication layer; the chat core references
//! them by id and never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An identity record resolved by the authentication layer.
///
/// The password hash never leaves the process: it is skipped during
/// serialization so API responses cannot leak it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::now_v7(),
            email: "a@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            is_active: true,
            is_superuser: false,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("a@example.com"));
    }
}
