//! Chat domain types.
//!
//! A chat is a conversation container owned by exactly one user. Messages
//! reference their chat through `chat_id`; deleting a chat deletes its
//! messages (enforced by the schema's cascade).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length (in characters) of an auto-generated chat title.
///
/// User-supplied titles are not constrained; only titles produced by the
/// completion pipeline are truncated to this length.
pub const MAX_GENERATED_TITLE_CHARS: usize = 30;

/// A conversation container owned by one user.
///
/// `user_id` is immutable after creation. `updated_at` is refreshed on any
/// mutation, including title updates made by the auto-titling side path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a chat.
///
/// `user_id` names the intended owner and must match the acting user;
/// the chat service rejects a mismatch as a validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChat {
    pub title: String,
    pub user_id: Uuid,
}

/// Partial update for a chat. Only supplied fields are replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChatPatch {
    /// A patch that replaces only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }

    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_serialize() {
        let chat = Chat {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            title: "Trip".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&chat).unwrap();
        assert!(json.contains("\"title\":\"Trip\""));
        let parsed: Chat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, chat.id);
        assert_eq!(parsed.user_id, chat.user_id);
    }

    #[test]
    fn test_chat_patch_title() {
        let patch = ChatPatch::title("Renamed");
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert!(!patch.is_empty());
        assert!(ChatPatch::default().is_empty());
    }

    #[test]
    fn test_chat_patch_deserialize_missing_fields() {
        let patch: ChatPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}
