//! Ownership checks shared by every chat and message operation.
//!
//! The same join logic (target -> owning chat -> owner id) used to be
//! duplicated per endpoint; `AccessPolicy` centralizes it. A missing
//! target and a present-but-foreign target are distinct outcomes, and a
//! nonexistent id never reports `Forbidden`.

use parley_types::chat::Chat;
use parley_types::error::RepositoryError;
use parley_types::message::Message;
use uuid::Uuid;

use crate::repository::ChatRepository;

/// Tri-state result of an ownership check.
#[derive(Debug)]
pub enum AccessOutcome {
    /// The target exists and is owned by the actor; carries the owning chat.
    Allowed(Chat),
    /// The target does not exist.
    NotFound,
    /// The target exists but belongs to another user.
    Forbidden,
}

impl AccessOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessOutcome::Allowed(_))
    }
}

/// Reusable ownership policy over the chat repository.
#[derive(Clone)]
pub struct AccessPolicy<C> {
    chats: C,
}

impl<C: ChatRepository> AccessPolicy<C> {
    pub fn new(chats: C) -> Self {
        Self { chats }
    }

    /// Check that `chat_id` exists and is owned by `actor`.
    pub async fn check_chat(
        &self,
        actor: &Uuid,
        chat_id: &Uuid,
    ) -> Result<AccessOutcome, RepositoryError> {
        match self.chats.get(chat_id).await? {
            None => Ok(AccessOutcome::NotFound),
            Some(chat) if chat.user_id == *actor => Ok(AccessOutcome::Allowed(chat)),
            Some(_) => Ok(AccessOutcome::Forbidden),
        }
    }

    /// Check that an already-fetched message belongs to a chat owned by
    /// `actor`. The owning chat is resolved through `message.chat_id`;
    /// a dangling chat reference reports `NotFound` (the cascade makes
    /// this unreachable in practice, but the policy stays total).
    pub async fn check_message(
        &self,
        actor: &Uuid,
        message: &Message,
    ) -> Result<AccessOutcome, RepositoryError> {
        self.check_chat(actor, &message.chat_id).await
    }
}
