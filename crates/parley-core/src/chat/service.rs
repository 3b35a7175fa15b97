//! Chat CRUD service with ownership enforcement.
//!
//! Every detail-read and mutation consults the access policy first, so a
//! missing chat and a foreign chat come back as distinct errors.

use parley_types::chat::{Chat, ChatPatch, NewChat};
use parley_types::error::ChatError;
use parley_types::page::Page;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::access::{AccessOutcome, AccessPolicy};
use crate::repository::ChatRepository;

/// CRUD operations over chats, scoped to the acting user.
#[derive(Clone)]
pub struct ChatService<C> {
    chats: C,
    access: AccessPolicy<C>,
}

impl<C: ChatRepository + Clone> ChatService<C> {
    pub fn new(chats: C) -> Self {
        Self {
            access: AccessPolicy::new(chats.clone()),
            chats,
        }
    }

    /// List the acting user's chats, newest first.
    pub async fn list_user_chats(
        &self,
        actor: &Uuid,
        page: Page,
    ) -> Result<Vec<Chat>, ChatError> {
        Ok(self.chats.list_for_user(actor, page).await?)
    }

    /// Get a chat owned by the acting user.
    pub async fn get_chat(&self, actor: &Uuid, chat_id: &Uuid) -> Result<Chat, ChatError> {
        self.authorize(actor, chat_id).await
    }

    /// Create a chat. Creating a chat for another user id is rejected as
    /// a validation error.
    pub async fn create_chat(&self, actor: &Uuid, input: NewChat) -> Result<Chat, ChatError> {
        if input.user_id != *actor {
            return Err(ChatError::Validation(
                "chats can only be created for the acting user".to_string(),
            ));
        }

        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            title: input.title,
            created_at: now,
            updated_at: now,
        };
        let chat = self.chats.create(&chat).await?;
        info!(chat_id = %chat.id, user_id = %chat.user_id, "chat created");
        Ok(chat)
    }

    /// Apply a partial update to an owned chat.
    pub async fn update_chat(
        &self,
        actor: &Uuid,
        chat_id: &Uuid,
        patch: ChatPatch,
    ) -> Result<Chat, ChatError> {
        self.authorize(actor, chat_id).await?;
        Ok(self.chats.update(chat_id, &patch).await?)
    }

    /// Replace only the title of an owned chat.
    pub async fn rename_chat(
        &self,
        actor: &Uuid,
        chat_id: &Uuid,
        title: String,
    ) -> Result<Chat, ChatError> {
        self.update_chat(actor, chat_id, ChatPatch::title(title)).await
    }

    /// Delete an owned chat along with its messages.
    pub async fn delete_chat(&self, actor: &Uuid, chat_id: &Uuid) -> Result<(), ChatError> {
        self.authorize(actor, chat_id).await?;
        self.chats.delete(chat_id).await?;
        info!(chat_id = %chat_id, "chat deleted");
        Ok(())
    }

    async fn authorize(&self, actor: &Uuid, chat_id: &Uuid) -> Result<Chat, ChatError> {
        match self.access.check_chat(actor, chat_id).await? {
            AccessOutcome::Allowed(chat) => Ok(chat),
            AccessOutcome::NotFound => Err(ChatError::NotFound),
            AccessOutcome::Forbidden => Err(ChatError::Forbidden),
        }
    }
}
