//! Message orchestration: persistence, ownership checks, and the reply
//! pipeline.
//!
//! `create_message` persists the user's message synchronously and returns
//! it; auto-titling and bot-reply generation run in a spawned task. The
//! bot reply is therefore observable only by re-fetching the chat's
//! messages. Completion failures never surface to the creating caller:
//! a failed title generation is skipped, a failed reply becomes a
//! persisted ERROR-status message with a fixed apology text.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parley_types::chat::{Chat, ChatPatch};
use parley_types::error::MessageError;
use parley_types::llm::{CompletionError, CompletionRequest};
use parley_types::message::{
    Message, MessageOrder, MessagePatch, MessageSender, MessageStatus, NewMessage,
};
use parley_types::page::{clamp_latest_limit, Page};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::access::{AccessOutcome, AccessPolicy};
use crate::chat::title::generate_chat_title;
use crate::completion::BoxCompletionProvider;
use crate::repository::{ChatRepository, MessageRepository};

/// Fixed text persisted when reply generation fails.
pub const BOT_ERROR_REPLY: &str = "Sorry, something went wrong while generating a reply.";

/// Tuning for the reply pipeline's completion calls.
///
/// The timeout bounds each individual provider call (title and reply
/// separately); an expired call is handled like any provider failure.
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_tokens: 2000,
            temperature: 0.6,
        }
    }
}

struct Inner<C, M> {
    chats: C,
    messages: M,
    access: AccessPolicy<C>,
    completion: BoxCompletionProvider,
    config: ReplyConfig,
}

/// Orchestrates message persistence and AI-reply generation.
///
/// Cheap to clone; the spawned pipeline task holds a clone so no database
/// resource is pinned across the completion call.
pub struct MessageService<C, M> {
    inner: Arc<Inner<C, M>>,
}

impl<C, M> Clone for MessageService<C, M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C, M> MessageService<C, M>
where
    C: ChatRepository + Clone + 'static,
    M: MessageRepository + Clone + 'static,
{
    pub fn new(chats: C, messages: M, completion: BoxCompletionProvider, config: ReplyConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                access: AccessPolicy::new(chats.clone()),
                chats,
                messages,
                completion,
                config,
            }),
        }
    }

    // --- The creation pipeline ---

    /// Persist a user message and kick off the reply pipeline.
    ///
    /// Ownership is validated first: a missing chat or a foreign chat
    /// rejects the whole operation and persists nothing. On success the
    /// USER/SENT message is returned and a background task handles
    /// best-effort titling plus the bot reply.
    pub async fn create_message(
        &self,
        actor: &Uuid,
        input: NewMessage,
    ) -> Result<Message, MessageError> {
        let chat = match self.inner.access.check_chat(actor, &input.chat_id).await? {
            AccessOutcome::Allowed(chat) => chat,
            AccessOutcome::NotFound => return Err(MessageError::ChatNotFound),
            AccessOutcome::Forbidden => return Err(MessageError::Forbidden),
        };

        // Read before the insert so the titling decision cannot race the
        // background task of a concurrent create.
        let first_message = match self.inner.messages.count_for_chat(&chat.id).await {
            Ok(count) => count == 0,
            Err(e) => {
                warn!(chat_id = %chat.id, error = %e, "message count failed; skipping auto-title");
                false
            }
        };

        let now = Utc::now();
        let message = Message {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            text: input.text,
            status: MessageStatus::Sent,
            sender: MessageSender::User,
            created_at: now,
            updated_at: now,
        };
        let message = self.inner.messages.create(&message).await?;
        info!(chat_id = %chat.id, message_id = %message.id, "user message stored");

        let service = self.clone();
        let user_text = message.text.clone();
        tokio::spawn(async move {
            service.finish_exchange(chat, user_text, first_message).await;
        });

        Ok(message)
    }

    /// Titling then reply, sequentially. Both halves are best-effort with
    /// respect to the caller: the user message is already committed and
    /// returned by the time this runs.
    async fn finish_exchange(&self, chat: Chat, user_text: String, first_message: bool) {
        if first_message {
            self.auto_title(&chat, &user_text).await;
        }
        self.generate_reply(&chat, &user_text).await;
    }

    async fn auto_title(&self, chat: &Chat, user_text: &str) {
        let title = tokio::time::timeout(
            self.inner.config.timeout,
            generate_chat_title(&self.inner.completion, user_text),
        )
        .await
        .unwrap_or(Err(CompletionError::Timeout));

        match title {
            Ok(title) => {
                match self.inner.chats.update(&chat.id, &ChatPatch::title(title.clone())).await {
                    Ok(_) => info!(chat_id = %chat.id, title = %title, "chat auto-titled"),
                    Err(e) => {
                        warn!(chat_id = %chat.id, error = %e, "failed to store generated title")
                    }
                }
            }
            Err(e) => warn!(chat_id = %chat.id, error = %e, "auto-title skipped"),
        }
    }

    async fn generate_reply(&self, chat: &Chat, user_text: &str) {
        let request = CompletionRequest::from_prompt(user_text, self.inner.config.max_tokens)
            .with_temperature(self.inner.config.temperature);

        let (status, text) = match self.complete_with_timeout(&request).await {
            Ok(text) => (MessageStatus::Delivered, text),
            Err(e) => {
                warn!(chat_id = %chat.id, error = %e, "reply generation failed");
                (MessageStatus::Error, BOT_ERROR_REPLY.to_string())
            }
        };

        let now = Utc::now();
        let reply = Message {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            text,
            status,
            sender: MessageSender::Bot,
            created_at: now,
            updated_at: now,
        };

        match self.inner.messages.create(&reply).await {
            Ok(reply) => {
                info!(chat_id = %chat.id, message_id = %reply.id, status = %reply.status, "bot reply stored")
            }
            Err(e) => error!(chat_id = %chat.id, error = %e, "failed to store bot reply"),
        }
    }

    /// One bounded provider call. Blank output counts as a failure so the
    /// ERROR fallback covers "empty/unusable" the same as a refused call.
    async fn complete_with_timeout(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let response =
            match tokio::time::timeout(self.inner.config.timeout, self.inner.completion.complete(request))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(CompletionError::Timeout),
            };

        let text = response.text.trim();
        if text.is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(text.to_string())
    }

    // --- Reads and plain mutations ---

    /// Get a message owned (through its chat) by the acting user.
    pub async fn get_message(&self, actor: &Uuid, message_id: &Uuid) -> Result<Message, MessageError> {
        self.authorize_message(actor, message_id).await
    }

    /// List a chat's messages. Forbidden for a foreign chat, NotFound for
    /// a missing one -- the listing never silently narrows to empty.
    pub async fn list_chat_messages(
        &self,
        actor: &Uuid,
        chat_id: &Uuid,
        page: Page,
        order: MessageOrder,
    ) -> Result<Vec<Message>, MessageError> {
        self.authorize_chat(actor, chat_id).await?;
        Ok(self.inner.messages.list_for_chat(chat_id, page, order).await?)
    }

    /// The most recent messages of an owned chat, newest first.
    pub async fn latest_messages(
        &self,
        actor: &Uuid,
        chat_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, MessageError> {
        self.authorize_chat(actor, chat_id).await?;
        let limit = clamp_latest_limit(limit);
        Ok(self.inner.messages.latest_for_chat(chat_id, limit).await?)
    }

    /// Number of messages in an owned chat.
    pub async fn count_messages(&self, actor: &Uuid, chat_id: &Uuid) -> Result<u64, MessageError> {
        self.authorize_chat(actor, chat_id).await?;
        Ok(self.inner.messages.count_for_chat(chat_id).await?)
    }

    /// Apply a partial update to an owned message.
    pub async fn update_message(
        &self,
        actor: &Uuid,
        message_id: &Uuid,
        patch: MessagePatch,
    ) -> Result<Message, MessageError> {
        self.authorize_message(actor, message_id).await?;
        Ok(self.inner.messages.update(message_id, &patch).await?)
    }

    /// Delete an owned message.
    pub async fn delete_message(&self, actor: &Uuid, message_id: &Uuid) -> Result<(), MessageError> {
        self.authorize_message(actor, message_id).await?;
        self.inner.messages.delete(message_id).await?;
        Ok(())
    }

    async fn authorize_chat(&self, actor: &Uuid, chat_id: &Uuid) -> Result<Chat, MessageError> {
        match self.inner.access.check_chat(actor, chat_id).await? {
            AccessOutcome::Allowed(chat) => Ok(chat),
            AccessOutcome::NotFound => Err(MessageError::ChatNotFound),
            AccessOutcome::Forbidden => Err(MessageError::Forbidden),
        }
    }

    async fn authorize_message(&self, actor: &Uuid, message_id: &Uuid) -> Result<Message, MessageError> {
        let message = self
            .inner
            .messages
            .get(message_id)
            .await?
            .ok_or(MessageError::NotFound)?;

        match self.inner.access.check_message(actor, &message).await? {
            AccessOutcome::Allowed(_) => Ok(message),
            AccessOutcome::NotFound => Err(MessageError::NotFound),
            AccessOutcome::Forbidden => Err(MessageError::Forbidden),
        }
    }
}
