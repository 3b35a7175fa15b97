//! MessageRepository trait definition.

use parley_types::error::RepositoryError;
use parley_types::message::{Message, MessageOrder, MessagePatch};
use parley_types::page::Page;
use uuid::Uuid;

/// Repository trait for message persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteMessageRepository`).
/// Ownership scoping is the caller's responsibility.
pub trait MessageRepository: Send + Sync {
    /// Persist a new message.
    fn create(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Get a message by its unique ID.
    fn get(
        &self,
        message_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Apply a partial update, replacing only the supplied fields and
    /// refreshing `updated_at`. Returns the updated message, or NotFound.
    fn update(
        &self,
        message_id: &Uuid,
        patch: &MessagePatch,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Delete a message. Returns NotFound when no row was deleted.
    fn delete(
        &self,
        message_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List a chat's messages ordered by creation time.
    fn list_for_chat(
        &self,
        chat_id: &Uuid,
        page: Page,
        order: MessageOrder,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// The most recent `limit` messages of a chat, newest first.
    fn latest_for_chat(
        &self,
        chat_id: &Uuid,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Number of messages in a chat, via a COUNT query.
    fn count_for_chat(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
