//! ChatRepository trait definition.
//!
//! CRUD operations for chats. No operation here enforces ownership --
//! that is the caller's responsibility (see `crate::access`).

use parley_types::chat::{Chat, ChatPatch};
use parley_types::error::RepositoryError;
use parley_types::page::Page;
use uuid::Uuid;

/// Repository trait for chat persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat.
    fn create(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Get a chat by its unique ID.
    fn get(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Apply a partial update, replacing only the supplied fields and
    /// refreshing `updated_at`. Returns the updated chat, or NotFound.
    fn update(
        &self,
        chat_id: &Uuid,
        patch: &ChatPatch,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Delete a chat and (via schema cascade) all of its messages.
    /// Returns NotFound when no row was deleted.
    fn delete(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List chats owned by a user, newest first.
    fn list_for_user(
        &self,
        user_id: &Uuid,
        page: Page,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;
}
