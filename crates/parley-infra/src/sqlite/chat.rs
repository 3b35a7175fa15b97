//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, reads on the
//! reader pool, mutations on the writer.

use parley_core::repository::ChatRepository;
use parley_types::chat::{Chat, ChatPatch};
use parley_types::error::RepositoryError;
use parley_types::page::Page;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ChatRepository`.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to the domain Chat.
struct ChatRow {
    id: String,
    user_id: String,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

        Ok(Chat {
            id,
            user_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn create(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chats (id, user_id, title, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(chat.id.to_string())
        .bind(chat.user_id.to_string())
        .bind(&chat.title)
        .bind(format_datetime(&chat.created_at))
        .bind(format_datetime(&chat.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(chat.clone())
    }

    async fn get(&self, chat_id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(chat_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, chat_id: &Uuid, patch: &ChatPatch) -> Result<Chat, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chats
               SET title = COALESCE(?, title), updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&patch.title)
        .bind(format_datetime(&chrono::Utc::now()))
        .bind(chat_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(chat_id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, chat_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid, page: Page) -> Result<Vec<Chat>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chats WHERE user_id = ?
               ORDER BY created_at DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(user_id.to_string())
        .bind(page.limit())
        .bind(page.skip())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat_row =
                ChatRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            chats.push(chat_row.into_chat()?);
        }

        Ok(chats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_util::{seed_user, test_pool};
    use chrono::Utc;
    use parley_core::repository::MessageRepository;
    use parley_types::message::{Message, MessageSender, MessageStatus};

    fn make_chat(user_id: Uuid, title: &str) -> Chat {
        let now = Utc::now();
        Chat {
            id: Uuid::now_v7(),
            user_id,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_chat() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());
        let user_id = seed_user(&pool, "a@example.com").await;

        let chat = make_chat(user_id, "Trip");
        let created = repo.create(&chat).await.unwrap();
        assert_eq!(created.id, chat.id);

        let found = repo.get(&chat.id).await.unwrap().unwrap();
        assert_eq!(found.id, chat.id);
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.title, "Trip");
    }

    #[tokio::test]
    async fn test_get_missing_chat_is_none() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        assert!(repo.get(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_title_refreshes_updated_at() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());
        let user_id = seed_user(&pool, "a@example.com").await;

        let chat = make_chat(user_id, "Trip");
        repo.create(&chat).await.unwrap();

        let updated = repo
            .update(&chat.id, &ChatPatch::title("Japan 2026"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Japan 2026");
        assert!(updated.updated_at >= chat.updated_at);
        assert_eq!(updated.created_at, chat.created_at);

        // An empty patch still refreshes updated_at but keeps the title.
        let touched = repo.update(&chat.id, &ChatPatch::default()).await.unwrap();
        assert_eq!(touched.title, "Japan 2026");
    }

    #[tokio::test]
    async fn test_update_missing_chat_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let result = repo.update(&Uuid::now_v7(), &ChatPatch::title("x")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_chat_cascades_messages() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());
        let messages = crate::sqlite::message::SqliteMessageRepository::new(pool.clone());
        let user_id = seed_user(&pool, "a@example.com").await;

        let chat = make_chat(user_id, "Trip");
        repo.create(&chat).await.unwrap();

        let now = Utc::now();
        messages
            .create(&Message {
                id: Uuid::now_v7(),
                chat_id: chat.id,
                text: "hello".to_string(),
                status: MessageStatus::Sent,
                sender: MessageSender::User,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        repo.delete(&chat.id).await.unwrap();

        assert!(repo.get(&chat.id).await.unwrap().is_none());
        assert_eq!(messages.count_for_chat(&chat.id).await.unwrap(), 0);

        let result = repo.delete(&chat.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_for_user_scopes_orders_and_paginates() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());
        let owner = seed_user(&pool, "a@example.com").await;
        let other = seed_user(&pool, "b@example.com").await;

        for i in 0..3 {
            repo.create(&make_chat(owner, &format!("chat {i}"))).await.unwrap();
        }
        repo.create(&make_chat(other, "foreign")).await.unwrap();

        let all = repo.list_for_user(&owner, Page::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|c| c.user_id == owner));
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let page = repo.list_for_user(&owner, Page::new(1, 2)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, all[1].id);
    }
}
