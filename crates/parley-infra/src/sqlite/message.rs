//! SQLite message repository implementation.

use parley_core::repository::MessageRepository;
use parley_types::error::RepositoryError;
use parley_types::message::{Message, MessageOrder, MessagePatch, MessageSender, MessageStatus};
use parley_types::page::Page;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to the domain Message.
struct MessageRow {
    id: String,
    chat_id: String,
    text: String,
    status: String,
    sender: String,
    created_at: String,
    updated_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            text: row.try_get("text")?,
            status: row.try_get("status")?,
            sender: row.try_get("sender")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let chat_id = Uuid::parse_str(&self.chat_id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat_id: {e}")))?;
        let status: MessageStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let sender: MessageSender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Message {
            id,
            chat_id,
            text: self.text,
            status,
            sender,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn rows_into_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Message>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let message_row =
            MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        messages.push(message_row.into_message()?);
    }
    Ok(messages)
}

impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO messages (id, chat_id, text, status, sender, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.chat_id.to_string())
        .bind(&message.text)
        .bind(message.status.to_string())
        .bind(message.sender.to_string())
        .bind(format_datetime(&message.created_at))
        .bind(format_datetime(&message.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(message.clone())
    }

    async fn get(&self, message_id: &Uuid) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(message_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let message_row = MessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(message_row.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        message_id: &Uuid,
        patch: &MessagePatch,
    ) -> Result<Message, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE messages
               SET text = COALESCE(?, text), status = COALESCE(?, status), updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&patch.text)
        .bind(patch.status.map(|s| s.to_string()))
        .bind(format_datetime(&chrono::Utc::now()))
        .bind(message_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(message_id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, message_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(message_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_for_chat(
        &self,
        chat_id: &Uuid,
        page: Page,
        order: MessageOrder,
    ) -> Result<Vec<Message>, RepositoryError> {
        // Direction cannot be bound as a parameter; both strings are fixed.
        let sql = match order {
            MessageOrder::Desc => {
                "SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
            }
            MessageOrder::Asc => {
                "SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at ASC LIMIT ? OFFSET ?"
            }
        };

        let rows = sqlx::query(sql)
            .bind(chat_id.to_string())
            .bind(page.limit())
            .bind(page.skip())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_into_messages(&rows)
    }

    async fn latest_for_chat(
        &self,
        chat_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(chat_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_into_messages(&rows)
    }

    async fn count_for_chat(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM messages WHERE chat_id = ?")
            .bind(chat_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::chat::SqliteChatRepository;
    use crate::sqlite::test_util::{seed_user, test_pool};
    use chrono::{Duration, Utc};
    use parley_core::repository::ChatRepository;
    use parley_types::chat::Chat;

    async fn seed_chat(pool: &DatabasePool) -> Chat {
        let user_id = seed_user(pool, "a@example.com").await;
        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            user_id,
            title: "Trip".to_string(),
            created_at: now,
            updated_at: now,
        };
        SqliteChatRepository::new(pool.clone())
            .create(&chat)
            .await
            .unwrap()
    }

    fn make_message(chat_id: Uuid, text: &str, offset_ms: i64) -> Message {
        let at = Utc::now() + Duration::milliseconds(offset_ms);
        Message {
            id: Uuid::now_v7(),
            chat_id,
            text: text.to_string(),
            status: MessageStatus::Sent,
            sender: MessageSender::User,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_message() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let chat = seed_chat(&pool).await;

        let message = make_message(chat.id, "hello", 0);
        repo.create(&message).await.unwrap();

        let found = repo.get(&message.id).await.unwrap().unwrap();
        assert_eq!(found.chat_id, chat.id);
        assert_eq!(found.text, "hello");
        assert_eq!(found.status, MessageStatus::Sent);
        assert_eq!(found.sender, MessageSender::User);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_chat() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        let result = repo.create(&make_message(Uuid::now_v7(), "orphan", 0)).await;
        assert!(matches!(result, Err(RepositoryError::Query(_))));
    }

    #[tokio::test]
    async fn test_update_patches_only_supplied_fields() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let chat = seed_chat(&pool).await;

        let message = make_message(chat.id, "hello", 0);
        repo.create(&message).await.unwrap();

        let updated = repo
            .update(
                &message.id,
                &MessagePatch {
                    text: None,
                    status: Some(MessageStatus::Delivered),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "hello");
        assert_eq!(updated.status, MessageStatus::Delivered);
        assert!(updated.updated_at >= message.updated_at);

        let updated = repo
            .update(
                &message.id,
                &MessagePatch {
                    text: Some("edited".to_string()),
                    status: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "edited");
        assert_eq!(updated.status, MessageStatus::Delivered);
    }

    #[tokio::test]
    async fn test_update_missing_message_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        let result = repo.update(&Uuid::now_v7(), &MessagePatch::default()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_message() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let chat = seed_chat(&pool).await;

        let message = make_message(chat.id, "hello", 0);
        repo.create(&message).await.unwrap();

        repo.delete(&message.id).await.unwrap();
        assert!(repo.get(&message.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&message.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_for_chat_orders_and_paginates() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let chat = seed_chat(&pool).await;

        for i in 0..5 {
            repo.create(&make_message(chat.id, &format!("msg {i}"), i * 10))
                .await
                .unwrap();
        }

        let desc = repo
            .list_for_chat(&chat.id, Page::default(), MessageOrder::Desc)
            .await
            .unwrap();
        assert_eq!(desc.len(), 5);
        assert_eq!(desc[0].text, "msg 4");
        assert_eq!(desc[4].text, "msg 0");

        let asc = repo
            .list_for_chat(&chat.id, Page::default(), MessageOrder::Asc)
            .await
            .unwrap();
        assert_eq!(asc[0].text, "msg 0");

        let window = repo
            .list_for_chat(&chat.id, Page::new(1, 2), MessageOrder::Desc)
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].text, "msg 3");
        assert_eq!(window[1].text, "msg 2");
    }

    #[tokio::test]
    async fn test_latest_for_chat_returns_newest_first() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let chat = seed_chat(&pool).await;

        for i in 0..4 {
            repo.create(&make_message(chat.id, &format!("msg {i}"), i * 10))
                .await
                .unwrap();
        }

        let latest = repo.latest_for_chat(&chat.id, 2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].text, "msg 3");
        assert_eq!(latest[1].text, "msg 2");
    }

    #[tokio::test]
    async fn test_count_for_chat() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool.clone());
        let chat = seed_chat(&pool).await;

        assert_eq!(repo.count_for_chat(&chat.id).await.unwrap(), 0);

        for i in 0..3 {
            repo.create(&make_message(chat.id, "x", i * 10)).await.unwrap();
        }
        assert_eq!(repo.count_for_chat(&chat.id).await.unwrap(), 3);

        // Counting an unknown chat is zero, not an error.
        assert_eq!(repo.count_for_chat(&Uuid::now_v7()).await.unwrap(), 0);
    }
}
