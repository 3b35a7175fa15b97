//! In-memory fakes shared by the core service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use parley_types::chat::{Chat, ChatPatch};
use parley_types::error::RepositoryError;
use parley_types::llm::{CompletionError, CompletionRequest, CompletionResponse};
use parley_types::message::{Message, MessageOrder, MessagePatch, MessageSender, MessageStatus};
use parley_types::page::Page;
use uuid::Uuid;

use crate::completion::CompletionProvider;
use crate::repository::{ChatRepository, MessageRepository};

pub fn chat_for(owner: Uuid, title: &str) -> Chat {
    let now = Utc::now();
    Chat {
        id: Uuid::now_v7(),
        user_id: owner,
        title: title.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn message_in(chat_id: Uuid, text: &str) -> Message {
    let now = Utc::now();
    Message {
        id: Uuid::now_v7(),
        chat_id,
        text: text.to_string(),
        status: MessageStatus::Sent,
        sender: MessageSender::User,
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryChatRepo {
    chats: Arc<Mutex<HashMap<Uuid, Chat>>>,
}

impl MemoryChatRepo {
    pub async fn insert(&self, chat: Chat) -> Chat {
        self.create(&chat).await.unwrap()
    }

    pub fn title_of(&self, chat_id: &Uuid) -> Option<String> {
        self.chats.lock().unwrap().get(chat_id).map(|c| c.title.clone())
    }
}

impl ChatRepository for MemoryChatRepo {
    async fn create(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        self.chats.lock().unwrap().insert(chat.id, chat.clone());
        Ok(chat.clone())
    }

    async fn get(&self, chat_id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.chats.lock().unwrap().get(chat_id).cloned())
    }

    async fn update(&self, chat_id: &Uuid, patch: &ChatPatch) -> Result<Chat, RepositoryError> {
        let mut chats = self.chats.lock().unwrap();
        let chat = chats.get_mut(chat_id).ok_or(RepositoryError::NotFound)?;
        if let Some(title) = &patch.title {
            chat.title = title.clone();
        }
        chat.updated_at = Utc::now();
        Ok(chat.clone())
    }

    async fn delete(&self, chat_id: &Uuid) -> Result<(), RepositoryError> {
        self.chats
            .lock()
            .unwrap()
            .remove(chat_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_for_user(&self, user_id: &Uuid, page: Page) -> Result<Vec<Chat>, RepositoryError> {
        let mut chats: Vec<Chat> = self
            .chats
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.user_id == *user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(chats
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MemoryMessageRepo {
    messages: Arc<Mutex<HashMap<Uuid, Message>>>,
    fail_creates: Arc<AtomicBool>,
}

impl MemoryMessageRepo {
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn all_in_chat(&self, chat_id: &Uuid) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.chat_id == *chat_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        messages
    }
}

impl MessageRepository for MemoryMessageRepo {
    async fn create(&self, message: &Message) -> Result<Message, RepositoryError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("injected failure".to_string()));
        }
        self.messages
            .lock()
            .unwrap()
            .insert(message.id, message.clone());
        Ok(message.clone())
    }

    async fn get(&self, message_id: &Uuid) -> Result<Option<Message>, RepositoryError> {
        Ok(self.messages.lock().unwrap().get(message_id).cloned())
    }

    async fn update(
        &self,
        message_id: &Uuid,
        patch: &MessagePatch,
    ) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().unwrap();
        let message = messages.get_mut(message_id).ok_or(RepositoryError::NotFound)?;
        if let Some(text) = &patch.text {
            message.text = text.clone();
        }
        if let Some(status) = patch.status {
            message.status = status;
        }
        message.updated_at = Utc::now();
        Ok(message.clone())
    }

    async fn delete(&self, message_id: &Uuid) -> Result<(), RepositoryError> {
        self.messages
            .lock()
            .unwrap()
            .remove(message_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_for_chat(
        &self,
        chat_id: &Uuid,
        page: Page,
        order: MessageOrder,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut messages = self.all_in_chat(chat_id);
        if order == MessageOrder::Desc {
            messages.reverse();
        }
        Ok(messages
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn latest_for_chat(
        &self,
        chat_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut messages = self.all_in_chat(chat_id);
        messages.reverse();
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn count_for_chat(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        Ok(self.all_in_chat(chat_id).len() as u64)
    }
}

// ---------------------------------------------------------------------------
// Completion provider
// ---------------------------------------------------------------------------

enum Script {
    AlwaysOk(String),
    AlwaysFail,
    /// Never resolves; exercises the orchestrator's timeout.
    Hang,
    Sequence(Mutex<VecDeque<Result<String, CompletionError>>>),
}

/// A scripted completion backend recording every request it receives.
pub struct ScriptedProvider {
    script: Script,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn ok(text: &str) -> Self {
        Self {
            script: Script::AlwaysOk(text.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            script: Script::AlwaysFail,
            requests: Arc::default(),
        }
    }

    pub fn hanging() -> Self {
        Self {
            script: Script::Hang,
            requests: Arc::default(),
        }
    }

    pub fn sequence(responses: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Script::Sequence(Mutex::new(responses.into())),
            requests: Arc::default(),
        }
    }

    /// Handle onto the recorded requests, usable after the provider has
    /// been moved into a `BoxCompletionProvider`.
    pub fn request_log(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        self.requests.clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        let text = match &self.script {
            Script::AlwaysOk(text) => text.clone(),
            Script::AlwaysFail => {
                return Err(CompletionError::Provider {
                    message: "scripted failure".to_string(),
                });
            }
            Script::Hang => std::future::pending().await,
            Script::Sequence(responses) => {
                let next = responses.lock().unwrap().pop_front();
                next.unwrap_or(Err(CompletionError::Provider {
                    message: "script exhausted".to_string(),
                }))?
            }
        };
        Ok(CompletionResponse {
            text,
            model_version: None,
            usage: None,
        })
    }
}
