//! Application state wiring all services together.
//!
//! Services are generic over repository traits; `AppState` pins them to
//! the concrete SQLite implementations and hands them to the HTTP
//! handlers. Everything is constructed once here -- no globals.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use parley_core::chat::ChatService;
use parley_core::completion::BoxCompletionProvider;
use parley_core::message::{MessageService, ReplyConfig};
use parley_infra::auth::TokenAuthenticator;
use parley_infra::llm::yandex::YandexGptProvider;
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::message::SqliteMessageRepository;
use parley_infra::sqlite::pool::{default_database_url, DatabasePool};
use parley_infra::sqlite::user::SqliteUserStore;
use parley_types::config::Settings;

/// Concrete type aliases for the service generics pinned to the SQLite
/// implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;
pub type ConcreteMessageService = MessageService<SqliteChatRepository, SqliteMessageRepository>;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: ConcreteChatService,
    pub message_service: ConcreteMessageService,
    pub users: SqliteUserStore,
    pub auth: TokenAuthenticator,
    pub db_pool: DatabasePool,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Initialize the application state: connect to the database and wire
    /// every service with explicit dependencies.
    ///
    /// Requires `PARLEY_GPT_API_KEY` because the message pipeline can
    /// reach the completion provider on any create; failing here beats
    /// failing on the first message.
    pub async fn init(settings: Settings) -> anyhow::Result<Self> {
        settings
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid settings: {e}"))?;

        let api_key = std::env::var("PARLEY_GPT_API_KEY")
            .context("PARLEY_GPT_API_KEY is not set")?;

        let db_url = settings
            .database
            .url
            .clone()
            .unwrap_or_else(default_database_url);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("failed to open database at {db_url}"))?;

        let chat_repo = SqliteChatRepository::new(db_pool.clone());
        let message_repo = SqliteMessageRepository::new(db_pool.clone());

        let provider = YandexGptProvider::new(
            SecretString::from(api_key),
            settings.completion.folder_id.clone(),
            settings.completion.model.clone(),
            settings.completion.model_version.clone(),
        );

        let reply_config = ReplyConfig {
            timeout: Duration::from_secs(settings.completion.timeout_secs),
            max_tokens: settings.completion.max_tokens,
            temperature: settings.completion.temperature,
        };

        let chat_service = ChatService::new(chat_repo.clone());
        let message_service = MessageService::new(
            chat_repo,
            message_repo,
            BoxCompletionProvider::new(provider),
            reply_config,
        );

        let auth = TokenAuthenticator::new(
            db_pool.clone(),
            Duration::from_secs(settings.access_token.lifetime_secs),
        );
        let users = SqliteUserStore::new(db_pool.clone());

        Ok(Self {
            chat_service,
            message_service,
            users,
            auth,
            db_pool,
            settings: Arc::new(settings),
        })
    }
}
