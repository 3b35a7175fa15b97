//! Application configuration types.
//!
//! `Settings` represents the top-level `parley.toml` that controls the
//! database location, HTTP bind address, token lifetime, and completion
//! provider tuning. All fields have sensible defaults; the completion API
//! key is never part of the file and is supplied via environment only
//! (see `parley-api`).

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parley backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub access_token: AccessTokenSettings,
}

impl Settings {
    /// Validate invariants that must hold before serving traffic.
    ///
    /// The completion folder id is required because every message creation
    /// may reach the provider; failing at startup beats failing on the
    /// first chat message.
    pub fn validate(&self) -> Result<(), String> {
        if self.completion.folder_id.trim().is_empty() {
            return Err("completion.folder_id must be set".to_string());
        }
        if self.completion.timeout_secs == 0 {
            return Err("completion.timeout_secs must be positive".to_string());
        }
        if self.access_token.lifetime_secs == 0 {
            return Err("access_token.lifetime_secs must be positive".to_string());
        }
        Ok(())
    }
}

/// Database location. `url` falls back to the platform data directory
/// when unset (resolved in parley-infra).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
}

/// HTTP server settings and API metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_title() -> String {
    "Parley API".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            title: default_title(),
        }
    }
}

/// Completion provider tuning. The API key is env-only, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Provider folder/project id the model is billed against.
    #[serde(default)]
    pub folder_id: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    /// Upper bound on a single completion call; the orchestrator treats an
    /// expired call exactly like a provider failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_model() -> String {
    "yandexgpt-lite".to_string()
}

fn default_model_version() -> String {
    "rc".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f64 {
    0.6
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            folder_id: String::new(),
            model: default_model(),
            model_version: default_model_version(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Bearer-token lifetime for issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenSettings {
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,
}

fn default_lifetime_secs() -> u64 {
    3600
}

impl Default for AccessTokenSettings {
    fn default() -> Self {
        Self {
            lifetime_secs: default_lifetime_secs(),
        }
    }
}
