//! Completion request/response types.
//!
//! These types model the boundary to the remote text-completion service:
//! the request shape, the returned text, and the failure taxonomy. The
//! concrete HTTP client lives in parley-infra.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Role of a message in a completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub text: String,
}

/// Request to the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<PromptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build a request from a single user prompt.
    pub fn from_prompt(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            messages: vec![PromptMessage {
                role: MessageRole::User,
                text: prompt.into(),
            }],
            temperature: None,
            max_tokens,
        }
    }

    /// Prefix the conversation with a system instruction.
    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.messages.insert(
            0,
            PromptMessage {
                role: MessageRole::System,
                text: instruction.into(),
            },
        );
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Response from the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Failure modes of a completion call.
///
/// Callers treat a single failed call as terminal for that attempt; there
/// is no retry policy at this boundary.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("completion timed out")]
    Timeout,

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider returned no usable text")]
    Empty,
}
