//! Message domain types.
//!
//! A message is one turn in a chat, authored by either the user or the bot.
//! Status and sender map to CHECK constraints in the SQLite schema:
//! `CHECK (status IN ('sending', 'sent', 'error', 'delivered'))` and
//! `CHECK (sender IN ('user', 'bot'))`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Delivery status of a message.
///
/// User messages are persisted as `Sent` and never touched by the reply
/// pipeline. Bot messages produced by the pipeline are `Delivered` when the
/// completion succeeded and `Error` when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Error,
    Delivered,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Sending => write!(f, "sending"),
            MessageStatus::Sent => write!(f, "sent"),
            MessageStatus::Error => write!(f, "error"),
            MessageStatus::Delivered => write!(f, "delivered"),
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sending" => Ok(MessageStatus::Sending),
            "sent" => Ok(MessageStatus::Sent),
            "error" => Ok(MessageStatus::Error),
            "delivered" => Ok(MessageStatus::Delivered),
            other => Err(format!("invalid message status: '{other}'")),
        }
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Bot,
}

impl fmt::Display for MessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSender::User => write!(f, "user"),
            MessageSender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for MessageSender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageSender::User),
            "bot" => Ok(MessageSender::Bot),
            other => Err(format!("invalid message sender: '{other}'")),
        }
    }
}

/// One turn in a chat.
///
/// `chat_id` is immutable after creation. Messages are ordered by
/// `created_at` within a chat, newest first by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub text: String,
    pub status: MessageStatus,
    pub sender: MessageSender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a message in a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub text: String,
    pub chat_id: Uuid,
}

/// Partial update for a message. Only supplied fields are replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl MessagePatch {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.status.is_none()
    }
}

/// Sort direction for message listings.
///
/// `Desc` (newest first) is the default ordering everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrder {
    Asc,
    #[default]
    Desc,
}
