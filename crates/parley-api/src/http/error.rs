//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{ChatError, MessageError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat-related errors.
    Chat(ChatError),
    /// Message-related errors.
    Message(MessageError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        AppError::Message(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Chat(ChatError::NotFound) => {
                (StatusCode::NOT_FOUND, "CHAT_NOT_FOUND", "Chat not found".to_string())
            }
            AppError::Chat(ChatError::Forbidden) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Not enough permissions to access this chat".to_string(),
            ),
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(e) => (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_ERROR", e.to_string()),
            AppError::Message(MessageError::NotFound) => (
                StatusCode::NOT_FOUND,
                "MESSAGE_NOT_FOUND",
                "Message not found".to_string(),
            ),
            AppError::Message(MessageError::ChatNotFound) => {
                (StatusCode::NOT_FOUND, "CHAT_NOT_FOUND", "Chat not found".to_string())
            }
            AppError::Message(MessageError::Forbidden) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Not enough permissions to access this message".to_string(),
            ),
            AppError::Message(MessageError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Message(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MESSAGE_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
