//! Message HTTP handlers, including the create endpoint that triggers
//! the reply pipeline.
//!
//! Endpoints:
//! - GET    /api/v1/chats/{id}/messages        - List a chat's messages
//! - GET    /api/v1/chats/{id}/messages/latest - Latest N messages
//! - GET    /api/v1/chats/{id}/messages/count  - Message count
//! - POST   /api/v1/messages                   - Create a message (201)
//! - GET    /api/v1/messages/{id}              - Get a message
//! - PUT    /api/v1/messages/{id}              - Update a message
//! - DELETE /api/v1/messages/{id}              - Delete a message (204)
//!
//! The create response carries only the USER message; the bot reply (and
//! a possible auto-title) land afterwards, so clients re-fetch the chat's
//! messages to observe them.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::message::{Message, MessageOrder, MessagePatch, NewMessage};
use parley_types::page::{Page, DEFAULT_PAGE_LIMIT};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub order: MessageOrder,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Query parameters for the latest-messages endpoint.
#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default = "default_latest_limit")]
    pub limit: i64,
}

fn default_latest_limit() -> i64 {
    10
}

/// Response body for the count endpoint.
#[derive(Debug, Serialize)]
pub struct MessageCount {
    pub chat_id: Uuid,
    pub message_count: u64,
}

/// GET /api/v1/chats/{id}/messages - List a chat's messages.
pub async fn list_chat_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_uuid(&chat_id)?;
    let messages = state
        .message_service
        .list_chat_messages(
            &user.id,
            &chat_id,
            Page::new(query.skip, query.limit),
            query.order,
        )
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(messages, request_id, elapsed)))
}

/// GET /api/v1/chats/{id}/messages/latest - Latest N messages, newest first.
pub async fn latest_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_uuid(&chat_id)?;
    let messages = state
        .message_service
        .latest_messages(&user.id, &chat_id, query.limit)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(messages, request_id, elapsed)))
}

/// GET /api/v1/chats/{id}/messages/count - Message count of a chat.
pub async fn message_count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
) -> Result<Json<ApiResponse<MessageCount>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_uuid(&chat_id)?;
    let count = state.message_service.count_messages(&user.id, &chat_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        MessageCount {
            chat_id,
            message_count: count,
        },
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/messages - Create a message and trigger the reply pipeline.
pub async fn create_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewMessage>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let message = state.message_service.create_message(&user.id, body).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message, request_id, elapsed)),
    ))
}

/// GET /api/v1/messages/{id} - Get a single message.
pub async fn get_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(message_id): Path<String>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let message_id = parse_uuid(&message_id)?;
    let message = state.message_service.get_message(&user.id, &message_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(message, request_id, elapsed)))
}

/// PUT /api/v1/messages/{id} - Apply a partial update.
pub async fn update_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(message_id): Path<String>,
    Json(body): Json<MessagePatch>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let message_id = parse_uuid(&message_id)?;
    let message = state
        .message_service
        .update_message(&user.id, &message_id, body)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(message, request_id, elapsed)))
}

/// DELETE /api/v1/messages/{id} - Delete a message.
pub async fn delete_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(message_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let message_id = parse_uuid(&message_id)?;
    state
        .message_service
        .delete_message(&user.id, &message_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
