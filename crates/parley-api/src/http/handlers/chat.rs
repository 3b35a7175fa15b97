//! Chat CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/chats            - List the current user's chats
//! - POST   /api/v1/chats            - Create a chat (201)
//! - GET    /api/v1/chats/{id}       - Get a chat
//! - PUT    /api/v1/chats/{id}       - Update a chat
//! - PATCH  /api/v1/chats/{id}/title - Rename a chat
//! - DELETE /api/v1/chats/{id}       - Delete a chat and its messages (204)

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use parley_types::chat::{Chat, ChatPatch, NewChat};
use parley_types::page::{Page, DEFAULT_PAGE_LIMIT};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for chat listing.
#[derive(Debug, Deserialize)]
pub struct ChatListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Request body for the rename endpoint.
#[derive(Debug, Deserialize)]
pub struct RenameChatRequest {
    pub title: String,
}

/// GET /api/v1/chats - List the current user's chats.
pub async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ChatListQuery>,
) -> Result<Json<ApiResponse<Vec<Chat>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chats = state
        .chat_service
        .list_user_chats(&user.id, Page::new(query.skip, query.limit))
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chats, request_id, elapsed)))
}

/// POST /api/v1/chats - Create a chat for the current user.
pub async fn create_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewChat>,
) -> Result<(StatusCode, Json<ApiResponse<Chat>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat = state.chat_service.create_chat(&user.id, body).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(chat, request_id, elapsed)),
    ))
}

/// GET /api/v1/chats/{id} - Get a single chat.
pub async fn get_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_uuid(&chat_id)?;
    let chat = state.chat_service.get_chat(&user.id, &chat_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// PUT /api/v1/chats/{id} - Apply a partial update.
pub async fn update_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
    Json(body): Json<ChatPatch>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_uuid(&chat_id)?;
    let chat = state
        .chat_service
        .update_chat(&user.id, &chat_id, body)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// PATCH /api/v1/chats/{id}/title - Replace only the title.
pub async fn rename_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
    Json(body): Json<RenameChatRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_uuid(&chat_id)?;
    let chat = state
        .chat_service
        .rename_chat(&user.id, &chat_id, body.title)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// DELETE /api/v1/chats/{id} - Delete a chat and its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let chat_id = parse_uuid(&chat_id)?;
    state.chat_service.delete_chat(&user.id, &chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
