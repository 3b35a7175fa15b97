//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` and require a bearer token except
//! `/health`. Middleware: CORS, request tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat CRUD
        .route("/chats", get(handlers::chat::list_chats))
        .route("/chats", post(handlers::chat::create_chat))
        .route("/chats/{id}", get(handlers::chat::get_chat))
        .route("/chats/{id}", put(handlers::chat::update_chat))
        .route("/chats/{id}", delete(handlers::chat::delete_chat))
        .route(
            "/chats/{id}/title",
            axum::routing::patch(handlers::chat::rename_chat),
        )
        // Chat-scoped message reads
        .route(
            "/chats/{id}/messages",
            get(handlers::message::list_chat_messages),
        )
        .route(
            "/chats/{id}/messages/latest",
            get(handlers::message::latest_messages),
        )
        .route(
            "/chats/{id}/messages/count",
            get(handlers::message::message_count),
        )
        // Messages (create triggers the reply pipeline)
        .route("/messages", post(handlers::message::create_message))
        .route("/messages/{id}", get(handlers::message::get_message))
        .route("/messages/{id}", put(handlers::message::update_message))
        .route("/messages/{id}", delete(handlers::message::delete_message));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
