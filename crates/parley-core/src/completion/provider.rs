//! CompletionProvider trait definition.
//!
//! The single abstraction over the remote text-generation service.
//! One call, one result; retries are not this layer's concern.

use parley_types::llm::{CompletionError, CompletionRequest, CompletionResponse};

/// Trait for completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `YandexGptProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "yandexgpt").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, CompletionError>> + Send;
}
