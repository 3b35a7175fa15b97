//! BoxCompletionProvider -- object-safe dynamic dispatch wrapper.
//!
//! `CompletionProvider` uses RPITIT and cannot be a trait object directly:
//! 1. Define an object-safe `CompletionProviderDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionProviderDyn` for all `T: CompletionProvider`
//! 3. `BoxCompletionProvider` wraps `Box<dyn CompletionProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::llm::{CompletionError, CompletionRequest, CompletionResponse};

use super::provider::CompletionProvider;

/// Object-safe version of [`CompletionProvider`] with boxed futures.
pub trait CompletionProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, CompletionError>> + Send + 'a>>;
}

/// Blanket implementation: any `CompletionProvider` automatically
/// implements `CompletionProviderDyn`.
impl<T: CompletionProvider> CompletionProviderDyn for T {
    fn name(&self) -> &str {
        CompletionProvider::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, CompletionError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased completion provider.
///
/// Lets the orchestrator accept any backend by substitution -- the real
/// HTTP client in production, a scripted one in tests.
pub struct BoxCompletionProvider {
    inner: Box<dyn CompletionProviderDyn + Send + Sync>,
}

impl BoxCompletionProvider {
    /// Wrap a concrete `CompletionProvider` in a type-erased box.
    pub fn new<T: CompletionProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a completion request and receive the full response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.inner.complete_boxed(request).await
    }
}
