//! YandexGptProvider -- concrete [`CompletionProvider`] for the Yandex
//! Foundation Models text-completion endpoint.
//!
//! Sends non-streaming requests to `/foundationModels/v1/completion` with
//! `Authorization: Api-Key` authentication. The API key is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::completion::CompletionProvider;
use parley_types::llm::{
    CompletionError, CompletionRequest, CompletionResponse, Usage,
};

use super::types::{
    YandexCompletionOptions, YandexCompletionRequest, YandexCompletionResponse, YandexMessage,
};

/// Yandex Foundation Models completion provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and only exposed when
/// constructing the HTTP authorization header. The struct intentionally
/// does not derive `Debug`.
pub struct YandexGptProvider {
    client: reqwest::Client,
    api_key: SecretString,
    folder_id: String,
    base_url: String,
    model: String,
    model_version: String,
}

impl YandexGptProvider {
    /// Create a new provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - service-account API key wrapped in SecretString
    /// * `folder_id` - cloud folder the model is billed against
    /// * `model` - model identifier (e.g., "yandexgpt-lite")
    /// * `model_version` - model branch (e.g., "rc" or "latest")
    pub fn new(
        api_key: SecretString,
        folder_id: String,
        model: String,
        model_version: String,
    ) -> Self {
        let client = reqwest::Client::builder()
            // Generous transport ceiling; the orchestrator applies its own
            // per-call timeout well below this.
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            folder_id,
            base_url: "https://llm.api.cloud.yandex.net".to_string(),
            model,
            model_version,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fully-qualified model URI, e.g. `gpt://<folder>/yandexgpt-lite/rc`.
    fn model_uri(&self) -> String {
        format!("gpt://{}/{}/{}", self.folder_id, self.model, self.model_version)
    }

    /// Convert a generic [`CompletionRequest`] into the wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> YandexCompletionRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| YandexMessage {
                role: m.role.to_string(),
                text: m.text.clone(),
            })
            .collect();

        YandexCompletionRequest {
            model_uri: self.model_uri(),
            completion_options: YandexCompletionOptions {
                stream: false,
                temperature: request.temperature,
                max_tokens: request.max_tokens.to_string(),
            },
            messages,
        }
    }
}

impl CompletionProvider for YandexGptProvider {
    fn name(&self) -> &str {
        "yandexgpt"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let body = self.to_wire_request(request);
        let url = format!("{}/foundationModels/v1/completion", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "authorization",
                format!("Api-Key {}", self.api_key.expose_secret()),
            )
            .header("x-folder-id", &self.folder_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => CompletionError::AuthenticationFailed,
                429 => CompletionError::RateLimited,
                _ => CompletionError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let wire: YandexCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Deserialization(format!("failed to parse response: {e}")))?;

        let Some(alternative) = wire.result.alternatives.into_iter().next() else {
            return Err(CompletionError::Empty);
        };

        let usage = wire.result.usage.map(|u| Usage {
            input_tokens: u
                .input_text_tokens
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            output_tokens: u.completion_tokens.and_then(|v| v.parse().ok()).unwrap_or(0),
        });

        Ok(CompletionResponse {
            text: alternative.message.text,
            model_version: wire.result.model_version,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YandexGptProvider {
        YandexGptProvider::new(
            SecretString::from("test-key"),
            "b1gexample".to_string(),
            "yandexgpt-lite".to_string(),
            "rc".to_string(),
        )
    }

    #[test]
    fn test_model_uri_format() {
        assert_eq!(provider().model_uri(), "gpt://b1gexample/yandexgpt-lite/rc");
    }

    #[test]
    fn test_wire_request_carries_prompt_and_options() {
        let request = CompletionRequest::from_prompt("Where to go in Japan?", 2000)
            .with_temperature(0.6);
        let wire = provider().to_wire_request(&request);

        assert_eq!(wire.model_uri, "gpt://b1gexample/yandexgpt-lite/rc");
        assert!(!wire.completion_options.stream);
        assert_eq!(wire.completion_options.max_tokens, "2000");
        assert_eq!(wire.completion_options.temperature, Some(0.6));
        assert_eq!(wire.messages.len(), 1);
        assert_eq!(wire.messages[0].role, "user");
        assert_eq!(wire.messages[0].text, "Where to go in Japan?");
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(CompletionProvider::name(&provider()), "yandexgpt");
    }
}
