//! Wire-format types for the Yandex Foundation Models completion API.
//!
//! The API is camelCase and represents token counts and `maxTokens` as
//! strings (int64-as-string JSON convention).

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YandexCompletionRequest {
    pub model_uri: String,
    pub completion_options: YandexCompletionOptions,
    pub messages: Vec<YandexMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YandexCompletionOptions {
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct YandexMessage {
    pub role: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct YandexCompletionResponse {
    pub result: YandexResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YandexResult {
    #[serde(default)]
    pub alternatives: Vec<YandexAlternative>,
    #[serde(default)]
    pub usage: Option<YandexUsage>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct YandexAlternative {
    pub message: YandexMessage,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YandexUsage {
    #[serde(default)]
    pub input_text_tokens: Option<String>,
    #[serde(default)]
    pub completion_tokens: Option<String>,
}
