//! Chat title generation via the completion provider.
//!
//! `generate_chat_title` produces a short title for a chat from the first
//! user message. The raw completion output is cleaned up: surrounding
//! quotes stripped, truncated to `MAX_GENERATED_TITLE_CHARS`, trailing
//! whitespace removed.

use parley_types::chat::MAX_GENERATED_TITLE_CHARS;
use parley_types::llm::{CompletionError, CompletionRequest};

use crate::completion::BoxCompletionProvider;

/// System prompt for the title generation call.
const TITLE_SYSTEM_PROMPT: &str = "Generate a short, descriptive title (at most 30 characters) \
for a conversation that opens with the user's message. Return ONLY the title text, nothing else.";

/// Generate a chat title from the first user message.
///
/// Uses a low temperature (0.3) and a strict prompt. Returns
/// `CompletionError::Empty` when nothing usable survives cleanup, so the
/// caller's skip-on-failure path handles blank output like any other
/// provider failure.
#[tracing::instrument(name = "generate_chat_title", skip(provider, first_user_message))]
pub async fn generate_chat_title(
    provider: &BoxCompletionProvider,
    first_user_message: &str,
) -> Result<String, CompletionError> {
    let request = CompletionRequest::from_prompt(first_user_message, 50)
        .with_system(TITLE_SYSTEM_PROMPT)
        .with_temperature(0.3);

    let response = provider.complete(&request).await?;

    let title = tidy_title(&response.text);
    if title.is_empty() {
        return Err(CompletionError::Empty);
    }
    Ok(title)
}

/// Strip surrounding quotes, truncate to the title length cap, and drop any
/// trailing whitespace or quote the truncation may have exposed.
fn tidy_title(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim_matches('\'').trim();
    let truncated: String = trimmed.chars().take(MAX_GENERATED_TITLE_CHARS).collect();
    truncated
        .trim_end()
        .trim_end_matches(['"', '\''])
        .trim_end()
        .to_string()
}
