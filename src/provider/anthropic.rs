//! Anthropic provider implementation.
//!
//! Talks to the Anthropic Messages API directly. Key differences from the
//! OpenRouter gateway:
//!
//! - Auth via `x-api-key` header (not `Authorization: Bearer`).
//! - `max_tokens` is required in every request payload.
//! - System messages must be hoisted to a top-level `system` field.
//! - Response content is an array of typed blocks, not a plain string.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::types::{ChatMessage, CompletionRequest, ModelResponse, ProviderSettings, Vendor};
use super::{extract_error_message, Provider, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider for the Anthropic Messages API.
pub struct AnthropicProvider {
    settings: ProviderSettings,
    base_url: String,
    client: Option<Client>,
}

impl AnthropicProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            settings,
            base_url,
            client: None,
        }
    }
}

/// Separate system messages from chat messages.
///
/// The Messages API requires system prompts in a top-level `system` field
/// rather than inline `{"role": "system"}` entries. Multiple system
/// messages are joined with a blank line, in their original relative
/// order; the remaining messages keep theirs.
fn extract_system(messages: Vec<ChatMessage>) -> (Option<String>, Vec<ChatMessage>) {
    let mut system_parts: Vec<String> = Vec::new();
    let mut chat_messages: Vec<ChatMessage> = Vec::new();

    for message in messages {
        if message.role == "system" {
            system_parts.push(message.content);
        } else {
            chat_messages.push(message);
        }
    }

    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };
    (system, chat_messages)
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}

/// Concatenate every plain-text block, ignoring tool-use and thinking
/// blocks. Returns a marked fallback if no text block exists.
fn extract_content(response: &MessagesResponse) -> String {
    let text: String = response
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();
    if text.is_empty() {
        "[No text content in response]".to_string()
    } else {
        text
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Anthropic
    }

    fn is_open(&self) -> bool {
        self.client.is_some()
    }

    async fn open(&mut self) -> Result<(), ProviderError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&self.settings.api_key).map_err(|e| {
            ProviderError::Configuration(format!("invalid Anthropic API key: {}", e))
        })?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(self.settings.timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ProviderError> {
        self.client = None;
        Ok(())
    }

    async fn complete(
        &self,
        model_id: &str,
        request: &CompletionRequest,
    ) -> Result<ModelResponse, ProviderError> {
        let client = self
            .client
            .as_ref()
            .ok_or(ProviderError::NotOpen("anthropic"))?;
        let resolved = request.chat_messages()?;
        let alias = request
            .model_alias
            .clone()
            .unwrap_or_else(|| model_id.to_string());

        let (system, chat_messages) = extract_system(resolved);
        let payload = MessagesRequest {
            model: model_id,
            max_tokens: self.settings.max_tokens,
            messages: chat_messages,
            system,
        };

        let url = format!("{}/v1/messages", self.base_url);
        let start = Instant::now();

        let response = match client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                return Ok(ModelResponse {
                    model_id: model_id.to_string(),
                    model_alias: alias,
                    round_number: request.round_number,
                    latency_ms: Some(elapsed_ms),
                    error: Some(format!(
                        "Request timed out after {}s",
                        self.settings.timeout.as_secs()
                    )),
                    ..Default::default()
                });
            }
            Err(e) => {
                return Ok(ModelResponse::failure(
                    model_id,
                    alias,
                    request.round_number,
                    format!("Request failed: {}", e),
                ));
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(ModelResponse {
                model_id: model_id.to_string(),
                model_alias: alias,
                round_number: request.round_number,
                latency_ms: Some(elapsed_ms),
                error: Some(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    extract_error_message(&body)
                )),
                ..Default::default()
            });
        }

        let data: MessagesResponse = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                return Ok(ModelResponse {
                    model_id: model_id.to_string(),
                    model_alias: alias,
                    round_number: request.round_number,
                    latency_ms: Some(elapsed_ms),
                    error: Some(format!("Failed to parse Anthropic response: {}", e)),
                    ..Default::default()
                });
            }
        };

        let content = extract_content(&data);
        let usage = data.usage.unwrap_or_default();
        let token_count = match (usage.input_tokens, usage.output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        };

        Ok(ModelResponse {
            model_id: model_id.to_string(),
            model_alias: alias,
            round_number: request.round_number,
            content,
            latency_ms: Some(elapsed_ms),
            token_count,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            ..Default::default()
        })
    }
}
