//! OpenRouter provider implementation.
//!
//! The gateway variant: one aggregation endpoint fronting many vendors
//! under a single bearer token and the OpenAI chat schema. Messages pass
//! through unchanged, system roles included.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::types::{ChatMessage, CompletionRequest, ModelResponse, ProviderSettings, Vendor};
use super::{extract_error_message, Provider, ProviderError};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";

/// Provider for the OpenRouter aggregation endpoint.
pub struct OpenRouterProvider {
    settings: ProviderSettings,
    base_url: String,
    client: Option<Client>,
}

impl OpenRouterProvider {
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

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

#[async_trait]
impl Provider for OpenRouterProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Openrouter
    }

    fn is_open(&self) -> bool {
        self.client.is_some()
    }

    async fn open(&mut self) -> Result<(), ProviderError> {
        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", self.settings.api_key)).map_err(|e| {
                ProviderError::Configuration(format!("invalid OpenRouter API key: {}", e))
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

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
            .ok_or(ProviderError::NotOpen("openrouter"))?;
        let messages = request.chat_messages()?;
        let alias = request
            .model_alias
            .clone()
            .unwrap_or_else(|| model_id.to_string());

        let payload = ChatCompletionRequest {
            model: model_id,
            messages,
        };
        let url = format!("{}/v1/chat/completions", self.base_url);
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

        let data: ChatCompletionResponse = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                return Ok(ModelResponse {
                    model_id: model_id.to_string(),
                    model_alias: alias,
                    round_number: request.round_number,
                    latency_ms: Some(elapsed_ms),
                    error: Some(format!("Failed to parse OpenRouter response: {}", e)),
                    ..Default::default()
                });
            }
        };

        let content = data
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_else(|| "[No content in response]".to_string());

        let usage = data.usage.unwrap_or_default();
        let token_count =
            usage
                .total_tokens
                .or(match (usage.prompt_tokens, usage.completion_tokens) {
                    (Some(prompt), Some(completion)) => Some(prompt + completion),
                    _ => None,
                });

        Ok(ModelResponse {
            model_id: model_id.to_string(),
            model_alias: alias,
            round_number: request.round_number,
            content,
            latency_ms: Some(elapsed_ms),
            token_count,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            ..Default::default()
        })
    }
}
