//! Shared types for provider operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::ProviderError;
use crate::routing::RoutingDecision;

/// Default per-request timeout. Generous, since frontier models can be slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default response-size cap for backends that require one.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// An upstream model-serving organization.
///
/// `Openrouter` doubles as the catch-all tag for vendors without direct
/// support: anything unrecognized routes through the OpenRouter gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Anthropic,
    Openai,
    Google,
    Xai,
    Groq,
    Openrouter,
}

impl Vendor {
    /// Canonical lowercase name, as used for provider keys in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "anthropic",
            Vendor::Openai => "openai",
            Vendor::Google => "google",
            Vendor::Xai => "xai",
            Vendor::Groq => "groq",
            Vendor::Openrouter => "openrouter",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Vendor::Anthropic),
            "openai" => Ok(Vendor::Openai),
            "google" => Ok(Vendor::Google),
            "xai" => Ok(Vendor::Xai),
            "groq" => Ok(Vendor::Groq),
            "openrouter" => Ok(Vendor::Openrouter),
            _ => Err(format!("unknown vendor: {}", s)),
        }
    }
}

/// One chat message in the OpenAI-compatible role/content shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Argument bundle for one completion call.
///
/// Exactly one of `messages` or `prompt` must be set; `chat_messages`
/// enforces that before any network I/O happens.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Model alias (e.g. "claude") or full model ID (e.g. "anthropic/claude-sonnet-4.5").
    pub alias_or_id: String,
    /// Chat messages in OpenAI-compatible format.
    pub messages: Option<Vec<ChatMessage>>,
    /// Single user message string (convenience shorthand).
    pub prompt: Option<String>,
    /// Human-readable name for display. Defaults to the model ID.
    pub model_alias: Option<String>,
    /// Debate round (0 = initial, 1+ = reflection, -1 = synthesis). Opaque here.
    pub round_number: i32,
}

impl CompletionRequest {
    pub fn from_prompt(alias_or_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            alias_or_id: alias_or_id.into(),
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn from_messages(alias_or_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            alias_or_id: alias_or_id.into(),
            messages: Some(messages),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.model_alias = Some(alias.into());
        self
    }

    pub fn with_round(mut self, round_number: i32) -> Self {
        self.round_number = round_number;
        self
    }

    /// Check the messages/prompt contract without materializing messages.
    ///
    /// Supplying both or neither of `messages`/`prompt` is a caller
    /// contract violation.
    pub fn validate(&self) -> Result<(), ProviderError> {
        match (&self.messages, &self.prompt) {
            (Some(_), Some(_)) => Err(ProviderError::InvalidRequest(
                "provide either 'messages' or 'prompt', not both",
            )),
            (None, None) => Err(ProviderError::InvalidRequest(
                "one of 'messages' or 'prompt' is required",
            )),
            _ => Ok(()),
        }
    }

    /// Resolve the request into an ordered message list.
    ///
    /// A `prompt` becomes a single user message.
    pub fn chat_messages(&self) -> Result<Vec<ChatMessage>, ProviderError> {
        self.validate()?;
        match (&self.messages, &self.prompt) {
            (Some(messages), _) => Ok(messages.clone()),
            (_, Some(prompt)) => Ok(vec![ChatMessage::user(prompt.clone())]),
            (None, None) => Err(ProviderError::InvalidRequest(
                "one of 'messages' or 'prompt' is required",
            )),
        }
    }
}

/// Construction parameters common to every provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// API key for the vendor.
    pub api_key: String,
    /// Base URL override; each provider has its own public default.
    pub base_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Response-size cap, for backends that require one.
    pub max_tokens: u32,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Uniform, vendor-agnostic outcome of one completion request.
///
/// Presence of `error` is the sole success/failure discriminator: callers
/// must treat `error != None` as failure regardless of `content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Backend-specific identifier actually sent.
    pub model_id: String,
    /// Human-facing name used for display.
    pub model_alias: String,
    /// Caller-supplied round tag, opaque to this layer.
    pub round_number: i32,
    /// Concatenated textual reply; empty on failure.
    pub content: String,
    /// Wall-clock duration of the network call, when one completed or timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Total token usage, when the backend reported both halves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    /// Human-readable failure description. `Some` means the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Routing decision that produced this result, attached for observability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingDecision>,
    /// Caller-populated metadata slot (e.g. "initial", "synthesis").
    #[serde(default)]
    pub role: String,
    /// Caller-populated analysis slot, opaque to this layer.
    #[serde(default)]
    pub analysis: serde_json::Map<String, serde_json::Value>,
}

impl ModelResponse {
    /// Build a failure result with empty content.
    pub fn failure(
        model_id: impl Into<String>,
        model_alias: impl Into<String>,
        round_number: i32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model_alias: model_alias.into(),
            round_number,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
