//! Provider abstraction layer for multi-vendor model access.
//!
//! This module provides the `Provider` trait and supporting types that hide
//! backend-specific authentication, request schemas, and response shapes.
//! Every provider converts its outcomes, success or failure, into the
//! uniform [`ModelResponse`] type.

use async_trait::async_trait;

pub mod anthropic;
pub mod error;
pub mod openrouter;
pub mod registry;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use openrouter::OpenRouterProvider;
pub use registry::ProviderRegistry;
pub use types::{
    ChatMessage, CompletionRequest, ModelResponse, ProviderSettings, Vendor, DEFAULT_MAX_TOKENS,
    DEFAULT_TIMEOUT,
};

/// Maximum length of a raw error-body excerpt carried in diagnostics.
const MAX_ERROR_BODY_LEN: usize = 500;

/// Unified interface for all model backends.
///
/// Each provider owns an exclusive connection pool whose lifetime is scoped
/// to an explicit `open`/`close` pair. Calling `complete` outside that
/// window is a programming error and fails with [`ProviderError::NotOpen`].
///
/// # Object Safety
///
/// The trait is object-safe and used as `Box<dyn Provider>` by the router.
/// `complete` takes `&self` so a single open provider can serve multiple
/// in-flight requests over its shared pool.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The vendor this provider talks to.
    fn vendor(&self) -> Vendor;

    /// Whether the provider is currently inside its open window.
    fn is_open(&self) -> bool;

    /// Establish the connection pool and fixed per-vendor headers.
    async fn open(&mut self) -> Result<(), ProviderError>;

    /// Release the connection pool. The provider must not be used afterwards.
    async fn close(&mut self) -> Result<(), ProviderError>;

    /// Execute one completion request against `model_id`.
    ///
    /// Network and backend failures (timeout, non-2xx status, malformed
    /// body) are captured into the returned [`ModelResponse`] with `error`
    /// set; only contract violations produce an `Err`.
    async fn complete(
        &self,
        model_id: &str,
        request: &CompletionRequest,
    ) -> Result<ModelResponse, ProviderError>;
}

/// Extract a human-readable message from an error response body.
///
/// Both Anthropic and OpenRouter wrap failures as
/// `{"error": {"message": "..."}}`. On any other shape the raw body is
/// returned, truncated so diagnostics never grow unboundedly.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    let mut excerpt: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
    if body.chars().count() > MAX_ERROR_BODY_LEN {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_structured() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens required"}}"#;
        assert_eq!(extract_error_message(body), "max_tokens required");
    }

    #[test]
    fn test_extract_error_message_unstructured_truncates() {
        let body = "x".repeat(800);
        let message = extract_error_message(&body);
        assert_eq!(message.len(), 503); // 500 chars + ellipsis
        assert!(message.ends_with("..."));
    }

    #[test]
    fn test_extract_error_message_short_raw_body() {
        assert_eq!(extract_error_message("502 Bad Gateway"), "502 Bad Gateway");
    }

    #[test]
    fn test_extract_error_message_json_without_message() {
        let body = r#"{"detail": "nope"}"#;
        assert_eq!(extract_error_message(body), body);
    }
}
