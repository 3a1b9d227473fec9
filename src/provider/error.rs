//! Error types for provider operations.
//!
//! These cover caller contract violations only. Network and backend
//! failures are expected operational outcomes and surface as
//! `ModelResponse.error`, never as an `Err` from `complete`.

use thiserror::Error;

/// Errors signaling misuse of a provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Malformed completion request (both or neither of messages/prompt).
    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),

    /// Provider used before `open` or after `close`.
    #[error("Provider '{0}' is not open")]
    NotOpen(&'static str),

    /// Provider construction failed (bad key, bad base URL).
    #[error("Configuration error: {0}")]
    Configuration(String),
}
