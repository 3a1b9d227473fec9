//! Error types for router operations.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors signaling misuse of the router.
///
/// Operational failures (network, backend, unavailability) never take
/// this path; they come back as `ModelResponse.error`.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Router used outside its Open window.
    #[error("Router is not open (current state: {0})")]
    NotOpen(&'static str),

    /// `open` called from a state other than Unopened.
    #[error("Router already {0}; open is entered once")]
    AlreadyTransitioned(&'static str),

    /// Caller contract violation surfaced by a provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
