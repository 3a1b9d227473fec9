//! Routing policy evaluation.
//!
//! `decide` is a pure function over the routing config, configured keys,
//! and registered direct implementations. It performs no I/O and its
//! output is embedded by value into every `ModelResponse`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::provider::{ProviderRegistry, Vendor};

/// Routing policy for one alias or model ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Route directly when both a key and an implementation exist,
    /// otherwise silently through OpenRouter.
    #[default]
    Auto,
    /// Require direct routing; falls back with a warning when impossible.
    Direct,
    /// Always route through OpenRouter.
    Openrouter,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::Auto => "auto",
            RoutingMode::Direct => "direct",
            RoutingMode::Openrouter => "openrouter",
        }
    }
}

/// Result of a routing policy evaluation.
///
/// `vendor` always reflects the original resolution, even when a fallback
/// sent the request through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub vendor: Vendor,
    pub mode: RoutingMode,
    pub via_openrouter: bool,
}

/// Evaluate the routing policy for `alias_or_id`.
///
/// The two `direct`-mode fallback causes are distinguishable in the logs:
/// a missing API key and a missing provider implementation each produce
/// their own warning. `auto` mode falls back silently; that is the
/// expected case for most vendors.
pub fn decide(
    alias_or_id: &str,
    vendor: Vendor,
    config: &Config,
    registry: &ProviderRegistry,
) -> RoutingDecision {
    let mode = config.mode_for(alias_or_id);
    let has_key = config.provider_key(vendor).is_some();
    let has_implementation = registry.contains(vendor);

    let via_openrouter = match mode {
        RoutingMode::Openrouter => true,
        RoutingMode::Direct => {
            if !has_key {
                tracing::warn!(
                    alias = alias_or_id,
                    vendor = %vendor,
                    "direct mode requested but no API key for vendor; falling back to OpenRouter"
                );
                true
            } else if !has_implementation {
                tracing::warn!(
                    alias = alias_or_id,
                    vendor = %vendor,
                    "direct mode requested but no provider implementation for vendor; \
                     falling back to OpenRouter"
                );
                true
            } else {
                false
            }
        }
        RoutingMode::Auto => !(has_key && has_implementation),
    };

    RoutingDecision {
        vendor,
        mode,
        via_openrouter,
    }
}
