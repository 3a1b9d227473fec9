//! Vendor resolution for model aliases and IDs.

use crate::config::Config;
use crate::provider::Vendor;

/// Map an OpenRouter-style model ID prefix to a vendor.
///
/// The table is closed: unknown prefixes resolve to the OpenRouter
/// catch-all, meaning the request routes through the gateway.
fn vendor_for_prefix(prefix: &str) -> Vendor {
    match prefix {
        "anthropic" => Vendor::Anthropic,
        "openai" => Vendor::Openai,
        "google" => Vendor::Google,
        "x-ai" => Vendor::Xai,
        "groq" => Vendor::Groq,
        _ => Vendor::Openrouter,
    }
}

/// Determine the vendor for a model alias or full model ID.
///
/// Pure and total. Resolution order:
///
/// 1. A configured alias resolves through the vendor prefix of its
///    OpenRouter-form ID.
/// 2. A raw input containing `/` resolves through its own prefix.
/// 3. Everything else falls back to [`Vendor::Openrouter`].
///
/// Alias-table lookups deliberately precede raw slash-splitting so a
/// configured alias never gets mis-resolved by a coincidental substring.
pub fn resolve_vendor(alias_or_id: &str, config: &Config) -> Vendor {
    if let Some(alias) = config.models.get(alias_or_id) {
        if let Some((prefix, _)) = alias.openrouter.split_once('/') {
            return vendor_for_prefix(prefix);
        }
    }

    if let Some((prefix, _)) = alias_or_id.split_once('/') {
        return vendor_for_prefix(prefix);
    }

    Vendor::Openrouter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelAlias;

    fn config_with_alias(alias: &str, openrouter_id: &str) -> Config {
        let mut config = Config::default();
        config.models.clear();
        config.models.insert(
            alias.to_string(),
            ModelAlias {
                openrouter: openrouter_id.to_string(),
                direct: None,
            },
        );
        config
    }

    #[test]
    fn test_resolves_configured_alias_by_prefix() {
        let config = config_with_alias("claude", "anthropic/claude-sonnet-4.5");
        assert_eq!(resolve_vendor("claude", &config), Vendor::Anthropic);
    }

    #[test]
    fn test_alias_lookup_precedes_slash_split() {
        // The alias itself contains a slash, but the configured table wins.
        let config = config_with_alias("openai/custom", "anthropic/claude-sonnet-4.5");
        assert_eq!(resolve_vendor("openai/custom", &config), Vendor::Anthropic);
    }

    #[test]
    fn test_resolves_full_id_by_prefix() {
        let config = Config::default();
        assert_eq!(resolve_vendor("openai/gpt-5.2", &config), Vendor::Openai);
        assert_eq!(resolve_vendor("x-ai/grok-4", &config), Vendor::Xai);
        assert_eq!(
            resolve_vendor("google/gemini-2.5-pro", &config),
            Vendor::Google
        );
        assert_eq!(resolve_vendor("groq/llama-3.3-70b", &config), Vendor::Groq);
    }

    #[test]
    fn test_unknown_prefix_falls_back_to_openrouter() {
        let config = Config::default();
        assert_eq!(
            resolve_vendor("mistralai/mistral-large", &config),
            Vendor::Openrouter
        );
    }

    #[test]
    fn test_unknown_alias_without_slash_falls_back() {
        let mut config = Config::default();
        config.models.clear();
        assert_eq!(resolve_vendor("claude", &config), Vendor::Openrouter);
    }

    #[test]
    fn test_alias_with_slashless_id_falls_through() {
        // Alias exists but its gateway form carries no vendor prefix.
        let config = config_with_alias("local", "some-local-model");
        assert_eq!(resolve_vendor("local", &config), Vendor::Openrouter);
    }
}
