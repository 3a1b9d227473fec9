//! Configuration for mutual-dissent.
//!
//! Loads layered configuration: TOML file, then environment variable
//! overrides (`*_API_KEY` for provider keys, `DISSENT_*` for logging).
//! Absence of a provider key means "this vendor is unavailable", never an
//! error.
//!
//! # Example
//!
//! ```rust
//! use mutual_dissent::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.panel.rounds, 1);
//!
//! let toml = r#"
//! [providers]
//! openrouter = "sk-or-v1-test"
//! "#;
//! let config: Config = toml::from_str(toml).unwrap();
//! assert!(config.providers.contains_key("openrouter"));
//! ```

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::Vendor;
use crate::routing::RoutingMode;

/// Environment variables consulted for provider keys, by vendor.
const KEY_ENV_VARS: &[(&str, &str)] = &[
    ("openrouter", "OPENROUTER_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("openai", "OPENAI_API_KEY"),
    ("google", "GOOGLE_API_KEY"),
    ("xai", "XAI_API_KEY"),
    ("groq", "GROQ_API_KEY"),
];

/// Where a provider key came from, for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    File,
    Env,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::File => "file",
            KeySource::Env => "env",
        }
    }
}

/// One alias table entry: the gateway-form ID, plus an optional
/// vendor-native form for direct routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAlias {
    /// OpenRouter-form model ID (e.g. "anthropic/claude-sonnet-4.5").
    pub openrouter: String,
    /// Vendor-native model ID for direct calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<String>,
}

/// Per-alias routing modes and the global default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub default_mode: Option<RoutingMode>,
    pub models: HashMap<String, RoutingMode>,
}

/// Debate panel defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub models: Vec<String>,
    pub synthesizer: String,
    pub rounds: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            models: vec![
                "claude".to_string(),
                "gpt".to_string(),
                "gemini".to_string(),
            ],
            synthesizer: "claude".to_string(),
            rounds: 1,
        }
    }
}

/// Request limits applied to every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            max_tokens: 4096,
        }
    }
}

impl LimitsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Unified application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vendor name -> API key.
    pub providers: HashMap<String, String>,
    /// Vendor name -> base URL override.
    pub endpoints: HashMap<String, String>,
    /// Alias table.
    pub models: HashMap<String, ModelAlias>,
    pub routing: RoutingConfig,
    pub panel: PanelConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
    /// Where each key came from. Not part of the file format.
    #[serde(skip)]
    pub key_sources: HashMap<String, KeySource>,
    /// Path the config was loaded from, if any.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let mut models = HashMap::new();
        models.insert(
            "claude".to_string(),
            ModelAlias {
                openrouter: "anthropic/claude-sonnet-4.5".to_string(),
                direct: Some("claude-sonnet-4-5-20250929".to_string()),
            },
        );
        models.insert(
            "gpt".to_string(),
            ModelAlias {
                openrouter: "openai/gpt-5.2".to_string(),
                direct: None,
            },
        );
        models.insert(
            "gemini".to_string(),
            ModelAlias {
                openrouter: "google/gemini-2.5-pro".to_string(),
                direct: None,
            },
        );
        models.insert(
            "grok".to_string(),
            ModelAlias {
                openrouter: "x-ai/grok-4".to_string(),
                direct: None,
            },
        );

        Self {
            providers: HashMap::new(),
            endpoints: HashMap::new(),
            models,
            routing: RoutingConfig::default(),
            panel: PanelConfig::default(),
            limits: LimitsConfig::default(),
            logging: LoggingConfig::default(),
            key_sources: HashMap::new(),
            path: None,
        }
    }
}

impl Config {
    /// Default config file location: `~/.mutual-dissent/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".mutual-dissent").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; with `None`, the default path is used
    /// when present and built-in defaults otherwise. Environment
    /// overrides are applied last and win over the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                Self::from_file(p)?
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };

        let file_keys: Vec<String> = config.providers.keys().cloned().collect();
        for name in file_keys {
            config.key_sources.insert(name, KeySource::File);
        }

        Ok(config.with_env_overrides())
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Provider keys come from the conventional `*_API_KEY` variables;
    /// logging from `DISSENT_LOG_LEVEL` / `DISSENT_LOG_FORMAT`. Invalid
    /// values are ignored and defaults kept.
    pub fn with_env_overrides(mut self) -> Self {
        for (vendor, var) in KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.is_empty() {
                    self.providers.insert(vendor.to_string(), key);
                    self.key_sources.insert(vendor.to_string(), KeySource::Env);
                }
            }
        }

        if let Ok(level) = std::env::var("DISSENT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DISSENT_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3).contains(&self.panel.rounds) {
            return Err(ConfigError::Validation {
                field: "panel.rounds".to_string(),
                message: "rounds must be between 1 and 3".to_string(),
            });
        }
        if self.limits.max_tokens == 0 {
            return Err(ConfigError::Validation {
                field: "limits.max_tokens".to_string(),
                message: "max_tokens must be non-zero".to_string(),
            });
        }
        for (alias, entry) in &self.models {
            if entry.openrouter.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("models.{}.openrouter", alias),
                    message: "OpenRouter model ID cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// API key for `vendor`, if one is configured and non-empty.
    pub fn provider_key(&self, vendor: Vendor) -> Option<&str> {
        self.providers
            .get(vendor.as_str())
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// Where the key for `vendor` came from, if any.
    pub fn key_source(&self, vendor: Vendor) -> Option<KeySource> {
        self.key_sources.get(vendor.as_str()).copied()
    }

    /// Routing mode for `alias_or_id`: per-alias entry, then the global
    /// default, then `auto`.
    pub fn mode_for(&self, alias_or_id: &str) -> RoutingMode {
        self.routing
            .models
            .get(alias_or_id)
            .copied()
            .or(self.routing.default_mode)
            .unwrap_or_default()
    }

    /// Resolve an alias to the model ID to send on the wire.
    ///
    /// With `direct`, the vendor-native form is preferred when the alias
    /// defines one. Unknown aliases pass through unchanged, assuming the
    /// caller supplied a full model ID.
    pub fn resolve_model(&self, alias_or_id: &str, direct: bool) -> String {
        if let Some(alias) = self.models.get(alias_or_id) {
            if direct {
                if let Some(direct_id) = &alias.direct {
                    return direct_id.clone();
                }
            }
            return alias.openrouter.clone();
        }
        alias_or_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.providers.is_empty());
        assert_eq!(config.panel.models, vec!["claude", "gpt", "gemini"]);
        assert_eq!(config.panel.synthesizer, "claude");
        assert_eq!(config.panel.rounds, 1);
        assert_eq!(config.limits.request_timeout_secs, 120);
        assert_eq!(
            config.models["claude"].openrouter,
            "anthropic/claude-sonnet-4.5"
        );
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
        [providers]
        openrouter = "sk-or-v1-abc"

        [routing]
        default_mode = "openrouter"

        [routing.models]
        claude = "direct"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.providers["openrouter"], "sk-or-v1-abc");
        assert_eq!(config.routing.default_mode, Some(RoutingMode::Openrouter));
        assert_eq!(config.routing.models["claude"], RoutingMode::Direct);
        // Untouched sections keep their defaults.
        assert_eq!(config.panel.rounds, 1);
    }

    #[test]
    fn test_parse_model_aliases() {
        let toml = r#"
        [models.claude]
        openrouter = "anthropic/claude-sonnet-4.5"
        direct = "claude-sonnet-4-5-20250929"

        [models.gpt]
        openrouter = "openai/gpt-5.2"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.models["claude"].direct.as_deref(),
            Some("claude-sonnet-4-5-20250929")
        );
        assert!(config.models["gpt"].direct.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[limits]\nrequest_timeout_secs = 30").unwrap();

        let config = Config::load(Some(temp.path())).unwrap();
        assert_eq!(config.limits.request_timeout_secs, 30);
        assert_eq!(config.path.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_file_keys_tracked_as_file_source() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[providers]\ngroq = \"gsk-test\"").unwrap();

        let config = Config::load(Some(temp.path())).unwrap();
        assert_eq!(config.key_source(Vendor::Groq), Some(KeySource::File));
    }

    #[test]
    fn test_env_override_provider_key() {
        std::env::set_var("GROQ_API_KEY", "gsk-env-test");
        let config = Config::default().with_env_overrides();
        std::env::remove_var("GROQ_API_KEY");

        assert_eq!(config.providers["groq"], "gsk-env-test");
        assert_eq!(config.key_source(Vendor::Groq), Some(KeySource::Env));
    }

    #[test]
    fn test_env_override_log_level() {
        std::env::set_var("DISSENT_LOG_LEVEL", "debug");
        let config = Config::default().with_env_overrides();
        std::env::remove_var("DISSENT_LOG_LEVEL");

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_provider_key_ignores_empty() {
        let mut config = Config::default();
        config
            .providers
            .insert("anthropic".to_string(), String::new());
        assert!(config.provider_key(Vendor::Anthropic).is_none());
    }

    #[test]
    fn test_mode_for_precedence() {
        let mut config = Config::default();
        assert_eq!(config.mode_for("claude"), RoutingMode::Auto);

        config.routing.default_mode = Some(RoutingMode::Openrouter);
        assert_eq!(config.mode_for("claude"), RoutingMode::Openrouter);

        config
            .routing
            .models
            .insert("claude".to_string(), RoutingMode::Direct);
        assert_eq!(config.mode_for("claude"), RoutingMode::Direct);
        assert_eq!(config.mode_for("gpt"), RoutingMode::Openrouter);
    }

    #[test]
    fn test_resolve_model_forms() {
        let config = Config::default();
        assert_eq!(
            config.resolve_model("claude", false),
            "anthropic/claude-sonnet-4.5"
        );
        assert_eq!(
            config.resolve_model("claude", true),
            "claude-sonnet-4-5-20250929"
        );
        // No direct form: falls back to the gateway form.
        assert_eq!(config.resolve_model("gpt", true), "openai/gpt-5.2");
        // Unknown alias: passes through.
        assert_eq!(
            config.resolve_model("mistralai/mistral-large", false),
            "mistralai/mistral-large"
        );
    }

    #[test]
    fn test_validate_rejects_bad_rounds() {
        let mut config = Config::default();
        config.panel.rounds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "panel.rounds"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_alias_target() {
        let mut config = Config::default();
        config.models.insert(
            "bad".to_string(),
            ModelAlias {
                openrouter: String::new(),
                direct: None,
            },
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field.contains("bad")
        ));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }
}
