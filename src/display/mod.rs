//! Terminal output formatting for CLI commands.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::config::Config;
use crate::provider::{ModelResponse, Vendor};
use crate::routing::RoutingDecision;

/// Vendors shown in `config show`, in display order.
const DISPLAY_VENDORS: &[Vendor] = &[
    Vendor::Openrouter,
    Vendor::Anthropic,
    Vendor::Openai,
    Vendor::Google,
    Vendor::Xai,
    Vendor::Groq,
];

/// Mask an API key for display, keeping just enough to recognize it.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "•".repeat(chars.len().max(4));
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Render a latency as seconds with one decimal, e.g. "1.2s".
pub fn format_latency(latency_ms: Option<u64>) -> String {
    match latency_ms {
        Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
        None => "-".to_string(),
    }
}

/// Human-readable route taken for a decision.
pub fn format_route(decision: &RoutingDecision) -> String {
    if decision.via_openrouter {
        "openrouter".to_string()
    } else {
        format!("direct ({})", decision.vendor)
    }
}

/// Render the full configuration summary for `config show`.
pub fn render_config_show(config: &Config) -> String {
    let mut out = String::new();

    let path = config
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(built-in defaults)".to_string());
    out.push_str(&format!("{} {}\n\n", "Config:".bold(), path));

    out.push_str(&format!(
        "{} models={} synthesizer={} rounds={}\n\n",
        "Panel:".bold(),
        config.panel.models.join(", "),
        config.panel.synthesizer,
        config.panel.rounds
    ));

    let mut keys = Table::new();
    keys.load_preset(UTF8_FULL);
    keys.set_content_arrangement(ContentArrangement::Dynamic);
    keys.set_header(vec!["Provider", "API Key", "Source"]);
    for vendor in DISPLAY_VENDORS {
        let (key_cell, source_cell) = match config.provider_key(*vendor) {
            Some(key) => {
                let source = config
                    .key_source(*vendor)
                    .map(|s| s.as_str())
                    .unwrap_or("file");
                (mask_key(key), source.to_string())
            }
            None => ("not configured".dimmed().to_string(), "-".to_string()),
        };
        keys.add_row(vec![
            Cell::new(vendor.as_str()),
            Cell::new(key_cell),
            Cell::new(source_cell),
        ]);
    }
    out.push_str(&keys.to_string());
    out.push('\n');

    let mut aliases = Table::new();
    aliases.load_preset(UTF8_FULL);
    aliases.set_content_arrangement(ContentArrangement::Dynamic);
    aliases.set_header(vec!["Alias", "OpenRouter ID", "Direct ID", "Mode"]);
    let mut names: Vec<&String> = config.models.keys().collect();
    names.sort();
    for name in names {
        let entry = &config.models[name];
        aliases.add_row(vec![
            Cell::new(name),
            Cell::new(&entry.openrouter),
            Cell::new(entry.direct.as_deref().unwrap_or("-")),
            Cell::new(config.mode_for(name).as_str()),
        ]);
    }
    out.push_str(&aliases.to_string());
    out.push('\n');

    out
}

/// One row of `config test` output: a connectivity probe result.
#[derive(Debug, Clone)]
pub struct ProbeRow {
    pub alias: String,
    pub model_id: String,
    pub route: String,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

impl ProbeRow {
    pub fn from_response(alias: &str, response: &ModelResponse) -> Self {
        Self {
            alias: alias.to_string(),
            model_id: response.model_id.clone(),
            route: response
                .routing
                .as_ref()
                .map(format_route)
                .unwrap_or_else(|| "-".to_string()),
            latency_ms: response.latency_ms,
            error: response.error.clone(),
        }
    }
}

/// Render `config test` probe results as a table.
pub fn render_probe_table(rows: &[ProbeRow]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Alias", "Model", "Route", "Latency", "Status"]);

    for row in rows {
        let status = match &row.error {
            None => "✓ ok".green().to_string(),
            Some(e) => format!("✗ {}", e).red().to_string(),
        };
        table.add_row(vec![
            Cell::new(&row.alias),
            Cell::new(&row.model_id),
            Cell::new(&row.route),
            Cell::new(format_latency(row.latency_ms)),
            Cell::new(status),
        ]);
    }

    table.to_string()
}

/// Render a batch of panel responses for `ask`.
pub fn render_responses(responses: &[ModelResponse]) -> String {
    let mut out = String::new();
    for response in responses {
        let route = response
            .routing
            .as_ref()
            .map(format_route)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "\n{} [{} | {}]\n",
            response.model_alias.bold().cyan(),
            route,
            format_latency(response.latency_ms)
        ));
        match &response.error {
            Some(error) => out.push_str(&format!("{}\n", error.red())),
            None => out.push_str(&format!("{}\n", response.content)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingMode;

    #[test]
    fn test_mask_key_long() {
        let masked = mask_key("sk-or-v1-0123456789abcdef");
        assert_eq!(masked, "sk-or-...cdef");
        assert!(!masked.contains("0123456789"));
    }

    #[test]
    fn test_mask_key_short_fully_hidden() {
        let masked = mask_key("secret");
        assert!(!masked.contains("secret"));
        assert!(!masked.contains('s'));
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(Some(1234)), "1.2s");
        // 150ms sits on the 0.15 float boundary and rounds down.
        assert_eq!(format_latency(Some(150)), "0.1s");
        assert_eq!(format_latency(Some(999)), "1.0s");
        assert_eq!(format_latency(Some(0)), "0.0s");
        assert_eq!(format_latency(None), "-");
    }

    #[test]
    fn test_format_route() {
        let gateway = RoutingDecision {
            vendor: Vendor::Anthropic,
            mode: RoutingMode::Auto,
            via_openrouter: true,
        };
        assert_eq!(format_route(&gateway), "openrouter");

        let direct = RoutingDecision {
            vendor: Vendor::Anthropic,
            mode: RoutingMode::Direct,
            via_openrouter: false,
        };
        assert_eq!(format_route(&direct), "direct (anthropic)");
    }

    #[test]
    fn test_render_config_show_masks_keys() {
        let mut config = Config::default();
        config.providers.insert(
            "anthropic".to_string(),
            "sk-ant-REDACTED".to_string(),
        );
        let output = render_config_show(&config);
        assert!(output.contains("sk-ant..."));
        assert!(!output.contains("0123456789"));
        assert!(output.contains("not configured"));
    }

    #[test]
    fn test_render_config_show_lists_aliases() {
        let output = render_config_show(&Config::default());
        assert!(output.contains("claude"));
        assert!(output.contains("anthropic/claude-sonnet-4.5"));
    }

    #[test]
    fn test_render_probe_table() {
        let rows = vec![
            ProbeRow {
                alias: "claude".to_string(),
                model_id: "anthropic/claude-sonnet-4.5".to_string(),
                route: "openrouter".to_string(),
                latency_ms: Some(1200),
                error: None,
            },
            ProbeRow {
                alias: "gpt".to_string(),
                model_id: "openai/gpt-5.2".to_string(),
                route: "openrouter".to_string(),
                latency_ms: None,
                error: Some("HTTP 401: invalid key".to_string()),
            },
        ];
        let output = render_probe_table(&rows);
        assert!(output.contains("claude"));
        assert!(output.contains("1.2s"));
        assert!(output.contains("HTTP 401"));
    }

    #[test]
    fn test_render_responses_shows_error_body() {
        let ok = ModelResponse {
            model_id: "anthropic/claude-sonnet-4.5".to_string(),
            model_alias: "claude".to_string(),
            content: "Hello there.".to_string(),
            latency_ms: Some(900),
            ..Default::default()
        };
        let failed = ModelResponse::failure("openai/gpt-5.2", "gpt", 0, "Request timed out");
        let output = render_responses(&[ok, failed]);
        assert!(output.contains("Hello there."));
        assert!(output.contains("Request timed out"));
    }
}
