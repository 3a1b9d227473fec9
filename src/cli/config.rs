//! Config command handlers.

use anyhow::{bail, Context};
use std::fs;

use crate::cli::ConfigInitArgs;
use crate::config::Config;
use crate::display::{render_config_show, render_probe_table, ProbeRow};
use crate::provider::CompletionRequest;
use crate::routing::ProviderRouter;

const EXAMPLE_CONFIG: &str = include_str!("../../dissent.example.toml");

/// Prompt used for connectivity probes. Short on purpose.
const PROBE_PROMPT: &str = "Reply with the single word OK.";

/// Handle `dissent config show`.
pub fn handle_config_show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render_config_show(config));
    Ok(())
}

/// Handle `dissent config path`.
pub fn handle_config_path() -> anyhow::Result<()> {
    match Config::default_path() {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("could not determine home directory"),
    }
}

/// Handle `dissent config test`: send a minimal completion to every
/// panel model and report route, latency, and status per alias.
pub async fn handle_config_test(config: Config) -> anyhow::Result<()> {
    let panel = config.panel.models.clone();
    let mut router = ProviderRouter::new(config);
    router.open().await.context("failed to open providers")?;

    let requests = panel
        .iter()
        .map(|alias| {
            CompletionRequest::from_prompt(alias.clone(), PROBE_PROMPT).with_alias(alias.clone())
        })
        .collect();
    let responses = router.complete_parallel(requests).await?;
    router.close().await;

    let rows: Vec<ProbeRow> = panel
        .iter()
        .zip(&responses)
        .map(|(alias, response)| ProbeRow::from_response(alias, response))
        .collect();
    println!("{}", render_probe_table(&rows));

    if responses.iter().any(|r| r.is_error()) {
        bail!("one or more providers failed the connectivity test");
    }
    Ok(())
}

/// Handle `dissent config init`.
pub fn handle_config_init(args: &ConfigInitArgs) -> anyhow::Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => Config::default_path().context("could not determine home directory")?,
    };

    if output.exists() && !args.force {
        bail!(
            "File already exists: {}. Use --force to overwrite.",
            output.display()
        );
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, EXAMPLE_CONFIG)?;

    println!("✓ Configuration file created: {}", output.display());
    println!("  Add provider API keys to start asking the panel.");

    Ok(())
}
