//! Command-line interface for the `dissent` binary.
//!
//! # Commands
//!
//! - `ask` - Put a question to the model panel
//! - `config show` - Print the resolved configuration with masked keys
//! - `config test` - Probe connectivity to every panel model
//! - `config path` - Print the default configuration file location
//! - `config init` - Write a starter configuration file
//!
//! # Example
//!
//! ```bash
//! # Ask the default panel
//! dissent ask "What is the best way to version a REST API?"
//!
//! # Ask a custom panel with two debate rounds
//! dissent ask --panel claude,grok --rounds 2 "Is Rust memory safe?"
//!
//! # Check which providers are reachable
//! dissent config test
//! ```

pub mod ask;
pub mod config;

pub use ask::handle_ask;
pub use config::{handle_config_init, handle_config_path, handle_config_show, handle_config_test};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Multi-model debate CLI
#[derive(Parser, Debug)]
#[command(
    name = "dissent",
    version,
    about = "Ask a panel of frontier models and compare their answers"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the model panel a question
    Ask(AskArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to put to the panel
    pub query: String,

    /// Comma-separated model aliases, overriding the configured panel
    #[arg(short, long, value_delimiter = ',')]
    pub panel: Option<Vec<String>>,

    /// Model alias that writes the final synthesis
    #[arg(short, long)]
    pub synthesizer: Option<String>,

    /// Number of debate rounds (1-3)
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Skip the synthesis step and print raw panel answers only
    #[arg(long)]
    pub no_synthesis: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,
    /// Probe connectivity to every panel model
    Test,
    /// Print the default configuration file location
    Path,
    /// Write a starter configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path (defaults to ~/.mutual-dissent/config.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}
