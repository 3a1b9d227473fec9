//! mutual-dissent: ask a panel of frontier models one question and
//! compare their answers.
//!
//! The crate is organized around a provider routing and dispatch layer:
//!
//! - [`provider`] - vendor clients behind a uniform [`provider::Provider`]
//!   trait, plus the shared request/response types
//! - [`routing`] - alias-to-vendor resolution, routing policy, and the
//!   [`routing::ProviderRouter`] dispatcher
//! - [`config`] - layered TOML + environment configuration
//! - [`display`] - terminal rendering for the CLI
//! - [`cli`] - the `dissent` command-line interface

pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod provider;
pub mod routing;
