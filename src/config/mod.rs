//! Configuration layer for shortlink-relay.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file discovery and generation ([`discover_config_file`], [`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**, then their environment variables
//!    (`YOURLS_API`, `YOURLS_SIGNATURE`, `NOTION_TOKEN`, `NOTION_DATABASE_ID`,
//!    `NOTION_VERSION`, `RELAY_INBOUND_TOKEN`)
//! 2. **TOML config file** - `--config`, or the first file found by discovery
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The YOURLS endpoint and signature, the Notion token, and the Notion
//! database id have no defaults and must come from one of the first two sources.
//!
//! # TOML-Only Options
//!
//! Property names, the YOURLS title prefix, the Notion API base, and the
//! notification method, headers, and body template are only configurable in
//! the file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{
    ValidatedConfig, discover_config_file, normalize_database_id, write_default_config,
};
