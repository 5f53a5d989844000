//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

const REQUIRED: [&str; 8] = [
    "--yourls-api",
    "https://s.example.com/yourls-api.php",
    "--yourls-signature",
    "sig",
    "--notion-token",
    "secret_x",
    "--notion-database",
    "0123456789abcdef0123456789abcdef",
];

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["shortlink-relay"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to create CLI args with every required value plus `extra`
fn cli_with_required(extra: &[&str]) -> Cli {
    let mut args = REQUIRED.to_vec();
    args.extend(extra);
    cli(&args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod precedence_tests;
