//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Inbound server section
    #[serde(default)]
    pub server: ServerSection,

    /// YOURLS section
    #[serde(default)]
    pub yourls: YourlsSection,

    /// Notion section
    #[serde(default)]
    pub notion: NotionSection,

    /// Page property names
    #[serde(default)]
    pub properties: PropertiesSection,

    /// Outbound HTTP section
    #[serde(default)]
    pub http: HttpSection,

    /// Success notification section
    #[serde(default)]
    pub notify: NotifySection,

    /// Logging section
    #[serde(default)]
    pub log: LogSection,
}

/// Inbound server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Listen address
    pub listen: Option<String>,

    /// Webhook route path
    pub webhook_path: Option<String>,

    /// Token inbound callers must present
    pub inbound_token: Option<String>,
}

/// YOURLS section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YourlsSection {
    /// `yourls-api.php` endpoint
    pub api: Option<String>,

    /// Signature token
    pub signature: Option<String>,

    /// Prefix of the link title
    pub title_prefix: Option<String>,
}

/// Notion section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotionSection {
    /// Integration token
    pub token: Option<String>,

    /// Database id or URL
    pub database_id: Option<String>,

    /// `Notion-Version` header
    pub version: Option<String>,

    /// API base URL
    pub api_base: Option<String>,
}

/// Page property names section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertiesSection {
    /// Payment URL property
    pub payment_url: Option<String>,

    /// Order id property
    pub order_id: Option<String>,

    /// Existing short link property
    pub existing_short_url: Option<String>,

    /// Write-back property
    pub short_url: Option<String>,
}

/// Outbound HTTP section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Per-call timeout in seconds
    pub timeout: Option<u64>,
}

/// Success notification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Notification URL; notifications are disabled when absent
    pub url: Option<String>,

    /// HTTP method (default: POST)
    pub method: Option<String>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,

    /// Handlebars body template
    pub body_template: Option<String>,
}

/// Logging section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,

    /// Enable debug logging
    #[serde(default)]
    pub verbose: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# shortlink-relay configuration file
#
# Every value can also be given on the command line; secrets and endpoints
# additionally read YOURLS_API, YOURLS_SIGNATURE, NOTION_TOKEN,
# NOTION_DATABASE_ID, NOTION_VERSION and RELAY_INBOUND_TOKEN.

[server]
# Listen address (default: 0.0.0.0:8080)
# listen = "0.0.0.0:8080"

# Webhook route path (default: /webhook)
# webhook_path = "/webhook"

# Require "Authorization: Bearer <token>" or "X-Relay-Token: <token>"
# inbound_token = "change-me"

[yourls]
# yourls-api.php endpoint (required)
# api = "https://s.example.com/yourls-api.php"

# Signature token (required)
# signature = "your-signature"

# Title prefix; the order id is appended (default: "短網址：")
# title_prefix = "短網址："

[notion]
# Integration token (required)
# token = "secret_xxx"

# Database id, or the database URL copied from Notion (required)
# database_id = "0123456789abcdef0123456789abcdef"

# Notion-Version header (default: 2022-06-28)
# version = "2022-06-28"

[properties]
# Page property names (defaults shown)
# payment_url = "付款網址"
# order_id = "訂單編號"
# existing_short_url = "產生短網址"
# short_url = "短網址"

[http]
# Per-call timeout in seconds (default: 15)
# timeout = 15

[notify]
# Notification URL; notifications are disabled when absent
# url = "https://chat.example.com/hooks/abc"

# HTTP method (default: POST)
# method = "POST"

# HTTP headers
# [notify.headers]
# X-Custom-Header = "value"

# Bearer token for Authorization header
# bearer = "your-token-here"

# Handlebars body template
# Available variables: {{short_url}}, {{order_id}}, {{record_id}}, {{payment_url}}, {{mode}}
# body_template = '{"text":"短網址已產生：{{short_url}}（訂單 {{order_id}}）"}'

[log]
# Append logs to this file instead of stderr
# file = "shortlink-relay.log"

# Enable debug logging
# verbose = false
"#
    .to_string()
}
