//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use handlebars::Handlebars;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use regex::Regex;
use url::Url;

use crate::event::PropertyNames;
use crate::notify::NotifySettings;
use crate::pipeline::PipelineSettings;
use crate::server::ServerSettings;
use crate::shortener::YourlsSettings;
use crate::store::NotionSettings;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Trailing 32-hex id, dashed (UUID layout) or not.
static DATABASE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9a-f]{8})-?([0-9a-f]{4})-?([0-9a-f]{4})-?([0-9a-f]{4})-?([0-9a-f]{12})$",
    )
    .expect("database id pattern is a valid regex")
});

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config,
/// or [`ValidatedConfig::load`] to also locate and read the config file.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Inbound server settings
    pub server: ServerSettings,

    /// Shortener endpoint
    pub yourls: YourlsSettings,

    /// Document store endpoint
    pub notion: NotionSettings,

    /// Page property names
    pub properties: PropertyNames,

    /// Per-call timeout for outbound requests
    pub timeout: Duration,

    /// Success notification; disabled when `None`
    pub notify: Option<NotifySettings>,

    /// Log file; logs go to stderr when `None`
    pub log_file: Option<PathBuf>,

    /// Verbose logging enabled
    pub verbose: bool,

    /// Config file the values were read from, if any
    pub source: Option<PathBuf>,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self
            .source
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());
        let notify = self
            .notify
            .as_ref()
            .map_or_else(|| "off".to_string(), |n| n.url.to_string());

        write!(
            f,
            "Config {{ listen: {}, path: {}, inbound_token: {}, yourls: {}, notion_database: {}, \
             timeout: {}s, notify: {}, source: {} }}",
            self.server.listen,
            self.server.webhook_path,
            if self.server.inbound_token.is_some() { "set" } else { "none" },
            self.yourls.api,
            self.notion.database_id(),
            self.timeout.as_secs(),
            notify,
            source,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment fallbacks) take precedence over TOML values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (YOURLS endpoint and signature, Notion token and database)
    /// - A URL, listen address, or database id is invalid
    /// - The timeout is zero
    /// - The notification method, headers, or template are invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let server = Self::resolve_server(cli, toml)?;
        let yourls = Self::resolve_yourls(cli, toml)?;
        let notion = Self::resolve_notion(cli, toml)?;
        let properties = Self::resolve_properties(toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let notify = Self::resolve_notify(cli, toml)?;

        let log_file = cli
            .log_file
            .clone()
            .or_else(|| toml.and_then(|t| t.log.file.clone()));

        Ok(Self {
            server,
            yourls,
            notion,
            properties,
            timeout,
            notify,
            log_file,
            verbose: cli.verbose || toml.is_some_and(|t| t.log.verbose),
            source: None,
        })
    }

    /// Loads and merges configuration from CLI and a config file.
    ///
    /// Uses `cli.config` when set; otherwise searches for a config file with
    /// [`discover_config_file`]. Running without any file is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = match cli.config {
            Some(ref path) => Some(path.clone()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| discover_config_file(&cwd)),
        };

        let toml = path.as_deref().map(TomlConfig::load).transpose()?;

        let mut config = Self::from_raw(cli, toml.as_ref())?;
        config.source = path;
        Ok(config)
    }

    /// Splits out the settings the pipeline needs.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            yourls: self.yourls.clone(),
            notion: self.notion.clone(),
            properties: self.properties.clone(),
        }
    }

    fn resolve_server(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ServerSettings, ConfigError> {
        let server = toml.map(|t| &t.server);

        // Priority: CLI explicit > TOML > default
        let listen_str = cli
            .listen
            .as_deref()
            .or_else(|| server.and_then(|s| s.listen.as_deref()))
            .unwrap_or(defaults::LISTEN);

        let listen = listen_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidListen {
                value: listen_str.to_string(),
                reason: e.to_string(),
            })?;

        let webhook_path = cli
            .webhook_path
            .as_deref()
            .or_else(|| server.and_then(|s| s.webhook_path.as_deref()))
            .unwrap_or(defaults::WEBHOOK_PATH);

        if !webhook_path.starts_with('/') {
            return Err(ConfigError::InvalidWebhookPath(webhook_path.to_string()));
        }

        let inbound_token = cli
            .inbound_token
            .clone()
            .or_else(|| server.and_then(|s| s.inbound_token.clone()))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(ServerSettings {
            listen,
            webhook_path: webhook_path.to_string(),
            inbound_token,
        })
    }

    fn resolve_yourls(cli: &Cli, toml: Option<&TomlConfig>) -> Result<YourlsSettings, ConfigError> {
        let yourls = toml.map(|t| &t.yourls);

        let api_str = non_empty(
            cli.yourls_api
                .as_deref()
                .or_else(|| yourls.and_then(|y| y.api.as_deref())),
        )
        .ok_or_else(|| {
            ConfigError::missing(
                field::YOURLS_API,
                "Use --yourls-api, set YOURLS_API, or set yourls.api in config file",
            )
        })?;

        let signature = non_empty(
            cli.yourls_signature
                .as_deref()
                .or_else(|| yourls.and_then(|y| y.signature.as_deref())),
        )
        .ok_or_else(|| {
            ConfigError::missing(
                field::YOURLS_SIGNATURE,
                "Use --yourls-signature, set YOURLS_SIGNATURE, or set yourls.signature in config file",
            )
        })?;

        let title_prefix = yourls
            .and_then(|y| y.title_prefix.clone())
            .unwrap_or_else(|| defaults::TITLE_PREFIX.to_string());

        Ok(YourlsSettings {
            api: parse_url(api_str)?,
            signature: signature.to_string(),
            title_prefix,
        })
    }

    fn resolve_notion(cli: &Cli, toml: Option<&TomlConfig>) -> Result<NotionSettings, ConfigError> {
        let notion = toml.map(|t| &t.notion);

        let token = non_empty(
            cli.notion_token
                .as_deref()
                .or_else(|| notion.and_then(|n| n.token.as_deref())),
        )
        .ok_or_else(|| {
            ConfigError::missing(
                field::NOTION_TOKEN,
                "Use --notion-token, set NOTION_TOKEN, or set notion.token in config file",
            )
        })?;

        let database = non_empty(
            cli.notion_database
                .as_deref()
                .or_else(|| notion.and_then(|n| n.database_id.as_deref())),
        )
        .ok_or_else(|| {
            ConfigError::missing(
                field::NOTION_DATABASE,
                "Use --notion-database, set NOTION_DATABASE_ID, or set notion.database_id in config file",
            )
        })?;

        let version = cli
            .notion_version
            .as_deref()
            .or_else(|| notion.and_then(|n| n.version.as_deref()))
            .unwrap_or(defaults::NOTION_VERSION);

        let api_base = notion
            .and_then(|n| n.api_base.as_deref())
            .unwrap_or(defaults::NOTION_API_BASE);

        let database_id = normalize_database_id(database)?;

        // Header values are checked one at a time so the error names the culprit.
        HeaderValue::from_str(version).map_err(|e| ConfigError::InvalidCredential {
            field: field::NOTION_VERSION,
            reason: e.to_string(),
        })?;

        NotionSettings::new(parse_url(api_base)?, token, version, database_id).map_err(|e| {
            ConfigError::InvalidCredential {
                field: field::NOTION_TOKEN,
                reason: e.to_string(),
            }
        })
    }

    fn resolve_properties(toml: Option<&TomlConfig>) -> Result<PropertyNames, ConfigError> {
        let mut names = PropertyNames::default();
        let Some(section) = toml.map(|t| &t.properties) else {
            return Ok(names);
        };

        let overrides = [
            ("properties.payment_url", &section.payment_url, &mut names.payment_url),
            ("properties.order_id", &section.order_id, &mut names.order_id),
            (
                "properties.existing_short_url",
                &section.existing_short_url,
                &mut names.existing_short_url,
            ),
            ("properties.short_url", &section.short_url, &mut names.short_url),
        ];

        for (key, value, target) in overrides {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::EmptyProperty(key));
                }
                target.clone_from(value);
            }
        }

        Ok(names)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.http.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::TIMEOUT,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_notify(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<NotifySettings>, ConfigError> {
        let notify = toml.map(|t| &t.notify);

        let Some(url_str) = non_empty(
            cli.notify_url
                .as_deref()
                .or_else(|| notify.and_then(|n| n.url.as_deref())),
        ) else {
            return Ok(None);
        };

        let url = parse_url(url_str)?;

        let method_str = notify
            .and_then(|n| n.method.as_deref())
            .unwrap_or(defaults::NOTIFY_METHOD);
        let method = method_str
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(notify) = notify {
            for (name, value) in &notify.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }

            if let Some(ref token) = notify.bearer {
                let header_value = parse_header_value("Authorization", &format!("Bearer {token}"))?;
                headers.insert(AUTHORIZATION, header_value);
            }
        }

        let body_template = notify
            .and_then(|n| n.body_template.clone())
            .unwrap_or_else(|| defaults::NOTIFY_BODY_TEMPLATE.to_string());
        validate_template(&body_template)?;

        Ok(Some(NotifySettings {
            url,
            method,
            headers,
            body_template,
        }))
    }
}

/// Finds the config file to use when none was given explicitly.
///
/// Looks for `shortlink-relay.toml` in `start` and each of its ancestors,
/// then for `shortlink-relay/config.toml` in the user config directory.
#[must_use]
pub fn discover_config_file(start: &Path) -> Option<PathBuf> {
    find_in_ancestors(start).or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join(defaults::CONFIG_DIR_NAME).join("config.toml"))
            .filter(|path| path.is_file())
    })
}

fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(defaults::CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Extracts the 32-hex database id from a bare id or a Notion URL.
///
/// Returns the id as 32 lowercase hex digits without dashes.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDatabaseId`] if no id can be found.
pub fn normalize_database_id(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();

    // For URLs only the last path segment may hold the id; `?v=` names a view.
    let candidate = match Url::parse(trimmed) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or_default(),
        Err(_) => trimmed.to_string(),
    };

    let captures = DATABASE_ID
        .captures(&candidate)
        .ok_or_else(|| ConfigError::InvalidDatabaseId(value.to_string()))?;

    Ok(captures
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect())
}

// Helper functions

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        url: value.to_string(),
        reason: e.to_string(),
    })
}

fn validate_template(template: &str) -> Result<(), ConfigError> {
    let mut hbs = Handlebars::new();
    hbs.register_template_string("notify", template)
        .map_err(|e| ConfigError::InvalidTemplate {
            reason: e.to_string(),
        })?;
    Ok(())
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
