//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.
//! Secrets and endpoints also fall back to environment variables.

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

/// shortlink-relay: Notion → YOURLS short link relay
///
/// Receives Notion webhooks, shortens the payment link with YOURLS, and
/// writes the short link back to the Notion page.
#[derive(Debug, Parser)]
#[command(name = "shortlink-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: serve)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long, global = true)]
    pub listen: Option<String>,

    /// Path of the inbound webhook route
    #[arg(long = "webhook-path", global = true)]
    pub webhook_path: Option<String>,

    /// Token inbound callers must present
    #[arg(long = "inbound-token", env = "RELAY_INBOUND_TOKEN", global = true, hide_env_values = true)]
    pub inbound_token: Option<String>,

    /// YOURLS API endpoint (yourls-api.php)
    #[arg(long = "yourls-api", env = "YOURLS_API", global = true)]
    pub yourls_api: Option<String>,

    /// YOURLS signature token
    #[arg(long = "yourls-signature", env = "YOURLS_SIGNATURE", global = true, hide_env_values = true)]
    pub yourls_signature: Option<String>,

    /// Notion integration token
    #[arg(long = "notion-token", env = "NOTION_TOKEN", global = true, hide_env_values = true)]
    pub notion_token: Option<String>,

    /// Notion database id or URL
    #[arg(long = "notion-database", env = "NOTION_DATABASE_ID", global = true)]
    pub notion_database: Option<String>,

    /// Notion-Version header value
    #[arg(long = "notion-version", env = "NOTION_VERSION", global = true)]
    pub notion_version: Option<String>,

    /// Per-call timeout for outbound requests, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// URL notified after each successful relay
    #[arg(long = "notify-url", global = true)]
    pub notify_url: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for shortlink-relay
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the webhook server (default)
    Serve,
    /// Process one webhook payload from a file or stdin and print the result
    Process {
        /// Payload file; reads stdin when omitted or "-"
        input: Option<PathBuf>,
    },
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "shortlink-relay.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    ///
    /// Environment fallbacks are ignored, so only `iter` is consulted.
    /// Exits with a usage message on invalid arguments, like [`Self::parse_args`].
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut command = Self::command();
        let with_env: Vec<clap::Id> = command
            .get_arguments()
            .filter(|arg| arg.get_env().is_some())
            .map(|arg| arg.get_id().clone())
            .collect();
        for id in with_env {
            command = command.mut_arg(id, |arg| arg.env(None::<&'static str>));
        }

        let matches = command.get_matches_from(iter);
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
