//! shortlink-relay: Notion → YOURLS short link relay
//!
//! Entry point for the shortlink-relay application.

use shortlink_relay::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    if let Err(e) = setup_tracing(config.verbose, config.log_file.as_deref()) {
        eprintln!("Failed to open log file: {e}");
        return exit_code::CONFIG_ERROR;
    }
    tracing::info!("{config}");

    match cli.command {
        Some(Command::Process { input }) => run_process(&config, input),
        _ => run_server(config),
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

fn runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(runtime) => Some(runtime),
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            None
        }
    }
}

/// Runs the webhook server with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_server(config: ValidatedConfig) -> ExitCode {
    let Some(runtime) = runtime() else {
        return exit_code::runtime_error();
    };

    match runtime.block_on(run::serve(config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Processes one payload and prints the result as JSON on stdout.
///
/// Exits with 0 only when the run succeeded.
#[cfg(not(tarpaulin_include))]
fn run_process(config: &ValidatedConfig, input: Option<PathBuf>) -> ExitCode {
    let Some(runtime) = runtime() else {
        return exit_code::runtime_error();
    };

    let result = match runtime.block_on(run::process(config, input.as_deref())) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Application error: {e}");
            return exit_code::runtime_error();
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode result: {e}"),
    }

    if result.is_success() {
        exit_code::SUCCESS
    } else {
        exit_code::runtime_error()
    }
}
