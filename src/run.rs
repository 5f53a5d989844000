//! Application execution logic.
//!
//! `serve` runs the webhook server until a shutdown signal; `process` runs
//! the pipeline once on a payload read from a file or stdin.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::signal;

use shortlink_relay::config::ValidatedConfig;
use shortlink_relay::notify::{HttpNotifier, NotifyingObserver};
use shortlink_relay::pipeline::{Pipeline, PipelineResult, TracingObserver};
use shortlink_relay::server::{AppState, router};
use shortlink_relay::transport::{HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Observers attached in production: logs, plus notification when configured.
type RelayObserver = (
    TracingObserver,
    Option<NotifyingObserver<HttpNotifier<ReqwestClient>>>,
);

/// The pipeline as wired by the binary.
type RelayPipeline = Pipeline<ReqwestClient, RelayObserver>;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the outbound HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] HttpError),

    /// Failed to bind the listen address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Failed to read the payload for `process`.
    #[error("Failed to read payload from {}: {source}", display_input(.path.as_deref()))]
    ReadInput {
        /// Payload file; `None` for stdin
        path: Option<PathBuf>,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

fn display_input(path: Option<&Path>) -> String {
    path.map_or_else(|| "stdin".to_string(), |p| format!("'{}'", p.display()))
}

/// Builds the pipeline with the production client and observers.
fn build_pipeline(config: &ValidatedConfig) -> Result<RelayPipeline, RunError> {
    let client = ReqwestClient::with_timeout(config.timeout)?;

    let notifier = config.notify.clone().map(|settings| {
        let notifier = HttpNotifier::from_settings(client.clone(), settings);
        tracing::info!("Notifications enabled: {} {}", notifier.method(), notifier.url());
        NotifyingObserver::new(notifier)
    });

    Ok(Pipeline::new(client, config.pipeline_settings()).with_observer((TracingObserver, notifier)))
}

/// Runs the webhook server until Ctrl+C or SIGTERM.
///
/// In-flight requests finish before the server returns.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the address cannot be
/// bound, or the server fails.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires real
/// sockets and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn serve(config: ValidatedConfig) -> Result<(), RunError> {
    let pipeline = build_pipeline(&config)?;
    let settings = config.server;

    let app = router(
        &settings.webhook_path,
        AppState::new(pipeline, settings.inbound_token.clone()),
    );

    let listener = TcpListener::bind(settings.listen)
        .await
        .map_err(|source| RunError::Bind {
            addr: settings.listen,
            source,
        })?;

    tracing::info!(
        "Listening on {} (webhook: POST {}, token check: {})",
        settings.listen,
        settings.webhook_path,
        if settings.inbound_token.is_some() { "on" } else { "off" },
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RunError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Runs the pipeline once on the payload from `input` (stdin when `None` or `-`).
///
/// # Errors
///
/// Returns an error if the payload cannot be read or the client cannot be built.
/// Pipeline failures are returned as a [`PipelineResult`], not as errors.
pub async fn process(
    config: &ValidatedConfig,
    input: Option<&Path>,
) -> Result<PipelineResult, RunError> {
    let payload = read_input(input).await?;
    let pipeline = build_pipeline(config)?;

    Ok(pipeline.process_payload(&payload).await)
}

async fn read_input(input: Option<&Path>) -> Result<Vec<u8>, RunError> {
    match input.filter(|p| *p != Path::new("-")) {
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(|source| RunError::ReadInput {
                path: Some(path.to_path_buf()),
                source,
            }),
        None => {
            let mut payload = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut payload)
                .await
                .map_err(|source| RunError::ReadInput { path: None, source })?;
            Ok(payload)
        }
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining requests");
}
