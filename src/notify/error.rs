//! Error types for notification delivery.

use thiserror::Error;

use crate::transport::HttpError;

/// Why a notification was not delivered.
///
/// Delivery is attempted once; the caller only logs these.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No response was received.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {}", body.as_deref().unwrap_or("<no body>"))]
    NonSuccessStatus {
        /// The HTTP status code returned
        status: http::StatusCode,
        /// Response body (if available and valid UTF-8)
        body: Option<String>,
    },

    /// The body template failed to render.
    #[error("Template rendering failed: {0}")]
    Template(String),
}
