//! Inbound HTTP boundary.
//!
//! Exposes the pipeline as a webhook endpoint:
//! - `POST <webhook_path>` runs one pipeline per request and answers with
//!   the result's mapped status and its JSON form
//! - `GET /health` reports liveness and the crate version

mod routes;


use std::fmt;
use std::net::SocketAddr;

pub use routes::{AppState, TOKEN_HEADER, router};

/// Validated settings for the inbound server.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address to bind
    pub listen: SocketAddr,
    /// Route of the webhook endpoint, starting with '/'
    pub webhook_path: String,
    /// Token callers must present; no check when `None`
    pub inbound_token: Option<String>,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("listen", &self.listen)
            .field("webhook_path", &self.webhook_path)
            .field(
                "inbound_token",
                &self.inbound_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
