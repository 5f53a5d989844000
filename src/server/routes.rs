//! Router and handlers.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;

use crate::pipeline::{Pipeline, PipelineObserver};
use crate::transport::HttpClient;

/// Alternative header for the inbound token.
pub const TOKEN_HEADER: &str = "x-relay-token";

/// Shared state of the router: one pipeline serving every request.
pub struct AppState<C, O> {
    pipeline: Arc<Pipeline<C, O>>,
    inbound_token: Option<Arc<str>>,
}

impl<C, O> AppState<C, O> {
    /// Wraps a pipeline; `inbound_token` enables the token check.
    #[must_use]
    pub fn new(pipeline: Pipeline<C, O>, inbound_token: Option<String>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            inbound_token: inbound_token.map(Arc::from),
        }
    }

    /// Checks the caller's token, accepting `Authorization: Bearer` or
    /// the `X-Relay-Token` header.
    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.inbound_token.as_deref() else {
            return true;
        };

        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);
        let relay = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok());

        [bearer, relay]
            .into_iter()
            .flatten()
            .any(|presented| bool::from(presented.trim().as_bytes().ct_eq(expected.as_bytes())))
    }
}

/// Extracts the credential of an `Authorization: Bearer` value; the scheme
/// is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

// Manual impl: `C` and `O` sit behind `Arc` and need not be `Clone`.
impl<C, O> Clone for AppState<C, O> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            inbound_token: self.inbound_token.clone(),
        }
    }
}

/// Builds the router serving the webhook and health routes.
pub fn router<C, O>(webhook_path: &str, state: AppState<C, O>) -> Router
where
    C: HttpClient + 'static,
    O: PipelineObserver + 'static,
{
    Router::new()
        .route(webhook_path, post(receive_webhook::<C, O>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn receive_webhook<C, O>(
    State(state): State<AppState<C, O>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    C: HttpClient + 'static,
    O: PipelineObserver + 'static,
{
    if !state.authorized(&headers) {
        tracing::warn!("Rejected webhook call with a missing or wrong token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response();
    }

    let result = state.pipeline.process_payload(&body).await;
    (result.status_code(), Json(result)).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
