//! YOURLS `shorturl` client.

use serde_json::Value;
use url::Url;

use crate::transport::{Exchange, HttpClient, HttpRequest, send};

use super::{ShortenResult, YourlsSettings};

/// Response fields that may carry the short link, in lookup order.
const LINK_FIELDS: [&str; 2] = ["shorturl", "link"];

/// YOURLS error code for a keyword that is already taken.
const KEYWORD_TAKEN: &str = "error:keyword";

/// A single create-short-link call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenRequest {
    /// Long URL the short link redirects to
    pub destination_url: String,
    /// Human-readable title stored with the link
    pub title: String,
    /// Requested slug
    pub keyword: String,
}

impl ShortenRequest {
    /// Builds the request for an order: keyword is the order id, title is
    /// `title_prefix` followed by the order id.
    #[must_use]
    pub fn for_order(destination_url: &str, order_id: &str, title_prefix: &str) -> Self {
        Self {
            destination_url: destination_url.to_string(),
            title: format!("{title_prefix}{order_id}"),
            keyword: order_id.to_string(),
        }
    }
}

/// Wraps the YOURLS API endpoint.
///
/// Identical order ids map to identical keywords, so a second request for the
/// same order targets the link created by the first. When YOURLS reports the
/// keyword as taken, the gateway expands the keyword once and reuses the
/// existing link only if it already points at the requested destination.
#[derive(Debug, Clone)]
pub struct YourlsGateway<C> {
    client: C,
    settings: YourlsSettings,
}

impl<C: HttpClient> YourlsGateway<C> {
    /// Creates a gateway for the configured endpoint.
    #[must_use]
    pub const fn new(client: C, settings: YourlsSettings) -> Self {
        Self { client, settings }
    }

    /// Requests a short link for `destination_url` keyed by `order_id`.
    pub async fn shorten(&self, destination_url: &str, order_id: &str) -> ShortenResult {
        let request =
            ShortenRequest::for_order(destination_url, order_id, &self.settings.title_prefix);
        let exchange = send(&self.client, self.create_request(&request)).await;

        if let Some(short_url) = exchange.json().as_ref().and_then(extract_link) {
            tracing::info!("YOURLS created {short_url} for order {order_id}");
            return ShortenResult::Shortened { short_url };
        }

        if is_keyword_taken(&exchange) {
            if let Some(short_url) = self.reuse_existing(&request).await {
                tracing::info!("Reusing existing short link {short_url} for order {order_id}");
                return ShortenResult::Shortened { short_url };
            }
            tracing::warn!("Keyword {order_id} is taken by a different destination");
        }

        ShortenResult::Failed {
            status: exchange.status_code(),
            body: exchange.body,
        }
    }

    fn create_request(&self, request: &ShortenRequest) -> HttpRequest {
        HttpRequest::post(self.settings.api.clone()).with_form([
            ("signature", self.settings.signature.as_str()),
            ("action", "shorturl"),
            ("url", request.destination_url.as_str()),
            ("title", request.title.as_str()),
            ("keyword", request.keyword.as_str()),
            ("format", "json"),
        ])
    }

    fn expand_request(&self, keyword: &str) -> HttpRequest {
        HttpRequest::post(self.settings.api.clone()).with_form([
            ("signature", self.settings.signature.as_str()),
            ("action", "expand"),
            ("shorturl", keyword),
            ("format", "json"),
        ])
    }

    /// Looks up the link already registered under the keyword.
    async fn reuse_existing(&self, request: &ShortenRequest) -> Option<String> {
        let exchange = send(&self.client, self.expand_request(&request.keyword)).await;
        let body = exchange.json()?;

        let long_url = body.get("longurl")?.as_str()?;
        if !same_destination(long_url, &request.destination_url) {
            return None;
        }

        extract_link(&body)
    }
}

/// Returns the first non-empty absolute URL found under a known link field.
fn extract_link(body: &Value) -> Option<String> {
    LINK_FIELDS.iter().find_map(|field| {
        let candidate = body.get(field)?.as_str()?.trim();
        if candidate.is_empty() || Url::parse(candidate).is_err() {
            return None;
        }
        Some(candidate.to_string())
    })
}

fn is_keyword_taken(exchange: &Exchange) -> bool {
    exchange
        .json()
        .is_some_and(|body| body.get("code").and_then(Value::as_str) == Some(KEYWORD_TAKEN))
}

fn same_destination(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
