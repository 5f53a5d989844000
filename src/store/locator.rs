//! Resolves a webhook event to the page that receives the short link.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::event::WebhookEvent;
use crate::transport::{HttpClient, send};

use super::NotionSettings;

/// How the target record was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The webhook carried the page id.
    Direct,
    /// The page was found by searching the database for the order id.
    Fallback,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// One database filter against the order-id property.
///
/// The property may be a `rich_text` or a `title` column, and the stored
/// value may differ slightly from the webhook's, hence several shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// `rich_text.equals`
    RichTextEquals,
    /// `title.equals`
    TitleEquals,
    /// `rich_text.contains`
    RichTextContains,
}

impl SearchStrategy {
    /// All strategies in the order they are attempted.
    pub const PRIORITY: [Self; 3] = [Self::RichTextEquals, Self::TitleEquals, Self::RichTextContains];

    const fn parts(self) -> (&'static str, &'static str) {
        match self {
            Self::RichTextEquals => ("rich_text", "equals"),
            Self::TitleEquals => ("title", "equals"),
            Self::RichTextContains => ("rich_text", "contains"),
        }
    }

    /// Builds the `filter` object for a database query.
    #[must_use]
    pub fn filter(self, property: &str, value: &str) -> Value {
        let (kind, operator) = self.parts();
        let mut condition = Map::new();
        condition.insert(operator.to_string(), Value::from(value));

        let mut filter = Map::new();
        filter.insert("property".to_string(), Value::from(property));
        filter.insert(kind.to_string(), Value::Object(condition));
        Value::Object(filter)
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, operator) = self.parts();
        write!(f, "{kind}.{operator}")
    }
}

/// The single record selected for patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMatch {
    /// Notion page id
    pub record_id: String,
    /// How the page was found
    pub mode: MatchMode,
    /// Winning strategy for fallback matches
    pub strategy: Option<SearchStrategy>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageRef>,
}

#[derive(Deserialize)]
struct PageRef {
    id: String,
}

/// Finds the page to patch for an event.
#[derive(Debug, Clone)]
pub struct RecordLocator<C> {
    client: C,
    notion: NotionSettings,
    order_id_property: String,
}

impl<C: HttpClient> RecordLocator<C> {
    /// Creates a locator searching `order_id_property` in the configured database.
    #[must_use]
    pub fn new(client: C, notion: NotionSettings, order_id_property: impl Into<String>) -> Self {
        Self {
            client,
            notion,
            order_id_property: order_id_property.into(),
        }
    }

    /// Resolves the event to exactly one record, or `None`.
    ///
    /// A direct record id is returned as-is without any network call.
    /// Otherwise strategies run in [`SearchStrategy::PRIORITY`] order and the
    /// first result of the first non-empty strategy wins. A strategy whose
    /// query fails counts as empty.
    pub async fn locate(&self, event: &WebhookEvent) -> Option<RecordMatch> {
        if let Some(record_id) = &event.record_id {
            return Some(RecordMatch {
                record_id: record_id.clone(),
                mode: MatchMode::Direct,
                strategy: None,
            });
        }

        for strategy in SearchStrategy::PRIORITY {
            if let Some(record_id) = self.search(strategy, &event.order_id).await {
                tracing::info!(
                    "Order {} matched page {record_id} via {strategy}",
                    event.order_id
                );
                return Some(RecordMatch {
                    record_id,
                    mode: MatchMode::Fallback,
                    strategy: Some(strategy),
                });
            }
        }

        None
    }

    /// Runs one query; returns the first result's id.
    async fn search(&self, strategy: SearchStrategy, order_id: &str) -> Option<String> {
        let request = match self.notion.query_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Cannot build query request: {e}");
                return None;
            }
        };
        let body = json!({ "filter": strategy.filter(&self.order_id_property, order_id) });

        let exchange = send(&self.client, request.with_json(&body)).await;

        if !exchange.is_success() {
            tracing::warn!(
                "Query {strategy} failed (status {:?}): {}",
                exchange.status_code(),
                exchange.body
            );
            return None;
        }

        let response: QueryResponse = match serde_json::from_str(&exchange.body) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Query {strategy} returned an unreadable body: {e}");
                return None;
            }
        };

        let first = response.results.into_iter().next();
        if first.is_none() {
            tracing::debug!("Query {strategy} found no page for order {order_id}");
        }
        first.map(|page| page.id)
    }
}
