//! Writes the short link back into a Notion page.

use serde_json::{Value, json};

use crate::transport::{Exchange, HttpClient, send};

use super::NotionSettings;

/// Result of one page update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Whether the update is considered applied
    pub success: bool,
    /// HTTP status, absent on transport failure
    pub status: Option<u16>,
    /// Raw response body
    pub body: String,
}

impl From<Exchange> for PatchOutcome {
    /// A 2xx status is success. So is a body that is a page object, which
    /// covers transports that lose the status line.
    fn from(exchange: Exchange) -> Self {
        let success = exchange.is_success() || is_page_object(exchange.json());
        Self {
            success,
            status: exchange.status_code(),
            body: exchange.body,
        }
    }
}

fn is_page_object(body: Option<Value>) -> bool {
    body.as_ref()
        .and_then(|b| b.get("object"))
        .and_then(Value::as_str)
        == Some("page")
}

/// Sets the short-link property on a page.
#[derive(Debug, Clone)]
pub struct RecordPatcher<C> {
    client: C,
    notion: NotionSettings,
    property: String,
}

impl<C: HttpClient> RecordPatcher<C> {
    /// Creates a patcher writing to the `url` property named `property`.
    #[must_use]
    pub fn new(client: C, notion: NotionSettings, property: impl Into<String>) -> Self {
        Self {
            client,
            notion,
            property: property.into(),
        }
    }

    /// Sends a partial update setting the property to `short_url`.
    pub async fn patch(&self, record_id: &str, short_url: &str) -> PatchOutcome {
        let request = match self.notion.page_request(record_id) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Cannot build patch request for {record_id}: {e}");
                return PatchOutcome::from(Exchange::transport_failure());
            }
        };

        let mut properties = serde_json::Map::new();
        properties.insert(self.property.clone(), json!({ "url": short_url }));
        let body = json!({ "properties": properties });

        let outcome = PatchOutcome::from(send(&self.client, request.with_json(&body)).await);
        if outcome.success {
            tracing::info!("Page {record_id} updated with {short_url}");
        } else {
            tracing::warn!(
                "Updating page {record_id} failed (status {:?}): {}",
                outcome.status,
                outcome.body
            );
        }
        outcome
    }
}
