//! Inbound webhook events.
//!
//! A Notion automation posts the changed page as JSON. This module turns that
//! payload into a [`WebhookEvent`] in one typed step: either every required
//! value is present, or parsing fails with an [`EventError`].

mod error;
mod parse;


pub use error::{EventError, field};

use crate::config::defaults;

/// The order record described by one webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    /// Page id supplied by the webhook (`data.id`), if any
    pub record_id: Option<String>,
    /// Destination the short link will point to
    pub payment_url: String,
    /// Order id; doubles as shortener keyword and search key
    pub order_id: String,
    /// Short link already stored on the page (informational only)
    pub existing_short_url: Option<String>,
}

impl WebhookEvent {
    /// Creates an event without a direct record id. Values are trimmed.
    #[must_use]
    pub fn new(payment_url: impl Into<String>, order_id: impl Into<String>) -> Self {
        Self {
            record_id: None,
            payment_url: payment_url.into().trim().to_string(),
            order_id: order_id.into().trim().to_string(),
            existing_short_url: None,
        }
    }

    /// Returns a copy with surrounding whitespace removed from every value.
    ///
    /// Optional values that are blank after trimming become `None`.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        Self {
            record_id: optional(&self.record_id),
            payment_url: self.payment_url.trim().to_string(),
            order_id: self.order_id.trim().to_string(),
            existing_short_url: optional(&self.existing_short_url),
        }
    }

    /// Sets the direct record id.
    #[must_use]
    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    /// Sets the pre-existing short link.
    #[must_use]
    pub fn with_existing_short_url(mut self, url: impl Into<String>) -> Self {
        self.existing_short_url = Some(url.into());
        self
    }
}

/// Names of the Notion page properties the relay reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    /// `url` property holding the payment link
    pub payment_url: String,
    /// `rich_text` (or `title`) property holding the order id
    pub order_id: String,
    /// `url` property that may already hold a short link
    pub existing_short_url: String,
    /// `url` property the short link is written to
    pub short_url: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            payment_url: defaults::PROPERTY_PAYMENT_URL.to_string(),
            order_id: defaults::PROPERTY_ORDER_ID.to_string(),
            existing_short_url: defaults::PROPERTY_EXISTING_SHORT_URL.to_string(),
            short_url: defaults::PROPERTY_SHORT_URL.to_string(),
        }
    }
}
