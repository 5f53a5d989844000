//! Error types for inbound payload parsing.

use thiserror::Error;

/// Why an inbound webhook payload could not become a [`super::WebhookEvent`].
#[derive(Debug, Error)]
pub enum EventError {
    /// The body is not valid JSON (or not a JSON object at the top level).
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// `data.properties` is absent or not an object.
    #[error("Payload is missing data.properties")]
    MissingProperties,

    /// A required property is absent, has an unexpected shape, or is empty.
    #[error("Missing required property '{property}' ({field})")]
    MissingField {
        /// Role of the field in the pipeline
        field: &'static str,
        /// Configured property name that was looked up
        property: String,
    },
}

/// Well-known field roles for `MissingField` errors.
pub mod field {
    /// The payment URL the short link points to.
    pub const PAYMENT_URL: &str = "payment_url";
    /// The order id used as shortener keyword and search key.
    pub const ORDER_ID: &str = "order_id";
}
