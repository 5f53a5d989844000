//! Typed parsing of Notion webhook payloads.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{EventError, PropertyNames, WebhookEvent, field};

#[derive(Deserialize)]
struct Envelope {
    data: Option<PageData>,
}

#[derive(Deserialize)]
struct PageData {
    id: Option<String>,
    properties: Option<Map<String, Value>>,
}

/// A `url`-typed property.
#[derive(Deserialize)]
struct UrlProperty {
    url: Option<String>,
}

/// A `rich_text`- or `title`-typed property.
#[derive(Deserialize)]
struct TextProperty {
    rich_text: Option<Vec<TextSegment>>,
    title: Option<Vec<TextSegment>>,
}

#[derive(Deserialize)]
struct TextSegment {
    text: Option<TextContent>,
    plain_text: Option<String>,
}

#[derive(Deserialize)]
struct TextContent {
    content: String,
}

impl TextProperty {
    /// Content of the first segment, preferring `text.content` over `plain_text`.
    fn first_segment(self) -> Option<String> {
        let segments = self.rich_text.or(self.title)?;
        let first = segments.into_iter().next()?;
        first.text.map(|t| t.content).or(first.plain_text)
    }
}

impl WebhookEvent {
    /// Parses an inbound payload into a fully populated event.
    ///
    /// Values are trimmed; an empty or whitespace-only payment URL or order id
    /// is reported as missing. A property with an unexpected shape is treated
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the body is not JSON, `data.properties` is
    /// missing, or a required property is missing or empty.
    pub fn parse(payload: &[u8], names: &PropertyNames) -> Result<Self, EventError> {
        let envelope: Envelope = serde_json::from_slice(payload)?;
        let data = envelope.data.ok_or(EventError::MissingProperties)?;
        let properties = data.properties.ok_or(EventError::MissingProperties)?;

        let payment_url = url_property(&properties, &names.payment_url).ok_or_else(|| {
            EventError::MissingField {
                field: field::PAYMENT_URL,
                property: names.payment_url.clone(),
            }
        })?;

        let order_id = text_property(&properties, &names.order_id).ok_or_else(|| {
            EventError::MissingField {
                field: field::ORDER_ID,
                property: names.order_id.clone(),
            }
        })?;

        Ok(Self {
            record_id: data.id.and_then(non_empty),
            payment_url,
            order_id,
            existing_short_url: url_property(&properties, &names.existing_short_url),
        })
    }
}

fn url_property(properties: &Map<String, Value>, name: &str) -> Option<String> {
    let value = properties.get(name)?.clone();
    let property: UrlProperty = serde_json::from_value(value).ok()?;
    property.url.and_then(non_empty)
}

fn text_property(properties: &Map<String, Value>, name: &str) -> Option<String> {
    let value = properties.get(name)?.clone();
    let property: TextProperty = serde_json::from_value(value).ok()?;
    property.first_segment().and_then(non_empty)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
