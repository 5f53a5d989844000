//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default address the webhook server binds to.
pub const LISTEN: &str = "0.0.0.0:8080";

/// Default path of the inbound webhook route.
pub const WEBHOOK_PATH: &str = "/webhook";

/// Default Notion API base URL.
pub const NOTION_API_BASE: &str = "https://api.notion.com/v1/";

/// Default `Notion-Version` header value.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default per-call timeout for outbound requests, in seconds.
pub const TIMEOUT_SECS: u64 = 15;

/// Default title prefix for created short links.
pub const TITLE_PREFIX: &str = "短網址：";

/// Default name of the payment URL property.
pub const PROPERTY_PAYMENT_URL: &str = "付款網址";

/// Default name of the order id property.
pub const PROPERTY_ORDER_ID: &str = "訂單編號";

/// Default name of the property that may already hold a short link.
pub const PROPERTY_EXISTING_SHORT_URL: &str = "產生短網址";

/// Default name of the property the short link is written to.
pub const PROPERTY_SHORT_URL: &str = "短網址";

/// Default HTTP method for notifications.
pub const NOTIFY_METHOD: &str = "POST";

/// Default notification body.
pub const NOTIFY_BODY_TEMPLATE: &str = r#"{"text":"短網址已產生：{{short_url}}（訂單 {{order_id}}）"}"#;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = "shortlink-relay.toml";

/// Directory under the user config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "shortlink-relay";

/// Default outbound timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
