//! Pipeline stages and terminal outcomes.

use std::fmt;

use http::StatusCode;
use serde::Serialize;

use crate::store::MatchMode;

/// A step of the linear pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Checking the event carries a payment URL and an order id
    Validating,
    /// Requesting the short link
    Shortening,
    /// Resolving the page to update
    Locating,
    /// Writing the short link into the page
    Patching,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Shortening => "shortening",
            Self::Locating => "locating",
            Self::Patching => "patching",
        };
        f.write_str(name)
    }
}

/// Terminal classification of one pipeline run.
///
/// Serialized with an `outcome` tag for the boundary response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineResult {
    /// The short link was created and written back.
    Success {
        /// The short link
        short_url: String,
        /// Page that was updated
        record_id: String,
        /// How the page was found
        mode: MatchMode,
    },
    /// The payload was malformed or lacked a required value.
    ValidationFailed {
        /// Human-readable cause
        reason: String,
    },
    /// The shortener produced no link.
    ShortenFailed {
        /// Shortener status; `None` on transport failure
        http_status: Option<u16>,
        /// Raw shortener response
        raw_body: String,
    },
    /// No page matched the order id.
    RecordNotFound {
        /// Order id that was searched for
        order_id: String,
    },
    /// The page update was not accepted.
    PatchFailed {
        /// Document store status; `None` on transport failure
        http_status: Option<u16>,
        /// Raw document store response
        raw_body: String,
    },
}

impl PipelineResult {
    /// Returns true for [`PipelineResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Status code the boundary answers with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Success { .. } => StatusCode::OK,
            Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::ShortenFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::RecordNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PatchFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success {
                short_url,
                record_id,
                mode,
            } => write!(f, "Short link {short_url} written to page {record_id} ({mode})"),
            Self::ValidationFailed { reason } => write!(f, "Invalid webhook payload: {reason}"),
            Self::ShortenFailed {
                http_status,
                raw_body,
            } => write!(
                f,
                "Shortener returned no link (status {}): {raw_body}",
                status_text(*http_status)
            ),
            Self::RecordNotFound { order_id } => write!(f, "No page found for order {order_id}"),
            Self::PatchFailed {
                http_status,
                raw_body,
            } => write!(
                f,
                "Page update failed (status {}): {raw_body}",
                status_text(*http_status)
            ),
        }
    }
}

fn status_text(status: Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}
