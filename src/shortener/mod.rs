//! URL shortener gateway (YOURLS).

mod gateway;


pub use gateway::{ShortenRequest, YourlsGateway};

use url::Url;

/// Endpoint and credentials for the YOURLS API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YourlsSettings {
    /// `yourls-api.php` endpoint
    pub api: Url,
    /// Shared signature token (passwordless API auth)
    pub signature: String,
    /// Prefix of the link title; the order id is appended
    pub title_prefix: String,
}

/// Outcome of one shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenResult {
    /// A non-empty absolute short link was obtained.
    Shortened {
        /// The short link
        short_url: String,
    },
    /// No usable link; status is `None` on transport failure.
    Failed {
        /// HTTP status of the create call
        status: Option<u16>,
        /// Raw response body
        body: String,
    },
}

impl ShortenResult {
    /// Returns the short link, if one was obtained.
    #[must_use]
    pub fn short_url(&self) -> Option<&str> {
        match self {
            Self::Shortened { short_url } => Some(short_url),
            Self::Failed { .. } => None,
        }
    }
}
