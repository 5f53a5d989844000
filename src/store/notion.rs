//! Notion API endpoint settings shared by the locator and patcher.

use std::fmt;

use http::header::{AUTHORIZATION, HeaderName, HeaderValue, InvalidHeaderValue};
use url::Url;

use crate::transport::{HttpError, HttpRequest};

/// Header carrying the pinned API version.
fn notion_version() -> HeaderName {
    HeaderName::from_static("notion-version")
}

/// Endpoint, credentials, and target database for the Notion API.
///
/// Header values are validated on construction so building a request
/// cannot fail on them later.
#[derive(Clone, PartialEq, Eq)]
pub struct NotionSettings {
    api_base: Url,
    authorization: HeaderValue,
    version: HeaderValue,
    database_id: String,
}

impl NotionSettings {
    /// Creates settings from raw values.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or version cannot be sent as a header value.
    pub fn new(
        api_base: Url,
        token: &str,
        version: &str,
        database_id: impl Into<String>,
    ) -> Result<Self, InvalidHeaderValue> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))?;
        authorization.set_sensitive(true);

        Ok(Self {
            api_base,
            authorization,
            version: HeaderValue::from_str(version)?,
            database_id: database_id.into(),
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Returns the target database id.
    #[must_use]
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Returns the `Notion-Version` header value.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.to_str().unwrap_or_default()
    }

    /// Builds an authenticated request for `api_base` + `segments`.
    ///
    /// Segments are percent-encoded individually, so ids cannot escape
    /// their path position.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the base URL cannot take path segments.
    pub fn request(&self, method: http::Method, segments: &[&str]) -> Result<HttpRequest, HttpError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(format!("{} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .extend(segments);

        Ok(HttpRequest::new(method, url)
            .with_header(AUTHORIZATION, self.authorization.clone())
            .with_header(notion_version(), self.version.clone()))
    }

    /// Request for `POST /databases/{id}/query`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub fn query_request(&self) -> Result<HttpRequest, HttpError> {
        self.request(
            http::Method::POST,
            &["databases", self.database_id.as_str(), "query"],
        )
    }

    /// Request for `PATCH /pages/{id}`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub fn page_request(&self, page_id: &str) -> Result<HttpRequest, HttpError> {
        self.request(http::Method::PATCH, &["pages", page_id])
    }
}

impl fmt::Debug for NotionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionSettings")
            .field("api_base", &self.api_base.as_str())
            .field("version", &self.version())
            .field("database_id", &self.database_id)
            .finish_non_exhaustive()
    }
}
