//! Notifier trait, its HTTP implementation, and the observer that drives it.

use handlebars::Handlebars;
use serde::Serialize;

use crate::pipeline::{Completion, PipelineObserver};
use crate::store::MatchMode;
use crate::transport::{HttpClient, HttpRequest};

use super::NotifyError;

/// Data describing a completed relay, available to notification templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Order id from the webhook
    pub order_id: String,
    /// Page that received the short link
    pub record_id: String,
    /// The short link
    pub short_url: String,
    /// The long URL the short link points to
    pub payment_url: String,
    /// How the page was found
    pub mode: MatchMode,
}

impl From<&Completion<'_>> for Notification {
    fn from(completion: &Completion<'_>) -> Self {
        Self {
            order_id: completion.event.order_id.clone(),
            record_id: completion.record.record_id.clone(),
            short_url: completion.short_url.to_string(),
            payment_url: completion.event.payment_url.clone(),
            mode: completion.record.mode,
        }
    }
}

/// Validated settings for [`HttpNotifier`].
#[derive(Debug, Clone)]
pub struct NotifySettings {
    /// Target URL
    pub url: url::Url,
    /// HTTP method
    pub method: http::Method,
    /// Headers sent with every notification
    pub headers: http::HeaderMap,
    /// Handlebars body template
    pub body_template: String,
}

/// Trait for announcing a completed relay to an external service.
pub trait Notifier: Send + Sync {
    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the notification was not accepted.
    fn notify(
        &self,
        notification: &Notification,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

/// HTTP notifier posting a Handlebars-rendered body to a chat webhook.
///
/// Template variables: `order_id`, `record_id`, `short_url`, `payment_url`,
/// `mode`. Values are inserted without HTML escaping.
///
/// # Example
///
/// ```
/// use shortlink_relay::notify::HttpNotifier;
/// use shortlink_relay::transport::ReqwestClient;
/// use url::Url;
///
/// let notifier = HttpNotifier::new(
///     ReqwestClient::new(),
///     Url::parse("https://chat.example.com/hooks/abc").unwrap(),
///     r#"{"text": "{{order_id}}: {{short_url}}"}"#,
/// );
/// ```
#[derive(Debug)]
pub struct HttpNotifier<H> {
    client: H,
    url: url::Url,
    method: http::Method,
    headers: http::HeaderMap,
    body_template: String,
}

impl<H> HttpNotifier<H> {
    /// Creates a notifier using POST and no extra headers.
    #[must_use]
    pub fn new(client: H, url: url::Url, body_template: impl Into<String>) -> Self {
        Self {
            client,
            url,
            method: http::Method::POST,
            headers: http::HeaderMap::new(),
            body_template: body_template.into(),
        }
    }

    /// Creates a notifier from validated settings.
    #[must_use]
    pub fn from_settings(client: H, settings: NotifySettings) -> Self {
        Self {
            client,
            url: settings.url,
            method: settings.method,
            headers: settings.headers,
            body_template: settings.body_template,
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: http::Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the HTTP headers.
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Returns the configured URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns the configured HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }
}

impl<H: HttpClient> HttpNotifier<H> {
    fn render_body(&self, notification: &Notification) -> Result<Vec<u8>, NotifyError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        let rendered = handlebars
            .render_template(&self.body_template, notification)
            .map_err(|e| NotifyError::Template(e.to_string()))?;

        Ok(rendered.into_bytes())
    }

    fn build_request(&self, notification: &Notification) -> Result<HttpRequest, NotifyError> {
        let mut request = HttpRequest::new(self.method.clone(), self.url.clone());

        for (name, value) in &self.headers {
            request.headers.append(name, value.clone());
        }

        request.body = Some(self.render_body(notification)?);
        Ok(request)
    }
}

impl<H: HttpClient> Notifier for HttpNotifier<H> {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let request = self.build_request(notification)?;
        let response = self.client.request(request).await?;

        if response.is_success() {
            return Ok(());
        }

        Err(NotifyError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}

/// Observer that sends a notification after each successful run.
///
/// Delivery failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct NotifyingObserver<N> {
    notifier: N,
}

impl<N> NotifyingObserver<N> {
    /// Wraps a notifier.
    #[must_use]
    pub const fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: Notifier> PipelineObserver for NotifyingObserver<N> {
    async fn pipeline_succeeded(&self, completion: &Completion<'_>) {
        let notification = Notification::from(completion);
        match self.notifier.notify(&notification).await {
            Ok(()) => tracing::debug!("Notification sent for order {}", notification.order_id),
            Err(e) => tracing::warn!(
                "Notification for order {} failed: {e}",
                notification.order_id
            ),
        }
    }
}
