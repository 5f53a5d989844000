//! Shared test fixtures for components that talk HTTP.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client that replays a queue of canned results and records requests.
///
/// Panics if asked for more responses than were queued, so an unexpected
/// network call fails the test loudly.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// A client that must never be called.
    pub fn unused() -> Self {
        Self::new(vec![])
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the body of the `index`-th captured request as JSON.
    pub fn json_body(&self, index: usize) -> serde_json::Value {
        let requests = self.captured_requests();
        let body = requests[index].body.clone().expect("request had no body");
        serde_json::from_slice(&body).expect("request body was not JSON")
    }

    /// Returns the body of the `index`-th captured request decoded as a form.
    pub fn form_body(&self, index: usize) -> Vec<(String, String)> {
        let requests = self.captured_requests();
        let body = requests[index].body.clone().expect("request had no body");
        url::form_urlencoded::parse(&body).into_owned().collect()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let target = req.url.to_string();
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {target}"))
    }
}

/// Builds a response with the given status and raw body.
pub fn respond(status: u16, body: &str) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    ))
}

/// Builds a connection-level failure.
pub fn refused() -> Result<HttpResponse, HttpError> {
    Err(HttpError::Connection(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))))
}
