//! Outbound HTTP layer shared by the shortener, document store, and notifier.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client seam ([`HttpClient`]) and its reqwest implementation ([`ReqwestClient`])
//! - The status-or-transport-failure view of a call ([`Exchange`], [`send`])

mod client;
mod error;
mod http;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use http::{Exchange, HttpClient, HttpRequest, HttpResponse, send};
