//! Best-effort notification after a successful relay.
//!
//! This module provides:
//! - The notifier seam ([`Notifier`]) and its HTTP implementation ([`HttpNotifier`])
//! - The pipeline hook that calls it ([`NotifyingObserver`])
//!
//! A failed notification never changes the pipeline result and is not retried.

mod error;
mod sender;


pub use error::NotifyError;
pub use sender::{HttpNotifier, Notification, Notifier, NotifySettings, NotifyingObserver};
