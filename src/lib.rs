//! shortlink-relay: Notion → YOURLS short link relay
//!
//! A Notion automation webhook carries an order's payment URL. The relay
//! shortens that URL with YOURLS, finds the originating page, and writes the
//! short link back to it.
//!
//! # Modules
//!
//! - [`config`]: CLI, TOML, and validated configuration
//! - [`event`]: Parsing of inbound webhook payloads
//! - [`transport`]: HTTP client abstraction
//! - [`shortener`]: YOURLS gateway
//! - [`store`]: Notion record lookup and update
//! - [`pipeline`]: The shorten → locate → patch sequence and its outcomes
//! - [`notify`]: Optional notification after a successful run
//! - [`server`]: Inbound HTTP endpoint

pub mod config;
pub mod event;
pub mod notify;
pub mod pipeline;
pub mod server;
pub mod shortener;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_fixtures;
