//! WebSocket client library
//!
//! Single request/reply exchanges with the price validator, with
//! exponential backoff on dropped connections to the monitor endpoint.

mod client;
mod connection;
mod retry;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use client::{Transport, WsTransport};
pub use connection::Connection;
pub use retry::RetryPolicy;
pub use types::{
    Endpoint, TransportMode, ValidatorEndpoints, WsError, DEFAULT_MONITOR_PATH,
    DEFAULT_REPLY_TIMEOUT, DEFAULT_UPDATE_PATH, USER_AGENT,
};
