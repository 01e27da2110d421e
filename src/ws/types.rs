//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;

/// Client identifier sent as the `User-Agent` header
pub const USER_AGENT: &str = concat!("orcfax-price-monitor/", env!("CARGO_PKG_VERSION"));

/// Default polling sub-path appended to the validator base URI
pub const DEFAULT_MONITOR_PATH: &str = "price_monitor/";

/// Default update-request sub-path appended to the validator base URI
pub const DEFAULT_UPDATE_PATH: &str = "validate/";

/// Longest an exchange may wait for connect, send and reply
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(20);

/// Transport security mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// TLS verified against the system trust anchors
    #[default]
    Secure,
    /// Local development: plaintext or TLS without certificate validation
    Insecure,
}

impl TransportMode {
    pub fn from_local_flag(local: bool) -> Self {
        if local {
            Self::Insecure
        } else {
            Self::Secure
        }
    }
}

/// Which validator endpoint an exchange targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Queried every cycle for current price pairs
    Monitor,
    /// Asked to commit new values on-chain
    UpdateRequest,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Monitor => write!(f, "monitor"),
            Endpoint::UpdateRequest => write!(f, "update-request"),
        }
    }
}

/// Endpoint URIs derived once from the validator base URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorEndpoints {
    pub monitor_uri: String,
    pub update_uri: String,
}

impl ValidatorEndpoints {
    /// Derive endpoints using the default sub-paths
    pub fn from_base(base_uri: &str) -> Self {
        Self::with_paths(base_uri, DEFAULT_MONITOR_PATH, DEFAULT_UPDATE_PATH)
    }

    /// Derive endpoints by concatenating `base_uri` with each sub-path
    pub fn with_paths(base_uri: &str, monitor_path: &str, update_path: &str) -> Self {
        Self {
            monitor_uri: format!("{}{}", base_uri, monitor_path),
            update_uri: format!("{}{}", base_uri, update_path),
        }
    }

    pub fn uri(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Monitor => &self.monitor_uri,
            Endpoint::UpdateRequest => &self.update_uri,
        }
    }
}

/// WebSocket errors
#[derive(Debug, Clone, Error)]
pub enum WsError {
    /// Endpoint address can never be connected to
    #[error("Invalid endpoint '{uri}': {reason}")]
    InvalidEndpoint { uri: String, reason: String },
    /// TLS connector could not be built
    #[error("TLS setup failed: {0}")]
    Tls(String),
    /// Connection dropped or refused before a reply arrived
    #[error("Connection to '{uri}' dropped: {reason}")]
    ConnectionDropped { uri: String, reason: String },
    /// Remote closed the connection cleanly without replying
    #[error("Connection to '{uri}' closed: {reason}")]
    ConnectionClosed { uri: String, reason: String },
    /// Retry policy gave up
    #[error("Gave up on '{uri}' after {attempts} attempts")]
    RetriesExhausted { uri: String, attempts: u32 },
}

impl WsError {
    /// Errors that terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WsError::InvalidEndpoint { .. } | WsError::Tls(_) | WsError::RetriesExhausted { .. }
        )
    }

    /// Errors worth retrying with backoff
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WsError::ConnectionDropped { .. })
    }
}
