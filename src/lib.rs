//! price-monitor: watches price feeds and requests on-chain updates
//!
//! This library provides the core components for:
//! - A catalogue of monitored feeds and their deviation thresholds
//! - Deviation between published and unpublished prices
//! - Request/reply exchanges with the validator over WebSocket, with
//!   exponential backoff on dropped connections
//! - The polling loop that batches update requests
//! - Logging and metrics

pub mod cli;
pub mod config;
pub mod feed;
pub mod model;
pub mod monitor;
pub mod telemetry;
pub mod ws;
