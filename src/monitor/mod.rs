//! Price monitor
//!
//! Polls the validator for published/unpublished price pairs and asks for
//! an on-chain update when a feed drifts past its deviation threshold.

mod orchestrator;
mod types;

pub use orchestrator::{PriceMonitor, DEFAULT_POLLING_INTERVAL};
pub use types::{CycleOutcome, PollResponse};
