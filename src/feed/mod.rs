//! Feed module
//!
//! Catalogue of monitored price pairs and the per-cycle observation types

mod registry;
mod types;

pub use registry::{Feed, FeedRegistry, DEFAULT_DEVIATION};
pub use types::{DeviationResult, PriceObservation, RegistryError, RequestBatch};
