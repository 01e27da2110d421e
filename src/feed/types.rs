//! Feed observation and batching types

use crate::model::deviation_of;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Published/unpublished price pair observed for one feed in one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub feed_name: String,
    /// Last value committed on-chain
    pub value_published: Option<f64>,
    /// Latest value collected off-chain
    pub value_unpublished: Option<f64>,
}

impl PriceObservation {
    /// Build an observation from a poll response entry value such as
    /// `[0.256395, 0.256463]`. Missing or non-numeric members stay `None`.
    pub fn from_value(feed_name: impl Into<String>, value: &Value) -> Self {
        let values = value.as_array().map(Vec::as_slice).unwrap_or_default();
        Self {
            feed_name: feed_name.into(),
            value_published: values.first().and_then(Value::as_f64),
            value_unpublished: values.get(1).and_then(Value::as_f64),
        }
    }

    /// Deviation between the two values, 0.0 when either is missing
    pub fn deviation(&self) -> DeviationResult {
        let percentage = match (self.value_published, self.value_unpublished) {
            (Some(a), Some(b)) => deviation_of(&[a, b]),
            _ => 0.0,
        };
        DeviationResult {
            feed_name: self.feed_name.clone(),
            percentage,
        }
    }
}

/// Deviation computed for a feed
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationResult {
    pub feed_name: String,
    pub percentage: f64,
}

impl DeviationResult {
    /// Zero deviation means there's nothing to report
    pub fn is_zero(&self) -> bool {
        self.percentage == 0.0
    }

    /// Whether the deviation meets or exceeds `threshold`
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.percentage >= threshold
    }
}

/// Feeds that warrant an update request in the current cycle
#[derive(Debug, Clone)]
pub struct RequestBatch {
    pub feed_names: Vec<String>,
    pub issued_at: DateTime<Utc>,
}

impl RequestBatch {
    pub fn new() -> Self {
        Self {
            feed_names: Vec::new(),
            issued_at: Utc::now(),
        }
    }

    /// Add a feed, ignoring repeats
    pub fn insert(&mut self, feed_name: impl Into<String>) -> bool {
        let feed_name = feed_name.into();
        if self.contains(&feed_name) {
            return false;
        }
        self.feed_names.push(feed_name);
        true
    }

    pub fn contains(&self, feed_name: &str) -> bool {
        self.feed_names.iter().any(|f| f == feed_name)
    }

    pub fn is_empty(&self) -> bool {
        self.feed_names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.feed_names.len()
    }

    /// Wire form: `{"feeds": ["ADA-USD", ...]}`
    pub fn to_message(&self) -> String {
        serde_json::json!({ "feeds": self.feed_names }).to_string()
    }
}

impl Default for RequestBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed catalogue errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Same feed listed twice
    #[error("Duplicate feed: {0}")]
    DuplicateFeed(String),
    /// Feed without a name
    #[error("Feed name must not be empty")]
    EmptyName,
    /// Negative or non-finite threshold
    #[error("Invalid deviation threshold for {name}: {threshold}")]
    InvalidThreshold { name: String, threshold: f64 },
}
