//! Poll response and cycle outcome types

use crate::feed::{PriceObservation, RequestBatch};
use serde_json::Value;

/// Decoded reply from the monitor endpoint
///
/// ```json
/// {"error": null, "data": [{"ADA-USD": [0.256395, 0.256463]}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollResponse {
    /// Error reported by the validator, if any
    pub error: Option<String>,
    /// One observation per feed entry in `data`
    pub observations: Vec<PriceObservation>,
}

impl PollResponse {
    /// Interpret a decoded reply. Anything that doesn't look like a poll
    /// response yields no observations.
    pub fn from_value(value: &Value) -> Self {
        let error = value.get("error").and_then(error_message);

        let observations = value
            .get("data")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .flat_map(|entry| {
                        entry
                            .iter()
                            .map(|(name, values)| PriceObservation::from_value(name.as_str(), values))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            error,
            observations,
        }
    }
}

/// Error field is set when it carries anything other than null, false, 0 or
/// an empty string/array/object
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// What a poll cycle ended up doing
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Validator reported an error, nothing evaluated
    ServiceError(String),
    /// No feed crossed its threshold
    NothingToRequest,
    /// An update request was issued for these feeds
    UpdateRequested(RequestBatch),
}

impl CycleOutcome {
    pub fn requested_feeds(&self) -> &[String] {
        match self {
            CycleOutcome::UpdateRequested(batch) => &batch.feed_names,
            _ => &[],
        }
    }
}
