//! Validator connection with exponential-backoff retry

use super::client::Transport;
use super::retry::RetryPolicy;
use super::types::{Endpoint, ValidatorEndpoints, WsError};
use crate::telemetry::{increment_counter, CounterMetric};
use serde_json::{Map, Value};
use tokio::time::sleep;

/// Performs request/reply exchanges against the validator endpoints
pub struct Connection<T: Transport> {
    transport: T,
    endpoints: ValidatorEndpoints,
    retry: RetryPolicy,
}

impl<T: Transport> Connection<T> {
    pub fn new(transport: T, endpoints: ValidatorEndpoints, retry: RetryPolicy) -> Self {
        Self {
            transport,
            endpoints,
            retry,
        }
    }

    /// Send `payload` to `endpoint` and return the decoded reply.
    ///
    /// Dropped connections to the monitor endpoint are retried with backoff
    /// until they succeed (or the policy's attempt cap is hit). Anything else
    /// that isn't fatal degrades to an empty object. Only invalid endpoints,
    /// TLS setup failures and exhausted retries are returned as errors.
    pub async fn exchange(&self, endpoint: Endpoint, payload: &str) -> Result<Value, WsError> {
        let uri = self.endpoints.uri(endpoint);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let err = match self.transport.send_and_receive(uri, payload).await {
                Ok(text) => return Ok(decode_reply(uri, &text)),
                Err(e) => e,
            };

            if err.is_fatal() {
                tracing::error!(
                    uri,
                    error = %err,
                    "Validator endpoint unusable, ensure ORCFAX_VALIDATOR is set (e.g. wss://...)"
                );
                return Err(err);
            }

            if err.is_recoverable() && endpoint == Endpoint::Monitor {
                tracing::warn!(
                    uri,
                    attempt,
                    error = %err,
                    "Closed connection error, attempting exponential retry"
                );
                increment_counter(CounterMetric::RetryAttempts);

                if !self.retry.should_retry(attempt) {
                    tracing::error!(uri, attempt, "Retry attempts exhausted");
                    return Err(WsError::RetriesExhausted {
                        uri: uri.to_string(),
                        attempts: attempt,
                    });
                }

                let delay = self.retry.delay_for_attempt(attempt);
                tracing::info!(
                    uri,
                    tries = attempt,
                    wait_secs = delay.as_secs_f64(),
                    "Attempting connection to validator websocket"
                );
                sleep(delay).await;
                continue;
            }

            match err {
                WsError::ConnectionClosed { .. } => {
                    tracing::error!(uri, %endpoint, error = %err, "Connection closed without reply");
                }
                _ => {
                    tracing::warn!(uri, %endpoint, error = %err, "Exchange failed, continuing");
                }
            }
            return Ok(Value::Object(Map::new()));
        }
    }
}

/// Decode a JSON reply, falling back to the raw text
fn decode_reply(uri: &str, text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(uri, error = %e, reply = text, "Failed to decode server response");
            Value::String(text.to_string())
        }
    }
}
