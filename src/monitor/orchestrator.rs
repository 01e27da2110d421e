//! Polling orchestrator
//!
//! Each cycle:
//! 1. Ask the monitor endpoint for every catalogued feed's price pair
//! 2. Compute the deviation between published and unpublished values
//! 3. Request an on-chain update for feeds at or over their threshold
//! 4. Sleep for the polling interval

use super::types::{CycleOutcome, PollResponse};
use crate::feed::{FeedRegistry, PriceObservation, RequestBatch};
use crate::telemetry::{increment_counter, set_feed_deviation, CounterMetric};
use crate::ws::{Connection, Endpoint, Transport, WsError};
use std::future::Future;
use std::time::Duration;

/// Default time between poll cycles
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(60);

/// Drives the poll/evaluate/request cycle
pub struct PriceMonitor<T: Transport> {
    connection: Connection<T>,
    registry: FeedRegistry,
    polling_interval: Duration,
}

impl<T: Transport> PriceMonitor<T> {
    pub fn new(connection: Connection<T>, registry: FeedRegistry) -> Self {
        Self {
            connection,
            registry,
            polling_interval: DEFAULT_POLLING_INTERVAL,
        }
    }

    /// Set the time between cycles
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// Poll request naming every catalogued feed: `{"feed_ids": [...]}`
    pub fn price_request(&self) -> String {
        serde_json::json!({ "feed_ids": self.registry.all_names() }).to_string()
    }

    /// Collect feeds whose deviation meets their threshold
    pub fn evaluate(&self, observations: &[PriceObservation]) -> RequestBatch {
        let mut batch = RequestBatch::new();

        for observation in observations {
            tracing::debug!(
                feed = %observation.feed_name,
                published = ?observation.value_published,
                unpublished = ?observation.value_unpublished,
                "Received price pair"
            );

            let result = observation.deviation();
            if result.is_zero() {
                continue;
            }

            let threshold = self.registry.lookup(&result.feed_name);
            tracing::info!(
                feed = %result.feed_name,
                published = ?observation.value_published,
                unpublished = ?observation.value_unpublished,
                deviation = result.percentage,
                threshold,
                "Deviation (%) calculated"
            );
            // Only catalogued feeds get a gauge series
            if self.registry.contains(&result.feed_name) {
                set_feed_deviation(&result.feed_name, result.percentage);
            }

            if !result.exceeds(threshold) {
                continue;
            }

            if !self.registry.contains(&result.feed_name) {
                tracing::warn!(
                    feed = %result.feed_name,
                    deviation = result.percentage,
                    "Feed not in catalogue, skipping update request"
                );
                continue;
            }

            tracing::info!(
                feed = %result.feed_name,
                deviation = result.percentage,
                threshold,
                "Deviation over threshold, requesting new price on-chain"
            );
            batch.insert(result.feed_name);
        }

        batch
    }

    /// Run one poll/evaluate/request cycle without sleeping
    pub async fn run_cycle(&self) -> Result<CycleOutcome, WsError> {
        let request = self.price_request();
        tracing::info!(request = %request, "Request for prices");
        increment_counter(CounterMetric::Polls);

        let reply = self.connection.exchange(Endpoint::Monitor, &request).await?;
        let response = PollResponse::from_value(&reply);

        if let Some(error) = response.error {
            tracing::error!(error = %error, "Error in websocket response");
            increment_counter(CounterMetric::PollErrors);
            return Ok(CycleOutcome::ServiceError(error));
        }

        tracing::debug!(observations = response.observations.len(), "Received price pairs");

        let batch = self.evaluate(&response.observations);
        if batch.is_empty() {
            tracing::info!("No feeds over their deviation threshold");
            return Ok(CycleOutcome::NothingToRequest);
        }

        let message = batch.to_message();
        tracing::info!(feeds = ?batch.feed_names, "Requesting on-chain update");
        increment_counter(CounterMetric::UpdateRequests);
        self.connection
            .exchange(Endpoint::UpdateRequest, &message)
            .await?;

        Ok(CycleOutcome::UpdateRequested(batch))
    }

    /// Cycle forever until `shutdown` resolves.
    ///
    /// Shutdown is checked before every cycle and while sleeping; an
    /// exchange in flight when it fires is abandoned. Only fatal connection
    /// errors end the loop early.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), WsError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            feeds = self.registry.len(),
            interval_secs = self.polling_interval.as_secs(),
            "Starting price monitor"
        );
        if self.registry.is_empty() {
            tracing::warn!("No feeds catalogued, no update will ever be requested");
        }

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("exiting...");
                    return Ok(());
                }
                result = self.cycle_then_wait() => result?,
            }
        }
    }

    async fn cycle_then_wait(&self) -> Result<(), WsError> {
        let outcome = self.run_cycle().await?;
        tracing::debug!(?outcome, "Cycle complete");

        tracing::info!(secs = self.polling_interval.as_secs(), "Polling");
        tokio::time::sleep(self.polling_interval).await;
        Ok(())
    }
}
