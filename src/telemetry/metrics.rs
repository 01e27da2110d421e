//! Prometheus metrics

use std::net::SocketAddr;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Poll requests sent to the monitor endpoint
    Polls,
    /// Poll replies carrying an error
    PollErrors,
    /// Update requests issued
    UpdateRequests,
    /// Retries after a dropped monitor connection
    RetryAttempts,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::Polls => "price_monitor_polls_total",
            CounterMetric::PollErrors => "price_monitor_poll_errors_total",
            CounterMetric::UpdateRequests => "price_monitor_update_requests_total",
            CounterMetric::RetryAttempts => "price_monitor_retry_attempts_total",
        }
    }
}

/// Increment a counter by one
pub fn increment_counter(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Record the latest non-zero deviation seen for a feed
pub fn set_feed_deviation(feed: &str, percentage: f64) {
    ::metrics::gauge!("price_monitor_deviation_pct", "feed" => feed.to_string()).set(percentage);
}

/// Install the Prometheus exporter with an HTTP listener on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
