//! Run command implementation

use crate::config::Config;
use crate::monitor::PriceMonitor;
use crate::ws::{Connection, TransportMode, WsTransport};
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {}

impl RunArgs {
    pub async fn execute(&self, config: &Config, local: bool) -> anyhow::Result<()> {
        let endpoints = config.validator.endpoints()?;
        let registry = config.monitor.registry()?;
        let mode = TransportMode::from_local_flag(local);

        tracing::info!(
            monitor_uri = %endpoints.monitor_uri,
            update_uri = %endpoints.update_uri,
            ?mode,
            "Validator endpoints configured"
        );

        let transport = WsTransport::new(mode)?.reply_timeout(config.validator.reply_timeout());
        let connection = Connection::new(transport, endpoints, config.retry.policy());
        let monitor = PriceMonitor::new(connection, registry)
            .polling_interval(config.monitor.polling_interval());

        monitor.run(shutdown_signal()).await?;
        Ok(())
    }
}

/// Resolves on Ctrl-C. If the handler can't be installed the monitor runs
/// until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    eprintln!();
}
