//! Feeds command implementation

use crate::config::Config;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct FeedsArgs {}

impl FeedsArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let registry = config.monitor.registry()?;

        println!("Monitored feeds ({}):", registry.len());
        for feed in registry.iter() {
            println!("  {:<12} {:>5.2}%", feed.name, feed.deviation_threshold);
        }
        println!("  (default)    {:>5.2}%", registry.default_threshold());
        println!(
            "Polling every {}s",
            config.monitor.polling_interval_secs
        );

        Ok(())
    }
}
