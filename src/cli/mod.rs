//! CLI interface for price-monitor
//!
//! Provides subcommands for:
//! - `run`: Poll the validator and request updates (default)
//! - `feeds`: Show the monitored feeds and their thresholds

mod feeds;
mod run;

pub use feeds::FeedsArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-monitor")]
#[command(
    about = "Monitors prices and requests a value be put on-chain if a threshold is passed"
)]
#[command(after_help = "For more information visit https://orcfax.io")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Run locally without certificate validation
    #[arg(long, global = true)]
    pub local: bool,
}

impl Cli {
    /// The requested command, `run` when none was given
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run(RunArgs::default()))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Poll prices and request on-chain updates
    Run(RunArgs),
    /// Show monitored feeds
    Feeds(FeedsArgs),
}
