use clap::Parser;
use price_monitor::cli::{Cli, Commands};
use price_monitor::config::{Config, VALIDATOR_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::embedded()?
        }
    }
    .with_base_uri_override(std::env::var(VALIDATOR_ENV).ok());

    // Initialize telemetry
    let _telemetry = price_monitor::telemetry::init_telemetry(&config.telemetry)?;

    match cli.selected_command() {
        Commands::Run(args) => {
            tracing::info!(local = cli.local, "Starting price monitor");
            if let Err(e) = args.execute(&config, cli.local).await {
                tracing::error!(error = %e, "Price monitor stopped");
                return Err(e);
            }
        }
        Commands::Feeds(args) => {
            args.execute(&config)?;
        }
    }

    Ok(())
}
