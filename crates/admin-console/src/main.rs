use admin_console::cli::{self, Cli};
use admin_console::config::ConsoleConfig;
use admin_console::lifecycle::{setup_tracing, ConsoleSystem};
use admin_console::ConsoleError;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    let args = Cli::parse();
    setup_tracing();

    let config = ConsoleConfig::load()?;
    info!(base_url = %config.api.base_url, "Starting admin console");
    let system = ConsoleSystem::from_config(&config)?;

    let result = cli::run(&system, args.command).await;
    system.shutdown().await?;

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
