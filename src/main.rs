use anyhow::{Context, Result};
use colored::Colorize;
use option_chain_analyzer::app_config::{AppConfig, Mode};
use option_chain_analyzer::chain::chain_commands::ChainCommands;
use option_chain_analyzer::chain::{ChainRequest, UpstoxClient};
use option_chain_analyzer::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    // ========================================
    // CONFIGURATION - from environment
    // ========================================
    let app_config = match AppConfig::from_env().and_then(|cfg| cfg.validate().map(|_| cfg)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            ChainCommands::print_usage();
            std::process::exit(1);
        }
    };

    let client = UpstoxClient::with_base_url(app_config.base_url.clone())
        .context("Failed to build HTTP client")?;

    let request = ChainRequest {
        instrument_key: app_config.instrument_key.clone(),
        expiry: app_config.expiry,
        window_size: app_config.strikes,
    };
    let token = app_config.token.clone().unwrap_or_default();
    let csv_path = app_config.csv_path.as_deref();

    match app_config.mode {
        Mode::Single => ChainCommands::run_single(&client, &request, &token, csv_path).await?,
        Mode::Watch => {
            ChainCommands::run_watch(&client, &request, &token, csv_path, app_config.refresh_secs)
                .await?
        }
        Mode::Server => ChainCommands::run_server(client, &app_config.host, app_config.port).await?,
    }

    Ok(())
}
