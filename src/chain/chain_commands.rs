use super::UpstoxClient;
use super::config;
use super::models::{ChainRequest, QuoteRecord, Side};
use super::processor::Sentiment;
use super::report::{self, ChainReport};
use crate::api_server_axum;
use crate::utility::timing::Timer;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use std::time::Duration;
use tracing::{error, info};

/// Terminal front end: one fetch-process-render cycle per call
pub struct ChainCommands;

impl ChainCommands {
    /// Run a single fetch and print the result
    pub async fn run_single(
        client: &UpstoxClient,
        request: &ChainRequest,
        token: &str,
        csv_path: Option<&str>,
    ) -> Result<()> {
        println!("{}", "=".repeat(60).blue());
        println!("{}", "Option Chain Snapshot".green().bold());
        println!("{}", "=".repeat(60).blue());
        println!();

        println!(
            "{} Fetching option chain for {}...",
            "→".cyan(),
            request.instrument_key.yellow()
        );
        println!("{} Expiry: {}", "→".cyan(), report::expiry_display(request.expiry).yellow());
        println!();

        let report = Self::run_cycle(client, request, token).await?;

        Self::display_report(&report);

        if let Some(path) = csv_path {
            std::fs::write(path, &report.csv)
                .with_context(|| format!("Failed to write CSV to {}", path))?;
            println!("{} Saved {} rows to {}", "✓".green(), report.records.len(), path);
        }

        println!("{}", "=".repeat(60).blue());
        Ok(())
    }

    /// Refresh loop: repeat the single cycle with a fixed pause in between.
    /// A failed cycle is reported and the loop carries on.
    pub async fn run_watch(
        client: &UpstoxClient,
        request: &ChainRequest,
        token: &str,
        csv_path: Option<&str>,
        refresh_secs: u64,
    ) -> Result<()> {
        println!(
            "{} Auto-refresh every {}s (Ctrl+C to stop)",
            "ℹ".blue(),
            refresh_secs
        );

        loop {
            if let Err(e) = Self::run_single(client, request, token, csv_path).await {
                error!(error = %e, "refresh cycle failed");
                println!("{} {}", "✗".red(), e);
            }
            tokio::time::sleep(Duration::from_secs(refresh_secs)).await;
        }
    }

    /// Run API server mode
    pub async fn run_server(client: UpstoxClient, host: &str, port: u16) -> Result<()> {
        println!("{}", "=".repeat(60).blue());
        println!("{}", "Option Chain API Server".green().bold());
        println!("{}", "=".repeat(60).blue());
        println!();

        api_server_axum::start_server(client, host, port).await
    }

    /// Fetch, filter and shape one report
    pub async fn run_cycle(
        client: &UpstoxClient,
        request: &ChainRequest,
        token: &str,
    ) -> Result<ChainReport> {
        let timer = Timer::start_with_threshold("fetch cycle", config::SLOW_CYCLE_MS);

        let snapshot = client.fetch_snapshot(request, token).await?;
        let report = report::build_report(&snapshot, request.window_size)?;

        let elapsed = timer.stop();
        info!(
            instrument = %request.instrument_key,
            rows = report.records.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "option chain processed"
        );

        Ok(report)
    }

    /// Metrics block followed by the strike table
    fn display_report(report: &ChainReport) {
        let m = &report.metrics;

        println!("{}", "=".repeat(60).blue());
        println!(
            "{} {}",
            report.chart.instrument.cyan().bold(),
            format!("Expiry: {}", report.chart.expiry_display).cyan()
        );
        println!("{}", "=".repeat(60).blue());
        println!("{} Spot Price: ₹{:.2}", "✓".green(), m.spot);
        println!("{} ATM Strike: {}", "✓".green(), m.atm_strike);
        println!("{} Total CALL OI: {}", "✓".green(), m.total_call_oi);
        println!("{} Total PUT OI: {}", "✓".green(), m.total_put_oi);

        let label = report.sentiment.label();
        let label = match report.sentiment {
            Sentiment::Bullish => label.green(),
            Sentiment::Bearish => label.red(),
            Sentiment::Neutral => label.yellow(),
        };
        println!("{} PCR: {:.2} ({})", "✓".green(), m.pcr, label);
        println!(
            "{} Last Updated: {}",
            "⏱".yellow(),
            Local::now().format("%H:%M:%S")
        );
        println!();

        println!("{}", Self::table_header().bold());
        for record in &report.records {
            println!("{}", Self::table_row(record, m.atm_strike));
        }
        println!();
    }

    fn table_header() -> String {
        format!("{:>10}  {:<4}  {:>12}  {:>10}", "Strike", "Type", "OI", "LTP")
    }

    fn table_row(record: &QuoteRecord, atm_strike: f64) -> String {
        let side = match record.side {
            Side::Call => record.side.designator().green(),
            Side::Put => record.side.designator().red(),
        };
        let row = format!(
            "{:>10}  {:<4}  {:>12}  {:>10.2}",
            record.strike, side, record.oi, record.ltp
        );
        if record.strike == atm_strike { row.bold().to_string() } else { row }
    }

    /// Print usage instructions
    pub fn print_usage() {
        eprintln!("Set CHAIN_MODE environment variable to control execution mode");
        eprintln!("Examples:");
        eprintln!("  UPSTOX_ACCESS_TOKEN=... CHAIN_MODE=single cargo run");
        eprintln!(
            "  UPSTOX_ACCESS_TOKEN=... CHAIN_MODE=watch CHAIN_REFRESH_SECS={} cargo run",
            config::DEFAULT_REFRESH_SECS
        );
        eprintln!("  CHAIN_MODE=server CHAIN_PORT={} cargo run", config::DEFAULT_PORT);
        eprintln!("Optional: CHAIN_INSTRUMENT=NIFTY|BANKNIFTY CHAIN_EXPIRY=YYYY-MM-DD CHAIN_STRIKES=20 CHAIN_CSV_PATH=chain.csv");
    }
}
