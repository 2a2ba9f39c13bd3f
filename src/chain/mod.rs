pub mod chain_commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod processor;
pub mod report;
pub mod upstox_client;

// Re-exports (public API)
pub use error::{ChainError, ChainResult};
pub use extractor::extract_records;
pub use models::{ChainRequest, OptionChainResponse, OptionChainSnapshot, QuoteRecord, Side};
pub use processor::{
    ChainMetrics, ChainView, Sentiment, atm_window, calculate_pcr, compute_chain_view,
    compute_metrics, distinct_strikes, filter_atm_window, find_atm_index, find_atm_strike,
};
pub use report::{ChainReport, ChartSeries, build_report, export_csv};
pub use upstox_client::UpstoxClient;
