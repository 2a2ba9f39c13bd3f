pub mod api_server_axum;
pub mod app_config;
pub mod chain;
pub mod logging;
pub mod utility;

// Re-exports for convenience
pub use chain::{compute_chain_view, ChainError, ChainMetrics, ChainView, QuoteRecord, Side, UpstoxClient};
