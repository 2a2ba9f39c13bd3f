//! Errors raised while fetching and shaping an option chain.
//!
//! Every variant renders as a single user-facing message; callers never see
//! partial data alongside an error.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    /// Connection failure, timeout, or an unreadable body.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("API Error: {0}")]
    HttpStatus(u16),

    /// Upstream answered, but its status flag was not "success".
    #[error("No data available")]
    NoData,

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The ATM window left nothing to show.
    #[error("No data after filtering")]
    NoDataAfterFiltering,

    #[error("Missing parameters")]
    MissingParameters,

    #[error("Invalid expiry date: {0}")]
    InvalidExpiry(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type ChainResult<T> = Result<T, ChainError>;
