use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};
use std::time::Duration;

// -----------------------------------------------
// UPSTOX API ENDPOINTS
// -----------------------------------------------
pub const UPSTOX_BASE_URL: &str = "https://api.upstox.com";
pub const OPTION_CHAIN_PATH: &str = "/v2/option/chain";

pub fn option_chain_url(base_url: &str, instrument_key: &str, expiry: &str) -> String {
    format!(
        "{}{}?instrument_key={}&expiry_date={}",
        base_url.trim_end_matches('/'),
        OPTION_CHAIN_PATH,
        urlencoding::encode(instrument_key),
        urlencoding::encode(expiry)
    )
}

// -----------------------------------------------
// INSTRUMENTS
// -----------------------------------------------
pub const NIFTY_50_KEY: &str = "NSE_INDEX|Nifty 50";
pub const BANK_NIFTY_KEY: &str = "NSE_INDEX|Nifty Bank";

pub const NIFTY_50_DISPLAY: &str = "NIFTY 50";
pub const BANK_NIFTY_DISPLAY: &str = "BANKNIFTY";

/// Resolve a user-facing alias ("NIFTY", "BANKNIFTY") to an instrument key.
/// Anything else is treated as a raw instrument key and passed through.
pub fn resolve_instrument_key(name: &str) -> String {
    match name.trim().to_ascii_uppercase().as_str() {
        "NIFTY" | "NIFTY50" | "NIFTY 50" => NIFTY_50_KEY.to_string(),
        "BANKNIFTY" | "NIFTYBANK" | "NIFTY BANK" => BANK_NIFTY_KEY.to_string(),
        _ => name.trim().to_string(),
    }
}

/// Display name shown above the chart
pub fn instrument_display_name(instrument_key: &str) -> &'static str {
    if instrument_key.contains("Nifty 50") {
        NIFTY_50_DISPLAY
    } else {
        BANK_NIFTY_DISPLAY
    }
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// A fetch cycle slower than this is logged at info level
pub const SLOW_CYCLE_MS: u128 = 2_000;
pub const HEADER_ACCEPT_JSON: &str = "application/json";
pub const STATUS_SUCCESS: &str = "success";

// -----------------------------------------------
// WINDOW / DISPLAY DEFAULTS
// -----------------------------------------------
pub const DEFAULT_STRIKES: i64 = 20;
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const EXPIRY_WIRE_FORMAT: &str = "%Y-%m-%d";
pub const EXPIRY_DISPLAY_FORMAT: &str = "%d %b %Y";

// -----------------------------------------------
// SENTIMENT THRESHOLDS (PCR)
// -----------------------------------------------
pub const PCR_BULLISH_BELOW: f64 = 0.7;
pub const PCR_BEARISH_ABOVE: f64 = 1.3;

/// Weekly index options expire on Thursday. Returns the next Thursday
/// strictly after `today`.
pub fn default_expiry(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let mut days_ahead = 3 - weekday;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    today + ChronoDuration::days(days_ahead)
}
