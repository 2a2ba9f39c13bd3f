use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// -----------------------------------------------
// UPSTREAM RESPONSE (Upstox v2/option/chain)
// -----------------------------------------------

/// Main response structure from the option chain API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub data: Vec<StrikeEntry>,
}

/// One strike with its optional call and put sides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeEntry {
    #[serde(default)]
    pub expiry: Option<String>,

    pub strike_price: f64,

    pub underlying_spot_price: f64,

    #[serde(default)]
    pub pcr: Option<f64>,

    #[serde(default)]
    pub call_options: Option<OptionSide>,

    #[serde(default)]
    pub put_options: Option<OptionSide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSide {
    #[serde(default)]
    pub instrument_key: Option<String>,

    /// Kept as the raw object: any key at all, even one holding `null`,
    /// makes the side count as quoted.
    #[serde(default)]
    pub market_data: Option<Map<String, Value>>,
}

impl OptionSide {
    /// Typed view of the market data block, `None` when it is absent or `{}`
    pub fn quote(&self) -> Option<MarketData> {
        let raw = self.market_data.as_ref().filter(|m| !m.is_empty())?;
        Some(MarketData::from_raw(raw))
    }
}

/// Market data for a single side. Upstox may omit or null any field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketData {
    pub ltp: Option<f64>,
    pub volume: Option<f64>,
    pub oi: Option<f64>,
    pub close_price: Option<f64>,
    pub bid_price: Option<f64>,
    pub bid_qty: Option<f64>,
    pub ask_price: Option<f64>,
    pub ask_qty: Option<f64>,
    pub prev_oi: Option<f64>,
}

impl MarketData {
    pub fn from_raw(raw: &Map<String, Value>) -> Self {
        let number = |key: &str| raw.get(key).and_then(Value::as_f64);
        Self {
            ltp: number("ltp"),
            volume: number("volume"),
            oi: number("oi"),
            close_price: number("close_price"),
            bid_price: number("bid_price"),
            bid_qty: number("bid_qty"),
            ask_price: number("ask_price"),
            ask_qty: number("ask_qty"),
            prev_oi: number("prev_oi"),
        }
    }
}

// -----------------------------------------------
// FLATTENED QUOTES
// -----------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
}

impl Side {
    pub fn designator(&self) -> &'static str {
        match self {
            Side::Call => "CE",
            Side::Put => "PE",
        }
    }
}

/// One side of one strike. Field names double as the table/CSV columns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QuoteRecord {
    pub strike: f64,

    #[serde(rename = "type")]
    pub side: Side,

    pub oi: u64,

    pub ltp: f64,

    #[serde(rename = "underlying")]
    pub underlying_spot: f64,
}

impl QuoteRecord {
    pub fn call(strike: f64, oi: u64, ltp: f64, underlying_spot: f64) -> Self {
        Self { strike, side: Side::Call, oi, ltp, underlying_spot }
    }

    pub fn put(strike: f64, oi: u64, ltp: f64, underlying_spot: f64) -> Self {
        Self { strike, side: Side::Put, oi, ltp, underlying_spot }
    }
}

/// Everything one fetch produced, in upstream order
#[derive(Debug, Clone, Serialize)]
pub struct OptionChainSnapshot {
    pub instrument_key: String,
    pub expiry: NaiveDate,
    pub records: Vec<QuoteRecord>,
}

/// What the caller asked for
#[derive(Debug, Clone)]
pub struct ChainRequest {
    pub instrument_key: String,
    pub expiry: NaiveDate,
    pub window_size: i64,
}
