//! Presentation-ready shapes built on top of the core chain view: grouped bar
//! chart series, sentiment label, and the CSV dump of the filtered table.

use super::config;
use super::error::ChainResult;
use super::models::{OptionChainSnapshot, QuoteRecord, Side};
use super::processor::{self, ChainMetrics, Sentiment};
use chrono::NaiveDate;
use serde::Serialize;

/// Series for a grouped CALL/PUT open interest bar chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSeries {
    pub ce_strikes: Vec<f64>,
    pub ce_oi: Vec<u64>,
    pub pe_strikes: Vec<f64>,
    pub pe_oi: Vec<u64>,
    pub instrument: String,
    pub expiry_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub metrics: ChainMetrics,
    pub sentiment: Sentiment,
    pub chart: ChartSeries,
    #[serde(rename = "df")]
    pub records: Vec<QuoteRecord>,
    pub csv: String,
}

/// Run the core view over a snapshot and shape everything a front end shows
pub fn build_report(snapshot: &OptionChainSnapshot, window_size: i64) -> ChainResult<ChainReport> {
    let view = processor::compute_chain_view(&snapshot.records, window_size)?;

    let chart = build_chart(&view.records, &snapshot.instrument_key, snapshot.expiry);
    let csv = export_csv(&view.records)?;

    Ok(ChainReport {
        sentiment: Sentiment::from_pcr(view.metrics.pcr),
        metrics: view.metrics,
        chart,
        records: view.records,
        csv,
    })
}

pub fn build_chart(records: &[QuoteRecord], instrument_key: &str, expiry: NaiveDate) -> ChartSeries {
    let (ce_strikes, ce_oi) = side_series(records, Side::Call);
    let (pe_strikes, pe_oi) = side_series(records, Side::Put);

    ChartSeries {
        ce_strikes,
        ce_oi,
        pe_strikes,
        pe_oi,
        instrument: config::instrument_display_name(instrument_key).to_string(),
        expiry_display: expiry_display(expiry),
    }
}

/// Strike-sorted (strike, oi) pairs for one side, split into parallel vectors
fn side_series(records: &[QuoteRecord], side: Side) -> (Vec<f64>, Vec<u64>) {
    let mut rows: Vec<&QuoteRecord> = records.iter().filter(|r| r.side == side).collect();
    rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    rows.into_iter().map(|r| (r.strike, r.oi)).unzip()
}

/// "2025-12-30" → "30 Dec 2025"
pub fn expiry_display(expiry: NaiveDate) -> String {
    expiry.format(config::EXPIRY_DISPLAY_FORMAT).to_string()
}

/// Straight tabular dump: strike,type,oi,ltp,underlying
pub fn export_csv(records: &[QuoteRecord]) -> ChainResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    // The writer only ever sees UTF-8 from serde
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
