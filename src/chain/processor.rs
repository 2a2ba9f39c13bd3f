use super::config;
use super::error::{ChainError, ChainResult};
use super::models::{QuoteRecord, Side};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Summary statistics for a filtered chain
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChainMetrics {
    pub spot: f64,

    #[serde(rename = "atm")]
    pub atm_strike: f64,

    #[serde(rename = "total_ce")]
    pub total_call_oi: u64,

    #[serde(rename = "total_pe")]
    pub total_put_oi: u64,

    pub pcr: f64,
}

/// Filtered records plus their metrics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChainView {
    pub records: Vec<QuoteRecord>,
    pub metrics: ChainMetrics,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl Sentiment {
    pub fn from_pcr(pcr: f64) -> Self {
        if pcr < config::PCR_BULLISH_BELOW {
            Sentiment::Bullish
        } else if pcr > config::PCR_BEARISH_ABOVE {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Neutral => "Neutral",
            Sentiment::Bearish => "Bearish",
        }
    }
}

/// Filter to the ATM window and compute metrics.
///
/// A `window_size` of zero or less disables filtering.
pub fn compute_chain_view(records: &[QuoteRecord], window_size: i64) -> ChainResult<ChainView> {
    let filtered = filter_atm_window(records, window_size);
    let metrics = compute_metrics(&filtered).ok_or(ChainError::NoDataAfterFiltering)?;

    Ok(ChainView {
        records: filtered,
        metrics,
    })
}

/// Keep every record whose strike falls inside the ATM window, in input order
pub fn filter_atm_window(records: &[QuoteRecord], window_size: i64) -> Vec<QuoteRecord> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    if window_size <= 0 {
        return records.to_vec();
    }

    let strikes = distinct_strikes(records);
    let Some(atm_index) = find_atm_index(&strikes, first.underlying_spot) else {
        return Vec::new();
    };

    let window = atm_window(strikes.len(), atm_index, window_size as usize);
    let selected = &strikes[window];

    records
        .iter()
        .filter(|r| selected.contains(&r.strike))
        .copied()
        .collect()
}

/// Sorted, de-duplicated strikes
pub fn distinct_strikes(records: &[QuoteRecord]) -> Vec<f64> {
    let mut strikes: Vec<f64> = records.iter().map(|r| r.strike).collect();
    strikes.sort_by(f64::total_cmp);
    strikes.dedup();
    strikes
}

/// Index of the strike closest to spot in a sorted strike list.
/// Equidistant strikes resolve to the lower one.
pub fn find_atm_index(strikes: &[f64], spot: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, &strike) in strikes.iter().enumerate() {
        let distance = (strike - spot).abs();
        // Strictly closer only, so the lower of two equidistant strikes stays
        let closer = match best {
            Some((_, min_distance)) => distance < min_distance,
            None => true,
        };
        if closer {
            best = Some((idx, distance));
        }
    }

    best.map(|(idx, _)| idx)
}

/// ATM strike (closest to underlying, prefer floor)
pub fn find_atm_strike(strikes: &[f64], spot: f64) -> Option<f64> {
    find_atm_index(strikes, spot).map(|idx| strikes[idx])
}

/// Index range of the window around `atm_index`.
///
/// Starts as `atm ± size/2`, clipped to the list. A window touching the low
/// end is stretched to `size` strikes; one touching only the high end is
/// pulled back to `size` strikes.
pub fn atm_window(len: usize, atm_index: usize, size: usize) -> Range<usize> {
    let half = size / 2;
    let mut start = atm_index.saturating_sub(half);
    let mut end = (atm_index + half + 1).min(len);

    if start == 0 {
        end = len.min(size);
    } else if end == len {
        start = len.saturating_sub(size);
    }

    start..end
}

/// Spot, ATM strike, OI totals and PCR. `None` for an empty set.
pub fn compute_metrics(records: &[QuoteRecord]) -> Option<ChainMetrics> {
    let spot = records.first()?.underlying_spot;
    let atm_strike = find_atm_strike(&distinct_strikes(records), spot)?;

    let total_call_oi = total_oi(records, Side::Call);
    let total_put_oi = total_oi(records, Side::Put);

    Some(ChainMetrics {
        spot,
        atm_strike,
        total_call_oi,
        total_put_oi,
        pcr: calculate_pcr(total_call_oi, total_put_oi),
    })
}

pub fn total_oi(records: &[QuoteRecord], side: Side) -> u64 {
    records
        .iter()
        .filter(|r| r.side == side)
        .map(|r| r.oi)
        .sum()
}

/// Put OI over call OI; zero when there is no call OI
pub fn calculate_pcr(total_call_oi: u64, total_put_oi: u64) -> f64 {
    if total_call_oi > 0 {
        total_put_oi as f64 / total_call_oi as f64
    } else {
        0.0
    }
}
