use super::models::{OptionChainResponse, QuoteRecord, Side, StrikeEntry};

/// Flatten the nested per-strike payload into quote records, call before put.
pub fn extract_records(response: &OptionChainResponse) -> Vec<QuoteRecord> {
    response
        .data
        .iter()
        .flat_map(extract_strike)
        .collect()
}

/// Zero, one or two records for a single strike
pub fn extract_strike(entry: &StrikeEntry) -> Vec<QuoteRecord> {
    [
        (Side::Call, entry.call_options.as_ref()),
        (Side::Put, entry.put_options.as_ref()),
    ]
    .into_iter()
    .filter_map(|(side, block)| {
        let market = block?.quote()?;
        Some(QuoteRecord {
            strike: entry.strike_price,
            side,
            oi: to_contracts(market.oi),
            ltp: market.ltp.unwrap_or(0.0).max(0.0),
            underlying_spot: entry.underlying_spot_price,
        })
    })
    .collect()
}

/// OI arrives as a JSON number; anything negative or missing counts as zero.
fn to_contracts(oi: Option<f64>) -> u64 {
    match oi {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> OptionChainResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_both_sides_yield_two_records() {
        let response = parse(json!({
            "status": "success",
            "data": [{
                "strike_price": 22000.0,
                "underlying_spot_price": 22010.5,
                "call_options": {"market_data": {"oi": 1000.0, "ltp": 120.5}},
                "put_options": {"market_data": {"oi": 500.0, "ltp": 98.0}}
            }]
        }));

        let records = extract_records(&response);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], QuoteRecord::call(22000.0, 1000, 120.5, 22010.5));
        assert_eq!(records[1], QuoteRecord::put(22000.0, 500, 98.0, 22010.5));
    }

    #[test]
    fn test_missing_sides_contribute_nothing() {
        let response = parse(json!({
            "status": "success",
            "data": [
                {"strike_price": 100.0, "underlying_spot_price": 101.0},
                {"strike_price": 105.0, "underlying_spot_price": 101.0,
                 "call_options": {"market_data": null},
                 "put_options": {"market_data": {}}},
                {"strike_price": 110.0, "underlying_spot_price": 101.0,
                 "put_options": {"market_data": {"ltp": 9.5}}}
            ]
        }));

        let records = extract_records(&response);
        assert_eq!(records, vec![QuoteRecord::put(110.0, 0, 9.5, 101.0)]);
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let entry: StrikeEntry = serde_json::from_value(json!({
            "strike_price": 100.0,
            "underlying_spot_price": 99.0,
            "call_options": {"market_data": {"volume": 25.0}}
        }))
        .unwrap();

        let records = extract_strike(&entry);
        assert_eq!(records, vec![QuoteRecord::call(100.0, 0, 0.0, 99.0)]);
    }

    #[test]
    fn test_null_and_unmodelled_fields_still_quote() {
        let entry: StrikeEntry = serde_json::from_value(json!({
            "strike_price": 26000.0,
            "underlying_spot_price": 26010.0,
            "call_options": {"market_data": {"oi": null, "ltp": null}},
            "put_options": {"market_data": {"delta": 0.4}}
        }))
        .unwrap();

        let records = extract_strike(&entry);
        assert_eq!(
            records,
            vec![
                QuoteRecord::call(26000.0, 0, 0.0, 26010.0),
                QuoteRecord::put(26000.0, 0, 0.0, 26010.0),
            ]
        );
    }

    #[test]
    fn test_negative_oi_clamped() {
        assert_eq!(to_contracts(Some(-5.0)), 0);
        assert_eq!(to_contracts(Some(1234.0)), 1234);
        assert_eq!(to_contracts(None), 0);
    }
}
