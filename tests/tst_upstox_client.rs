use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use option_chain_analyzer::chain::{ChainError, ChainRequest, QuoteRecord, UpstoxClient, config};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ChainParams {
    instrument_key: String,
    expiry_date: String,
}

/// Stub of the broker endpoint. Token "good" gets data, "empty" gets a
/// non-success status, "garbage" gets a non-JSON body, anything else a 401.
async fn stub_option_chain(headers: HeaderMap, Query(params): Query<ChainParams>) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if params.instrument_key != config::NIFTY_50_KEY || params.expiry_date != "2025-12-30" {
        return (StatusCode::BAD_REQUEST, "bad params").into_response();
    }

    match auth.as_str() {
        "Bearer good" => Json(json!({
            "status": "success",
            "data": [
                {
                    "strike_price": 25950.0,
                    "underlying_spot_price": 26010.0,
                    "call_options": {"market_data": {"oi": 300.0, "ltp": 110.0}},
                    "put_options": {"market_data": {"oi": 900.0, "ltp": 40.0}}
                },
                {
                    "strike_price": 26000.0,
                    "underlying_spot_price": 26010.0,
                    "call_options": {"market_data": {"oi": 1000.0, "ltp": 80.0}},
                    "put_options": {"market_data": {"oi": 500.0, "ltp": 70.0}}
                },
                {
                    "strike_price": 26050.0,
                    "underlying_spot_price": 26010.0,
                    "call_options": {"market_data": {"oi": 700.0, "ltp": 55.0}}
                }
            ]
        }))
        .into_response(),
        "Bearer empty" => Json(json!({"status": "error", "data": []})).into_response(),
        "Bearer garbage" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => (StatusCode::UNAUTHORIZED, "invalid token").into_response(),
    }
}

async fn spawn_stub() -> String {
    let app = Router::new().route(config::OPTION_CHAIN_PATH, get(stub_option_chain));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn nifty_request() -> ChainRequest {
    ChainRequest {
        instrument_key: config::NIFTY_50_KEY.to_string(),
        expiry: NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
        window_size: 20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_snapshot_flattens_records() {
        let client = UpstoxClient::with_base_url(spawn_stub().await).unwrap();

        let snapshot = client.fetch_snapshot(&nifty_request(), "good").await.unwrap();
        assert_eq!(snapshot.instrument_key, config::NIFTY_50_KEY);
        assert_eq!(snapshot.records.len(), 5);
        assert_eq!(snapshot.records[2], QuoteRecord::call(26000.0, 1000, 80.0, 26010.0));
        assert!(snapshot.records.iter().all(|r| r.underlying_spot == 26010.0));
    }

    #[tokio::test]
    async fn test_http_error_surfaces_status() {
        let client = UpstoxClient::with_base_url(spawn_stub().await).unwrap();

        let err = client.fetch_snapshot(&nifty_request(), "expired").await.unwrap_err();
        assert!(matches!(err, ChainError::HttpStatus(401)));
        assert_eq!(err.to_string(), "API Error: 401");
    }

    #[tokio::test]
    async fn test_non_success_status_is_no_data() {
        let client = UpstoxClient::with_base_url(spawn_stub().await).unwrap();

        let err = client.fetch_snapshot(&nifty_request(), "empty").await.unwrap_err();
        assert!(matches!(err, ChainError::NoData));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let client = UpstoxClient::with_base_url(spawn_stub().await).unwrap();

        let err = client.fetch_snapshot(&nifty_request(), "garbage").await.unwrap_err();
        assert!(matches!(err, ChainError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = UpstoxClient::with_base_url(format!("http://{}", addr)).unwrap();
        let err = client.fetch_snapshot(&nifty_request(), "good").await.unwrap_err();
        assert!(matches!(err, ChainError::Transport(_)));
        assert!(err.to_string().starts_with("Network error"));
    }
}
