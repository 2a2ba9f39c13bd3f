use crate::chain::error::ChainError;
use crate::chain::models::ChainRequest;
use crate::chain::report::{self, ChainReport};
use crate::chain::{UpstoxClient, config};
use crate::utility::timing::Timer;
use anyhow::Result;
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value, json};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

// -----------------------------------------------
// API REQUEST/RESPONSE MODELS
// -----------------------------------------------

/// Body of POST /api/option-chain. Every field is optional on the wire so a
/// missing one surfaces as "Missing parameters" rather than a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct OptionChainQuery {
    pub token: Option<String>,
    pub instrument: Option<String>,
    pub expiry: Option<String>,
    #[serde(default, deserialize_with = "deserialize_strikes")]
    pub strikes: Option<i64>,
}

/// Any JSON number is a strike count; fractional values round down
fn deserialize_strikes<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match number.as_i64() {
        Some(n) => Ok(Some(n)),
        None => number
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|v| Some(v.floor() as i64))
            .ok_or_else(|| de::Error::custom(format!("invalid strike count: {}", number))),
    }
}

/// Report fields sit at the top level next to `success`, so a client reading
/// `metrics`/`chart`/`df`/`csv` directly keeps working.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    pub error: Option<String>,
    pub processing_time_ms: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, timer: &Timer) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            processing_time_ms: Some(timer.elapsed_ms()),
        }
    }

    fn err(error: impl ToString, timer: &Timer) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            processing_time_ms: Some(timer.elapsed_ms()),
        }
    }
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    client: UpstoxClient,
}

impl AppState {
    pub fn new(client: UpstoxClient) -> Self {
        Self { client }
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// POST /api/option-chain - fetch, filter and shape one chain
async fn get_option_chain(
    State(app_state): State<AppState>,
    payload: Result<Json<OptionChainQuery>, JsonRejection>,
) -> Result<Json<ApiResponse<ChainReport>>, StatusCode> {
    let timer = Timer::start("api option-chain");

    let query = match payload {
        Ok(Json(query)) => query,
        Err(rejection) => {
            warn!(error = %rejection, "rejected request body");
            return Ok(Json(ApiResponse::err(rejection.body_text(), &timer)));
        }
    };

    let (token, request) = match parse_query(query) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(Json(ApiResponse::err(e, &timer))),
    };

    let result = async {
        let snapshot = app_state.client.fetch_snapshot(&request, &token).await?;
        report::build_report(&snapshot, request.window_size)
    }
    .await;

    match result {
        Ok(report) => {
            info!(
                instrument = %request.instrument_key,
                rows = report.records.len(),
                pcr = report.metrics.pcr,
                "option chain served"
            );
            let response = ApiResponse::ok(report, &timer);
            timer.stop();
            Ok(Json(response))
        }
        Err(e) => {
            warn!(instrument = %request.instrument_key, error = %e, "option chain failed");
            Ok(Json(ApiResponse::err(e, &timer)))
        }
    }
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

// -----------------------------------------------
// HELPER FUNCTIONS
// -----------------------------------------------

/// Validate the body into a token plus a typed request
fn parse_query(query: OptionChainQuery) -> Result<(String, ChainRequest), ChainError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let (Some(token), Some(instrument), Some(expiry)) = (
        non_empty(query.token),
        non_empty(query.instrument),
        non_empty(query.expiry),
    ) else {
        return Err(ChainError::MissingParameters);
    };

    let expiry = NaiveDate::parse_from_str(expiry.trim(), config::EXPIRY_WIRE_FORMAT)
        .map_err(|_| ChainError::InvalidExpiry(expiry.clone()))?;

    Ok((
        token,
        ChainRequest {
            instrument_key: config::resolve_instrument_key(&instrument),
            expiry,
            window_size: query.strikes.unwrap_or(config::DEFAULT_STRIKES),
        },
    ))
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/option-chain", post(get_option_chain))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn start_server(client: UpstoxClient, host: &str, port: u16) -> Result<()> {
    let app = router(AppState::new(client));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "option chain API listening");
    println!("🚀 Option Chain API Server running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   POST /api/option-chain  {{token, instrument, expiry, strikes}}");
    println!("   GET  /health");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
