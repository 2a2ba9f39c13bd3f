use super::config;
use super::error::{ChainError, ChainResult};
use super::extractor;
use super::models::{ChainRequest, OptionChainResponse, OptionChainSnapshot};
use reqwest::{header, Client};
use tracing::{debug, warn};

// -----------------------------------------------
// CLIENT WRAPPER
// -----------------------------------------------
#[derive(Clone)]
pub struct UpstoxClient {
    client: Client,
    base_url: String,
}

impl UpstoxClient {
    pub fn new() -> ChainResult<Self> {
        Self::with_base_url(config::UPSTOX_BASE_URL)
    }

    /// Point the client at another host (a sandbox or a local stub)
    pub fn with_base_url(base_url: impl Into<String>) -> ChainResult<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    /// Single GET against the option chain endpoint. No retry: any transport
    /// failure or non-2xx status aborts the cycle.
    pub async fn fetch_option_chain(
        &self,
        instrument_key: &str,
        expiry: &str,
        token: &str,
    ) -> ChainResult<OptionChainResponse> {
        let url = config::option_chain_url(&self.base_url, instrument_key, expiry);
        debug!(%url, "fetching option chain");

        let res = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            warn!(status = status.as_u16(), body = %preview, "option chain request rejected");
            return Err(ChainError::HttpStatus(status.as_u16()));
        }

        let text = res.text().await?;
        let chain: OptionChainResponse = serde_json::from_str(&text)?;

        if chain.status.as_deref() != Some(config::STATUS_SUCCESS) {
            warn!(status = ?chain.status, "upstream reported no data");
            return Err(ChainError::NoData);
        }

        debug!(strikes = chain.data.len(), "option chain received");
        Ok(chain)
    }

    /// Fetch and flatten into a snapshot
    pub async fn fetch_snapshot(
        &self,
        request: &ChainRequest,
        token: &str,
    ) -> ChainResult<OptionChainSnapshot> {
        let expiry = request.expiry.format(config::EXPIRY_WIRE_FORMAT).to_string();
        let chain = self
            .fetch_option_chain(&request.instrument_key, &expiry, token)
            .await?;

        Ok(OptionChainSnapshot {
            instrument_key: request.instrument_key.clone(),
            expiry: request.expiry,
            records: extractor::extract_records(&chain),
        })
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> ChainResult<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(config::HEADER_ACCEPT_JSON),
    );

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(config::HTTP_TIMEOUT)
        .build()?)
}
