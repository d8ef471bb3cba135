//! Kalshi API client
//!
//! Provides the market-data and order-submission calls the basket engine
//! needs. Public market reads are unauthenticated; batch submission signs
//! every request via [`RequestSigner`].

use crate::signer::RequestSigner;
use crate::types::{BatchOrdersResponse, MarketsResponse};
use async_trait::async_trait;
use basket_core::{BasketError, BasketResult, BatchResponse, Exchange, MarketSnapshot, OrderRequest};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// REST path prefix shared by every Kalshi endpoint
const API_PATH: &str = "/trade-api/v2";

/// Demo environment; override with `KALSHI_BASE_URL` for production
const DEFAULT_BASE_URL: &str = "https://demo-api.kalshi.co";

/// Kalshi caps page size at 1000
const MAX_PAGE_LIMIT: usize = 1000;

/// Configuration for [`KalshiClient`], typically read from the environment
#[derive(Debug, Clone, Default)]
pub struct KalshiConfig {
    pub base_url: Option<String>,
    pub api_key_id: Option<String>,
    pub private_key_path: Option<String>,
    /// Inline PEM, with literal `\n` escapes tolerated
    pub private_key_pem: Option<String>,
}

impl KalshiConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("KALSHI_BASE_URL").ok(),
            api_key_id: std::env::var("KALSHI_API_KEY_ID").ok(),
            private_key_path: std::env::var("KALSHI_PRIVATE_KEY_PATH").ok(),
            private_key_pem: std::env::var("KALSHI_PRIVATE_KEY_PEM").ok(),
        }
    }
}

/// Kalshi API client
#[derive(Clone)]
pub struct KalshiClient {
    client: Client,
    base_url: String,
    signer: Option<RequestSigner>,
}

impl KalshiClient {
    /// Create an unauthenticated client (public endpoints only)
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signer: None,
        }
    }

    /// Build a client from configuration, loading signing material eagerly.
    ///
    /// Key material that is present but unusable is a fatal configuration
    /// error; a client with no key material at all is still valid for
    /// public endpoints.
    pub fn from_config(config: &KalshiConfig) -> BasketResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut client = Self::new(base_url);

        if let Some(api_key_id) = config.api_key_id.clone().filter(|k| !k.is_empty()) {
            if let Some(pem) = config.private_key_pem.as_deref().filter(|p| !p.is_empty()) {
                client.signer = Some(RequestSigner::from_pem(api_key_id, pem)?);
            } else if let Some(path) = config.private_key_path.as_deref().filter(|p| !p.is_empty())
            {
                client.signer = Some(RequestSigner::from_pem_file(api_key_id, path)?);
            }
        }

        Ok(client)
    }

    /// Check whether batch submission is possible
    pub fn is_authenticated(&self) -> bool {
        self.signer.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn require_signer(&self) -> BasketResult<&RequestSigner> {
        self.signer
            .as_ref()
            .ok_or_else(|| BasketError::config("Kalshi API key not configured"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Exchange for KalshiClient {
    /// Fetch snapshots for the given tickers in one batched call
    #[instrument(skip(self))]
    async fn fetch_markets(
        &self,
        tickers: &[String],
    ) -> BasketResult<HashMap<String, MarketSnapshot>> {
        if tickers.is_empty() {
            return Ok(HashMap::new());
        }

        let path = format!("{}/markets", API_PATH);
        debug!("Fetching {} Kalshi market snapshots", tickers.len());

        let response = self
            .client
            .get(self.url(&path))
            .query(&[("tickers", tickers.join(","))])
            .send()
            .await
            .map_err(|e| BasketError::network(format!("Failed to fetch markets: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BasketError::api(format!(
                "Kalshi API error ({}): {}",
                status, body
            )));
        }

        let markets_response: MarketsResponse = response
            .json()
            .await
            .map_err(|e| BasketError::parse(format!("Failed to parse markets response: {}", e)))?;

        Ok(markets_response
            .markets
            .into_iter()
            .map(|m| (m.ticker.clone(), m.to_snapshot()))
            .collect())
    }

    /// Fetch up to `limit` open markets, following the pagination cursor
    #[instrument(skip(self))]
    async fn fetch_open_markets(&self, limit: usize) -> BasketResult<Vec<MarketSnapshot>> {
        let path = format!("{}/markets", API_PATH);
        let page_limit = limit.min(MAX_PAGE_LIMIT);
        let mut all_markets: Vec<MarketSnapshot> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![
                ("status".to_string(), "open".to_string()),
                ("limit".to_string(), page_limit.to_string()),
            ];
            if let Some(ref c) = cursor {
                params.push(("cursor".to_string(), c.clone()));
            }

            debug!("Fetching Kalshi open markets page, cursor: {:?}", cursor);

            let response = self
                .client
                .get(self.url(&path))
                .query(&params)
                .timeout(Duration::from_secs(30))
                .send()
                .await
                .map_err(|e| BasketError::network(format!("Failed to fetch markets: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(BasketError::api(format!(
                    "Kalshi API error ({}): {}",
                    status, body
                )));
            }

            let markets_response: MarketsResponse = response
                .json()
                .await
                .map_err(|e| BasketError::parse(format!("Failed to parse markets: {}", e)))?;

            let page_count = markets_response.markets.len();
            all_markets.extend(markets_response.markets.into_iter().map(|m| m.to_snapshot()));

            if page_count == 0 || all_markets.len() >= limit {
                break;
            }
            match markets_response.cursor {
                Some(c) if !c.is_empty() => cursor = Some(c),
                _ => break,
            }
        }

        all_markets.truncate(limit);
        debug!("Fetched {} open Kalshi markets", all_markets.len());
        Ok(all_markets)
    }

    /// Submit a batch of orders atomically
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    async fn submit_batch(&self, orders: &[OrderRequest]) -> BasketResult<BatchResponse> {
        let signer = self.require_signer()?;
        let path = format!("{}/portfolio/orders/batched", API_PATH);
        let (timestamp, signature) = signer.sign("POST", &path);

        debug!("Submitting batch of {} orders", orders.len());

        let response = self
            .client
            .post(self.url(&path))
            .header("KALSHI-ACCESS-KEY", signer.api_key_id())
            .header("KALSHI-ACCESS-TIMESTAMP", timestamp)
            .header("KALSHI-ACCESS-SIGNATURE", signature)
            .json(&serde_json::json!({ "orders": orders }))
            .send()
            .await
            .map_err(|e| BasketError::network(format!("Failed to submit batch: {}", e)))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(BasketError::api(extract_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let batch_response: BatchOrdersResponse = response
            .json()
            .await
            .map_err(|e| BasketError::parse(format!("Failed to parse batch response: {}", e)))?;

        Ok(batch_response.to_batch_response())
    }
}

impl std::fmt::Debug for KalshiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.signer.is_some())
            .finish()
    }
}

/// Pull the most human-readable message out of an error body.
///
/// Preference order: structured `error.message`, top-level `message`, the
/// raw body, the bare status code.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    format!("HTTP {}", status)
}
