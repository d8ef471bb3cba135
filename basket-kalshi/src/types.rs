//! Kalshi API response types
//!
//! These types mirror the Kalshi API wire format and are converted to
//! basket-core types at the client boundary. Prices arrive as fixed-point
//! dollar strings in the `*_dollars` fields.

use basket_core::{BatchItem, BatchResponse, MarketSnapshot, SubmittedOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response from GET /markets
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsResponse {
    pub markets: Vec<KalshiMarket>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A Kalshi market from the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KalshiMarket {
    /// Market ticker (unique identifier)
    pub ticker: String,

    /// Event ticker this market belongs to
    #[serde(default)]
    pub event_ticker: Option<String>,

    /// Market title
    #[serde(default)]
    pub title: Option<String>,

    /// Short description
    #[serde(default)]
    pub subtitle: Option<String>,

    /// YES/NO outcome subtitles
    #[serde(default)]
    pub yes_sub_title: Option<String>,

    #[serde(default)]
    pub no_sub_title: Option<String>,

    /// Primary resolution rules
    #[serde(default)]
    pub rules_primary: Option<String>,

    /// Market status
    #[serde(default)]
    pub status: Option<String>,

    /// Best bid/ask in dollars (fixed-point strings on the wire)
    #[serde(default)]
    pub yes_bid_dollars: Option<Decimal>,

    #[serde(default)]
    pub yes_ask_dollars: Option<Decimal>,

    #[serde(default)]
    pub no_bid_dollars: Option<Decimal>,

    #[serde(default)]
    pub no_ask_dollars: Option<Decimal>,
}

impl KalshiMarket {
    /// Convert to the core snapshot type
    pub fn to_snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            ticker: self.ticker.clone(),
            event_ticker: self.event_ticker.clone(),
            title: self.title.clone().or_else(|| self.subtitle.clone()),
            yes_subtitle: self.yes_sub_title.clone(),
            no_subtitle: self.no_sub_title.clone(),
            rules: self.rules_primary.clone(),
            status: self.status.clone(),
            yes_bid: self.yes_bid_dollars,
            yes_ask: self.yes_ask_dollars,
            no_bid: self.no_bid_dollars,
            no_ask: self.no_ask_dollars,
        }
    }
}

/// Response from POST /portfolio/orders/batched
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOrdersResponse {
    #[serde(default)]
    pub orders: Vec<BatchOrderItem>,
}

/// One per-order entry of a batch response
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOrderItem {
    #[serde(default)]
    pub order: Option<KalshiOrder>,

    #[serde(default)]
    pub client_order_id: Option<String>,

    /// Either a structured `{message}` object or a bare string
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// An order as echoed back by Kalshi
#[derive(Debug, Clone, Deserialize)]
pub struct KalshiOrder {
    #[serde(default)]
    pub order_id: Option<String>,

    #[serde(default)]
    pub ticker: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub client_order_id: Option<String>,

    #[serde(default)]
    pub fill_count: i64,

    #[serde(default)]
    pub remaining_count: i64,
}

impl BatchOrdersResponse {
    /// Convert to the core batch result, reducing each error value to a
    /// human-readable message here at the boundary.
    pub fn to_batch_response(self) -> BatchResponse {
        let items = self
            .orders
            .into_iter()
            .map(|item| {
                let error = item.error.as_ref().map(error_message);
                let client_order_id = item
                    .client_order_id
                    .clone()
                    .or_else(|| item.order.as_ref().and_then(|o| o.client_order_id.clone()));
                BatchItem {
                    client_order_id,
                    order: item.order.map(|o| SubmittedOrder {
                        order_id: o.order_id,
                        ticker: o.ticker,
                        status: o.status,
                        fill_count: o.fill_count,
                        remaining_count: o.remaining_count,
                    }),
                    error,
                }
            })
            .collect();
        BatchResponse { items }
    }
}

/// Prefer a structured `message` field, fall back to string-casting.
fn error_message(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| value.to_string()),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
