//! Exchange-ready order payloads and batch submission results

use serde::{Deserialize, Serialize};

/// Side of a binary market an order trades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Yes,
    No,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Yes => "yes",
            OrderSide::No => "no",
        }
    }
}

/// Buy or sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Buy,
    Sell,
}

/// Time-in-force for submitted orders
///
/// Basket execution uses IOC so an unfilled remainder is cancelled rather
/// than resting; the single-order smoke helper uses GTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    ImmediateOrCancel,
    GoodTillCanceled,
}

/// One order in a batched submission, as Kalshi's REST API accepts it
///
/// Exactly one of `yes_price_dollars` / `no_price_dollars` is set, matching
/// the order's side. Prices are fixed-point dollar strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub ticker: String,
    pub side: OrderSide,
    pub action: OrderAction,
    pub count: i64,

    /// Idempotency key, unique per submission attempt
    pub client_order_id: String,

    pub time_in_force: TimeInForce,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_price_dollars: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_price_dollars: Option<String>,
}

/// An order echoed back by the exchange after submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmittedOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub fill_count: i64,

    #[serde(default)]
    pub remaining_count: i64,
}

/// One item of a batch response, error already reduced to a message string
/// at the client boundary
#[derive(Debug, Clone, Default)]
pub struct BatchItem {
    pub client_order_id: Option<String>,
    pub order: Option<SubmittedOrder>,
    pub error: Option<String>,
}

/// Typed result of `POST /portfolio/orders/batched`
#[derive(Debug, Clone, Default)]
pub struct BatchResponse {
    pub items: Vec<BatchItem>,
}

/// Per-leg outcome of a basket execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResultLeg {
    pub market_ticker: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Overall result of a basket execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteOutcome {
    /// True iff no per-leg result carries an error
    pub success: bool,
    pub message: String,

    #[serde(default)]
    pub legs: Vec<BatchResultLeg>,
}
