//! In-memory Exchange stub shared by the engine tests

use async_trait::async_trait;
use basket_core::{
    BasketError, BasketLeg, BasketResult, BasketTheme, BatchItem, BatchResponse, Direction,
    Exchange, MarketSnapshot, OrderRequest,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Mutex;

/// Exchange stub backed by fixed snapshots and a scripted batch response
#[derive(Default)]
pub struct StubExchange {
    markets: HashMap<String, MarketSnapshot>,
    batch_items: Vec<BatchItem>,
    batch_error: Option<String>,
    /// Reject every submitted order by echoing only its client_order_id,
    /// the shape Kalshi uses when an order never reaches the book
    reject_all_with: Option<String>,
    /// Every batch handed to `submit_batch`, for assertions
    pub submitted: Mutex<Vec<Vec<OrderRequest>>>,
}

impl StubExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_market(mut self, snapshot: MarketSnapshot) -> Self {
        self.markets.insert(snapshot.ticker.clone(), snapshot);
        self
    }

    pub fn with_batch_items(mut self, items: Vec<BatchItem>) -> Self {
        self.batch_items = items;
        self
    }

    pub fn with_batch_error(mut self, message: &str) -> Self {
        self.batch_error = Some(message.to_string());
        self
    }

    pub fn rejecting_all_with(mut self, message: &str) -> Self {
        self.reject_all_with = Some(message.to_string());
        self
    }

    pub fn submissions(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl Exchange for StubExchange {
    async fn fetch_markets(
        &self,
        tickers: &[String],
    ) -> BasketResult<HashMap<String, MarketSnapshot>> {
        Ok(tickers
            .iter()
            .filter_map(|t| self.markets.get(t).map(|m| (t.clone(), m.clone())))
            .collect())
    }

    async fn fetch_open_markets(&self, limit: usize) -> BasketResult<Vec<MarketSnapshot>> {
        let mut markets: Vec<MarketSnapshot> = self.markets.values().cloned().collect();
        markets.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        markets.truncate(limit);
        Ok(markets)
    }

    async fn submit_batch(&self, orders: &[OrderRequest]) -> BasketResult<BatchResponse> {
        self.submitted.lock().unwrap().push(orders.to_vec());
        if let Some(message) = &self.batch_error {
            return Err(BasketError::api(message.clone()));
        }
        if let Some(message) = &self.reject_all_with {
            return Ok(BatchResponse {
                items: orders
                    .iter()
                    .map(|o| BatchItem {
                        client_order_id: Some(o.client_order_id.clone()),
                        order: None,
                        error: Some(message.clone()),
                    })
                    .collect(),
            });
        }
        Ok(BatchResponse {
            items: self.batch_items.clone(),
        })
    }
}

/// Snapshot with a consistent book around the given YES ask
/// (yes_bid 5c below, NO side mirrored).
pub fn snapshot(ticker: &str, status: &str, yes_ask: Option<Decimal>) -> MarketSnapshot {
    MarketSnapshot {
        ticker: ticker.to_string(),
        event_ticker: Some(format!("{}-EVENT", ticker)),
        title: Some(format!("{} title", ticker)),
        yes_subtitle: None,
        no_subtitle: None,
        rules: None,
        status: Some(status.to_string()),
        yes_bid: yes_ask.map(|p| p - dec!(0.05)),
        yes_ask,
        no_bid: yes_ask.map(|p| Decimal::ONE - p),
        no_ask: yes_ask.map(|p| Decimal::ONE - p + dec!(0.05)),
    }
}

pub fn leg(ticker: &str, weight: Decimal, enabled: bool) -> BasketLeg {
    BasketLeg {
        market_ticker: ticker.to_string(),
        event_ticker: format!("{}-EVENT", ticker),
        title: format!("{} title", ticker),
        direction: Direction::BuyYes,
        weight,
        enabled,
    }
}

pub fn theme(theme_id: &str, legs: Vec<BasketLeg>) -> BasketTheme {
    BasketTheme {
        theme_id: theme_id.to_string(),
        name: format!("{} name", theme_id),
        description: String::new(),
        legs,
    }
}
