//! Exchange gateway trait
//!
//! The pricing engine and execution coordinator are generic over this seam,
//! so engine logic tests run against an in-memory stub instead of a live
//! exchange. `basket-kalshi` provides the real implementation.

use crate::error::BasketResult;
use crate::market::MarketSnapshot;
use crate::order::{BatchResponse, OrderRequest};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait Exchange: Send + Sync {
    /// Fetch snapshots for the given tickers in one call.
    ///
    /// An empty input must yield an empty map without a network round trip.
    /// Tickers the exchange does not know are absent from the result, not an
    /// error.
    async fn fetch_markets(
        &self,
        tickers: &[String],
    ) -> BasketResult<HashMap<String, MarketSnapshot>>;

    /// Fetch up to `limit` currently-open markets, following pagination.
    async fn fetch_open_markets(&self, limit: usize) -> BasketResult<Vec<MarketSnapshot>>;

    /// Submit a batch of orders atomically. Requires signing credentials.
    async fn submit_batch(&self, orders: &[OrderRequest]) -> BasketResult<BatchResponse>;
}
