//! Single-order smoke helper
//!
//! Places one buy at the current ask to verify signing and connectivity
//! without pricing a whole basket. Rests good-till-canceled, unlike basket
//! execution which is immediate-or-cancel.

use crate::translate::order_suffix;
use basket_core::{
    BasketResult, Exchange, OrderAction, OrderRequest, OrderSide, TimeInForce,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Typed outcome of a single test order
#[derive(Debug, Clone, Serialize)]
pub struct SingleOrderOutcome {
    pub success: bool,
    pub ticker: String,
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub fill_count: i64,
    pub remaining_count: i64,
    pub error: Option<String>,
}

impl SingleOrderOutcome {
    fn failed(ticker: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            ticker: ticker.to_string(),
            order_id: None,
            status: None,
            fill_count: 0,
            remaining_count: 0,
            error: Some(error.into()),
        }
    }
}

/// Buy `count` contracts of one market at the ask.
///
/// Data problems (unknown market, submission rejection) are reported in the
/// outcome rather than as errors; only transport and configuration failures
/// propagate as `Err`.
pub async fn place_order<E>(
    exchange: &E,
    ticker: &str,
    side: OrderSide,
    count: i64,
) -> BasketResult<SingleOrderOutcome>
where
    E: Exchange + ?Sized,
{
    let snapshots = exchange.fetch_markets(&[ticker.to_string()]).await?;
    let Some(market) = snapshots.get(ticker) else {
        return Ok(SingleOrderOutcome::failed(ticker, "Market not found"));
    };

    let ask = match side {
        OrderSide::Yes => market.yes_ask,
        OrderSide::No => market.no_ask,
    };
    // An unusable ask falls back to mid; the limit price is clamped to the
    // exchange's valid [0.01, 0.99] band either way.
    let mut price = ask.unwrap_or(Decimal::ZERO);
    if price <= Decimal::ZERO || price >= Decimal::ONE {
        price = Decimal::new(50, 2);
    }
    let price = price.clamp(Decimal::new(1, 2), Decimal::new(99, 2));
    let price_str = format!("{:.4}", price);

    let (yes_price_dollars, no_price_dollars) = match side {
        OrderSide::Yes => (Some(price_str), None),
        OrderSide::No => (None, Some(price_str)),
    };
    let order = OrderRequest {
        ticker: ticker.to_string(),
        side,
        action: OrderAction::Buy,
        count,
        client_order_id: format!("test:{}", order_suffix()),
        time_in_force: TimeInForce::GoodTillCanceled,
        yes_price_dollars,
        no_price_dollars,
    };

    debug!("Placing single {} order on {} at {}", side.as_str(), ticker, price);

    let response = match exchange.submit_batch(std::slice::from_ref(&order)).await {
        Ok(r) => r,
        Err(e) => return Ok(SingleOrderOutcome::failed(ticker, e.to_string())),
    };

    let Some(item) = response.items.into_iter().next() else {
        return Ok(SingleOrderOutcome::failed(ticker, "Empty batch response"));
    };
    if let Some(error) = item.error {
        return Ok(SingleOrderOutcome::failed(ticker, error));
    }

    let echoed = item.order.unwrap_or_default();
    Ok(SingleOrderOutcome {
        success: true,
        ticker: ticker.to_string(),
        order_id: echoed.order_id,
        status: echoed.status,
        fill_count: echoed.fill_count,
        remaining_count: echoed.remaining_count,
        error: None,
    })
}
