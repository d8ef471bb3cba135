//! Batch execution coordinator
//!
//! Re-prices, translates, and submits a basket as one atomic batch, then
//! maps the response back to per-leg outcomes. Transport failures abort the
//! whole run; nothing is retried here because a retry with the same
//! snapshot risks duplicate fills.

use crate::pricing::preview;
use crate::translate::to_order_request;
use basket_core::{
    BasketResult, BasketTheme, BatchResultLeg, Exchange, ExecuteOutcome, LegOverride, OrderRequest,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

/// Kalshi's per-request cap on batched orders
pub const BATCH_ORDER_LIMIT: usize = 20;

/// Execute a basket: always re-prices, never trusts a caller-held preview.
pub async fn execute<E>(
    exchange: &E,
    theme: &BasketTheme,
    total_budget: Decimal,
    overrides: &HashMap<String, LegOverride>,
) -> BasketResult<ExecuteOutcome>
where
    E: Exchange + ?Sized,
{
    let pre = preview(exchange, theme, total_budget, overrides).await?;

    let orders: Vec<OrderRequest> = pre
        .legs
        .iter()
        .filter(|l| l.contracts > 0)
        .filter_map(|l| to_order_request(l, &theme.theme_id))
        .collect();

    if orders.is_empty() {
        return Ok(ExecuteOutcome {
            success: false,
            message: "No orders to place (all legs have 0 contracts or errors).".to_string(),
            legs: Vec::new(),
        });
    }
    if orders.len() > BATCH_ORDER_LIMIT {
        return Ok(ExecuteOutcome {
            success: false,
            message: format!("Too many legs (max {}).", BATCH_ORDER_LIMIT),
            legs: Vec::new(),
        });
    }

    let response = match exchange.submit_batch(&orders).await {
        Ok(r) => r,
        Err(e) => {
            warn!("Batch submission failed: {}", e);
            return Ok(ExecuteOutcome {
                success: false,
                message: e.to_string(),
                legs: Vec::new(),
            });
        }
    };

    let legs: Vec<BatchResultLeg> = response
        .items
        .into_iter()
        .map(|item| {
            // Prefer the ticker echoed on the order; fall back to matching
            // the idempotency key against what we sent.
            let market_ticker = item
                .order
                .as_ref()
                .and_then(|o| o.ticker.clone())
                .or_else(|| {
                    item.client_order_id.as_ref().and_then(|cid| {
                        orders
                            .iter()
                            .find(|o| &o.client_order_id == cid)
                            .map(|o| o.ticker.clone())
                    })
                })
                .unwrap_or_else(|| "?".to_string());

            BatchResultLeg {
                market_ticker,
                client_order_id: item.client_order_id,
                order_id: item.order.as_ref().and_then(|o| o.order_id.clone()),
                status: item.order.as_ref().and_then(|o| o.status.clone()),
                error: item.error,
            }
        })
        .collect();

    let success = legs.iter().all(|l| l.error.is_none());
    let message = if success {
        "Batch submitted."
    } else {
        "Some orders failed; check per-leg results."
    };
    info!(success, legs = legs.len(), "Executed basket '{}'", theme.theme_id);

    Ok(ExecuteOutcome {
        success,
        message: message.to_string(),
        legs,
    })
}
