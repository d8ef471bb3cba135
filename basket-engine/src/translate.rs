//! Priced leg to exchange order translation

use basket_core::{OrderAction, OrderRequest, OrderSide, PricedLeg, TimeInForce};
use rust_decimal::Decimal;

/// Translate one priced leg into a batch order.
///
/// Legs without contracts have nothing to submit and return `None`. The
/// client order id is unique per submission attempt, so a retried execute
/// never collides with an earlier one.
pub fn to_order_request(leg: &PricedLeg, basket_id: &str) -> Option<OrderRequest> {
    if leg.contracts <= 0 {
        return None;
    }

    let side = if leg.direction.is_yes() {
        OrderSide::Yes
    } else {
        OrderSide::No
    };
    let action = if leg.direction.is_buy() {
        OrderAction::Buy
    } else {
        OrderAction::Sell
    };

    let price = format_price_dollars(leg.price);
    let (yes_price_dollars, no_price_dollars) = match side {
        OrderSide::Yes => (Some(price), None),
        OrderSide::No => (None, Some(price)),
    };

    Some(OrderRequest {
        ticker: leg.market_ticker.clone(),
        side,
        action,
        count: leg.contracts,
        client_order_id: format!("{}:{}:{}", basket_id, leg.market_ticker, order_suffix()),
        time_in_force: TimeInForce::ImmediateOrCancel,
        yes_price_dollars,
        no_price_dollars,
    })
}

/// Format a dollar price with up to 4 fractional digits, trimming trailing
/// zeros but always keeping a fractional part: `0.4500` -> `"0.45"`,
/// `0.5000` -> `"0.5"`, `1.0000` -> `"1.0"`.
pub fn format_price_dollars(price: Decimal) -> String {
    let fixed = format!("{:.4}", price);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        format!("{}.0", trimmed)
    }
}

/// 8-hex-char suffix distinguishing submission attempts
pub(crate) fn order_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
