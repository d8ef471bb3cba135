//! Priced basket preview types (engine output, never stored)

use crate::basket::Direction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One leg after pricing: the contract count and cost the budget buys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLeg {
    pub market_ticker: String,
    pub title: String,
    pub direction: Direction,

    /// Unit price in dollars that was used for sizing (zero when unpriceable)
    pub price: Decimal,

    /// Whole contracts the leg's budget share buys, floored, never negative
    pub contracts: i64,

    /// contracts * price, rounded to 4 decimal places; zero below 1 contract
    pub est_cost: Decimal,

    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A full basket preview for a given budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketPreview {
    pub total_budget: Decimal,

    /// One entry per enabled leg, in theme order
    pub legs: Vec<PricedLeg>,

    /// Sum of per-leg costs, rounded to 4 decimal places
    pub est_total_cost: Decimal,

    /// Basket-level warnings; per-leg problems stay on their leg
    #[serde(default)]
    pub warnings: Vec<String>,
}
