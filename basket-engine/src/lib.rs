//! Basket engine for the Basket Terminal
//!
//! Takes a theme (weighted market legs), per-leg overrides, a dollar budget,
//! and live snapshots, and derives contract counts, per-leg costs, warnings,
//! and exchange-ready batch orders. Pure logic over the [`Exchange`] seam;
//! the signed client lives in `basket-kalshi`.
//!
//! [`Exchange`]: basket_core::Exchange

pub mod execute;
pub mod order;
pub mod pricing;
pub mod translate;

pub use execute::{execute, BATCH_ORDER_LIMIT};
pub use order::{place_order, SingleOrderOutcome};
pub use pricing::preview;
pub use translate::{format_price_dollars, to_order_request};

#[cfg(test)]
pub(crate) mod testutil;
