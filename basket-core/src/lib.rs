//! Core types for the Basket Terminal
//!
//! This crate defines the shared data structures used across the terminal:
//! basket themes and legs, market snapshots, priced previews, exchange-ready
//! orders, and the exchange gateway trait the engine is generic over.

pub mod basket;
pub mod error;
pub mod exchange;
pub mod market;
pub mod order;
pub mod preview;

pub use basket::{BasketLeg, BasketTheme, Direction, LegOverride};
pub use error::{BasketError, BasketResult};
pub use exchange::Exchange;
pub use market::MarketSnapshot;
pub use order::{
    BatchItem, BatchResponse, BatchResultLeg, ExecuteOutcome, OrderAction, OrderRequest,
    OrderSide, SubmittedOrder, TimeInForce,
};
pub use preview::{BasketPreview, PricedLeg};
