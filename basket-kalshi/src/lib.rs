//! Kalshi integration for the Basket Terminal
//!
//! This crate provides a REST client for the Kalshi exchange: market
//! snapshot fetch, paginated open-market listing, and batched order
//! submission with RSA-PSS request signing.

pub mod client;
pub mod signer;
pub mod types;

pub use client::{KalshiClient, KalshiConfig};
pub use signer::RequestSigner;
