//! Market snapshot: a point-in-time read of one market's tradable state

use crate::basket::Direction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statuses under which Kalshi accepts orders
const TRADABLE_STATUSES: [&str; 2] = ["active", "open"];

/// Live state for one market, fetched fresh per pricing run
///
/// Prices are dollars per contract. Absent fields mean the exchange did not
/// report them; a missing price is handled per leg, never as a batch failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Market ticker (unique identifier)
    pub ticker: String,

    /// Event ticker this market belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,

    /// Market title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// YES/NO outcome subtitles, used when describing candidates to the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_subtitle: Option<String>,

    /// Primary resolution rules, truncated upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,

    /// Market status as reported by the exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Best bid/ask in dollars for each outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_bid: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes_ask: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_bid: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_ask: Option<Decimal>,
}

impl MarketSnapshot {
    /// Check whether orders would currently be accepted
    pub fn is_tradable(&self) -> bool {
        match &self.status {
            Some(s) => TRADABLE_STATUSES.contains(&s.to_lowercase().as_str()),
            None => false,
        }
    }

    /// Price in dollars for the given direction: ask for buys, bid for sells
    pub fn price_for(&self, direction: Direction) -> Option<Decimal> {
        match direction {
            Direction::BuyYes => self.yes_ask,
            Direction::SellYes => self.yes_bid,
            Direction::BuyNo => self.no_ask,
            Direction::SellNo => self.no_bid,
        }
    }
}
