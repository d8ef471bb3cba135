//! Basket themes, legs, and per-leg overrides

use crate::error::{BasketError, BasketResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which exchange price a leg trades against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    BuyYes,
    BuyNo,
    SellYes,
    SellNo,
}

impl Direction {
    /// True for the YES side of the market (BUY_YES / SELL_YES)
    pub fn is_yes(&self) -> bool {
        matches!(self, Direction::BuyYes | Direction::SellYes)
    }

    /// True for buy actions (BUY_YES / BUY_NO)
    pub fn is_buy(&self) -> bool {
        matches!(self, Direction::BuyYes | Direction::BuyNo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::BuyYes => "BUY_YES",
            Direction::BuyNo => "BUY_NO",
            Direction::SellYes => "SELL_YES",
            Direction::SellNo => "SELL_NO",
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::BuyYes
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY_YES" => Ok(Direction::BuyYes),
            "BUY_NO" => Ok(Direction::BuyNo),
            "SELL_YES" => Ok(Direction::SellYes),
            "SELL_NO" => Ok(Direction::SellNo),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// One market position within a basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketLeg {
    /// Market ticker (unique within a theme)
    pub market_ticker: String,

    /// Event ticker this market belongs to
    pub event_ticker: String,

    /// Human-readable title for display
    pub title: String,

    /// Which price this leg trades against
    #[serde(default)]
    pub direction: Direction,

    /// Relative allocation fraction in [0, 1], renormalized among enabled legs
    pub weight: Decimal,

    /// Disabled legs are skipped by pricing and execution
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A named, reusable basket definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketTheme {
    pub theme_id: String,
    pub name: String,
    pub description: String,
    pub legs: Vec<BasketLeg>,
}

impl BasketTheme {
    /// Check structural invariants: a non-empty id and unique leg tickers.
    ///
    /// Duplicate tickers are rejected here rather than tolerated downstream:
    /// overrides are keyed by ticker, so duplicates would collapse to a single
    /// override while still pricing as separate legs.
    pub fn validate(&self) -> BasketResult<()> {
        if self.theme_id.trim().is_empty() {
            return Err(BasketError::validation("Theme id must not be empty"));
        }
        let mut seen = HashSet::new();
        for leg in &self.legs {
            if !seen.insert(leg.market_ticker.as_str()) {
                return Err(BasketError::validation(format!(
                    "Duplicate market ticker in theme '{}': {}",
                    self.theme_id, leg.market_ticker
                )));
            }
        }
        Ok(())
    }
}

/// Sparse per-leg patch applied at preview/execute time
///
/// Unset fields inherit the leg's original value. Application never mutates
/// the stored theme.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
}
