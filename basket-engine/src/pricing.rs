//! Basket pricing engine
//!
//! Stateless: each preview is a pure function of the theme, overrides,
//! budget, and the snapshots fetched for that run. Per-leg problems degrade
//! that leg to zero contracts with a warning; they never abort the basket.

use basket_core::{
    BasketError, BasketLeg, BasketPreview, BasketResult, BasketTheme, Exchange, LegOverride,
    MarketSnapshot, PricedLeg,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Preview a basket: estimated contracts and cost per enabled leg.
pub async fn preview<E>(
    exchange: &E,
    theme: &BasketTheme,
    total_budget: Decimal,
    overrides: &HashMap<String, LegOverride>,
) -> BasketResult<BasketPreview>
where
    E: Exchange + ?Sized,
{
    if total_budget <= Decimal::ZERO {
        return Err(BasketError::validation("Budget must be positive"));
    }
    theme.validate()?;

    let mut legs = apply_overrides(&theme.legs, overrides);
    if !legs.iter().any(|l| l.enabled) {
        return Ok(BasketPreview {
            total_budget,
            legs: Vec::new(),
            est_total_cost: Decimal::ZERO,
            warnings: vec!["No legs enabled.".to_string()],
        });
    }
    normalize_weights(&mut legs);

    let tickers: Vec<String> = legs
        .iter()
        .filter(|l| l.enabled)
        .map(|l| l.market_ticker.clone())
        .collect();
    let snapshots = exchange.fetch_markets(&tickers).await?;

    let priced: Vec<PricedLeg> = legs
        .iter()
        .filter(|l| l.enabled)
        .map(|leg| price_leg(leg, snapshots.get(&leg.market_ticker), total_budget))
        .collect();

    let est_total_cost = priced
        .iter()
        .map(|l| l.est_cost)
        .sum::<Decimal>()
        .round_dp(4);

    debug!(
        legs = priced.len(),
        %est_total_cost,
        "Priced basket '{}'",
        theme.theme_id
    );

    Ok(BasketPreview {
        total_budget,
        legs: priced,
        est_total_cost,
        warnings: Vec::new(),
    })
}

/// Produce a working leg list with overrides applied; the theme is untouched.
fn apply_overrides(legs: &[BasketLeg], overrides: &HashMap<String, LegOverride>) -> Vec<BasketLeg> {
    legs.iter()
        .map(|leg| {
            let mut leg = leg.clone();
            if let Some(o) = overrides.get(&leg.market_ticker) {
                if let Some(enabled) = o.enabled {
                    leg.enabled = enabled;
                }
                if let Some(direction) = o.direction {
                    leg.direction = direction;
                }
                if let Some(weight) = o.weight {
                    leg.weight = weight.clamp(Decimal::ZERO, Decimal::ONE);
                }
            }
            leg
        })
        .collect()
}

/// Scale enabled weights so they total 1.0.
///
/// A non-positive sum is left untouched: with weights clamped to [0, 1]
/// that only happens when every enabled weight is zero, and each leg then
/// falls into the budget-too-small path on its own.
fn normalize_weights(legs: &mut [BasketLeg]) {
    let total: Decimal = legs.iter().filter(|l| l.enabled).map(|l| l.weight).sum();
    if total <= Decimal::ZERO {
        return;
    }
    for leg in legs.iter_mut().filter(|l| l.enabled) {
        leg.weight /= total;
    }
}

/// Size one leg independently; a shortfall here never borrows from another
/// leg's allocation.
fn price_leg(
    leg: &BasketLeg,
    snapshot: Option<&MarketSnapshot>,
    total_budget: Decimal,
) -> PricedLeg {
    let Some(market) = snapshot else {
        return PricedLeg {
            market_ticker: leg.market_ticker.clone(),
            title: leg.title.clone(),
            direction: leg.direction,
            price: Decimal::ZERO,
            contracts: 0,
            est_cost: Decimal::ZERO,
            warnings: vec!["Market not found.".to_string()],
        };
    };

    let mut warnings = Vec::new();
    if !market.is_tradable() {
        warnings.push(format!(
            "Market not tradable (status={}).",
            market.status.as_deref().unwrap_or("unknown")
        ));
    }

    let price = market
        .price_for(leg.direction)
        .filter(|p| *p > Decimal::ZERO);
    let Some(price) = price else {
        warnings.push("Missing or invalid bid/ask.".to_string());
        return PricedLeg {
            market_ticker: leg.market_ticker.clone(),
            title: leg.title.clone(),
            direction: leg.direction,
            price: Decimal::ZERO,
            contracts: 0,
            est_cost: Decimal::ZERO,
            warnings,
        };
    };

    // Floor, never round up: the leg must not overspend its allocation.
    let leg_budget = total_budget * leg.weight;
    let contracts = (leg_budget / price).floor().to_i64().unwrap_or(0).max(0);

    let est_cost = if contracts < 1 {
        warnings.push("Budget too small for at least 1 contract.".to_string());
        Decimal::ZERO
    } else {
        (Decimal::from(contracts) * price).round_dp(4)
    };

    PricedLeg {
        market_ticker: leg.market_ticker.clone(),
        title: leg.title.clone(),
        direction: leg.direction,
        price,
        contracts,
        est_cost,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{leg, snapshot, theme, StubExchange};
    use basket_core::Direction;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_weights_sums_to_one() {
        let mut legs = vec![
            leg("A", dec!(0.2), true),
            leg("B", dec!(0.3), true),
            leg("C", dec!(0.5), false),
        ];
        normalize_weights(&mut legs);
        let total: Decimal = legs.iter().filter(|l| l.enabled).map(|l| l.weight).sum();
        assert_eq!(total, Decimal::ONE);
        assert_eq!(legs[0].weight, dec!(0.4));
        assert_eq!(legs[1].weight, dec!(0.6));
        // Disabled legs keep their raw weight.
        assert_eq!(legs[2].weight, dec!(0.5));
    }

    #[test]
    fn test_normalize_weights_zero_sum_is_untouched() {
        let mut legs = vec![leg("A", dec!(0), true), leg("B", dec!(0), true)];
        normalize_weights(&mut legs);
        assert_eq!(legs[0].weight, Decimal::ZERO);
        assert_eq!(legs[1].weight, Decimal::ZERO);
    }

    #[test]
    fn test_apply_overrides_clamps_weight_and_keeps_theme() {
        let legs = vec![leg("A", dec!(0.5), true)];
        let mut overrides = HashMap::new();
        overrides.insert(
            "A".to_string(),
            LegOverride {
                enabled: Some(false),
                direction: Some(Direction::SellNo),
                weight: Some(dec!(3.5)),
            },
        );
        let patched = apply_overrides(&legs, &overrides);
        assert!(!patched[0].enabled);
        assert_eq!(patched[0].direction, Direction::SellNo);
        assert_eq!(patched[0].weight, Decimal::ONE);
        // Source list is untouched.
        assert!(legs[0].enabled);
        assert_eq!(legs[0].weight, dec!(0.5));
    }

    #[tokio::test]
    async fn test_preview_two_leg_scenario() {
        let exchange = StubExchange::new()
            .with_market(snapshot("A", "active", Some(dec!(0.50))))
            .with_market(snapshot("B", "active", Some(dec!(0.25))));
        let theme = theme("t1", vec![leg("A", dec!(0.6), true), leg("B", dec!(0.4), true)]);

        let pre = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs.len(), 2);
        assert_eq!(pre.legs[0].contracts, 60);
        assert_eq!(pre.legs[0].est_cost, dec!(30.00));
        assert_eq!(pre.legs[1].contracts, 80);
        assert_eq!(pre.legs[1].est_cost, dec!(20.00));
        assert_eq!(pre.est_total_cost, dec!(50.00));
        assert!(pre.legs.iter().all(|l| l.warnings.is_empty()));
    }

    #[tokio::test]
    async fn test_preview_renormalizes_unnormalized_weights() {
        let exchange = StubExchange::new()
            .with_market(snapshot("A", "open", Some(dec!(0.50))))
            .with_market(snapshot("B", "open", Some(dec!(0.25))));
        // Same ratio as 0.6/0.4, just not summing to 1.
        let theme = theme("t1", vec![leg("A", dec!(0.3), true), leg("B", dec!(0.2), true)]);

        let pre = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs[0].contracts, 60);
        assert_eq!(pre.legs[1].contracts, 80);
    }

    #[tokio::test]
    async fn test_preview_never_overspends_leg_allocation() {
        let exchange = StubExchange::new()
            .with_market(snapshot("A", "active", Some(dec!(0.33))))
            .with_market(snapshot("B", "active", Some(dec!(0.07))));
        let theme = theme("t1", vec![leg("A", dec!(0.5), true), leg("B", dec!(0.5), true)]);
        let budget = dec!(10);

        let pre = preview(&exchange, &theme, budget, &HashMap::new())
            .await
            .unwrap();

        for leg in &pre.legs {
            let allocation = budget * dec!(0.5);
            assert!(Decimal::from(leg.contracts) * leg.price <= allocation);
        }
        assert!(pre.est_total_cost <= budget);
    }

    #[tokio::test]
    async fn test_preview_missing_market_warns_and_keeps_leg() {
        let exchange = StubExchange::new().with_market(snapshot("A", "active", Some(dec!(0.50))));
        let theme = theme("t1", vec![leg("A", dec!(0.5), true), leg("GONE", dec!(0.5), true)]);

        let pre = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs.len(), 2);
        let gone = &pre.legs[1];
        assert_eq!(gone.contracts, 0);
        assert_eq!(gone.est_cost, Decimal::ZERO);
        assert_eq!(gone.warnings, vec!["Market not found.".to_string()]);
    }

    #[tokio::test]
    async fn test_preview_missing_ask_warns_and_zeroes_leg() {
        let exchange = StubExchange::new().with_market(snapshot("A", "active", None));
        let theme = theme("t1", vec![leg("A", dec!(1), true)]);

        let pre = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs[0].contracts, 0);
        assert!(pre.legs[0]
            .warnings
            .contains(&"Missing or invalid bid/ask.".to_string()));
    }

    #[tokio::test]
    async fn test_preview_untradable_market_still_prices() {
        let exchange = StubExchange::new().with_market(snapshot("A", "closed", Some(dec!(0.50))));
        let theme = theme("t1", vec![leg("A", dec!(1), true)]);

        let pre = preview(&exchange, &theme, dec!(10), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs[0].contracts, 20);
        assert_eq!(
            pre.legs[0].warnings,
            vec!["Market not tradable (status=closed).".to_string()]
        );
    }

    #[tokio::test]
    async fn test_preview_budget_too_small_for_one_contract() {
        let exchange = StubExchange::new().with_market(snapshot("A", "active", Some(dec!(0.50))));
        let theme = theme("t1", vec![leg("A", dec!(1), true)]);

        let pre = preview(&exchange, &theme, dec!(0.10), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs[0].contracts, 0);
        assert_eq!(pre.legs[0].est_cost, Decimal::ZERO);
        assert_eq!(
            pre.legs[0].warnings,
            vec!["Budget too small for at least 1 contract.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_preview_no_legs_enabled() {
        let exchange = StubExchange::new();
        let theme = theme("t1", vec![leg("A", dec!(1), false)]);

        let pre = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert!(pre.legs.is_empty());
        assert_eq!(pre.est_total_cost, Decimal::ZERO);
        assert_eq!(pre.warnings, vec!["No legs enabled.".to_string()]);
    }

    #[tokio::test]
    async fn test_preview_direction_override_changes_price_side() {
        let exchange = StubExchange::new().with_market(
            snapshot("A", "active", Some(dec!(0.45))), // yes_ask 0.45, no_ask 0.60
        );
        let theme = theme("t1", vec![leg("A", dec!(1), true)]);
        let mut overrides = HashMap::new();
        overrides.insert(
            "A".to_string(),
            LegOverride {
                direction: Some(Direction::BuyNo),
                ..LegOverride::default()
            },
        );

        let pre = preview(&exchange, &theme, dec!(6), &overrides).await.unwrap();
        assert_eq!(pre.legs[0].price, dec!(0.60));
        assert_eq!(pre.legs[0].contracts, 10);
    }

    #[tokio::test]
    async fn test_preview_rejects_non_positive_budget() {
        let exchange = StubExchange::new();
        let theme = theme("t1", vec![leg("A", dec!(1), true)]);
        let err = preview(&exchange, &theme, Decimal::ZERO, &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BasketError::Validation(_)));
    }

    #[tokio::test]
    async fn test_preview_rejects_duplicate_leg_tickers() {
        let exchange = StubExchange::new();
        let theme = theme("t1", vec![leg("A", dec!(0.5), true), leg("A", dec!(0.5), true)]);
        let err = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BasketError::Validation(_)));
    }

    #[tokio::test]
    async fn test_preview_is_idempotent_for_fixed_snapshots() {
        let exchange = StubExchange::new()
            .with_market(snapshot("A", "active", Some(dec!(0.50))))
            .with_market(snapshot("B", "active", Some(dec!(0.25))));
        let theme = theme("t1", vec![leg("A", dec!(0.6), true), leg("B", dec!(0.4), true)]);

        let first = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();
        let second = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_preview_all_zero_weights_degrade_per_leg() {
        let exchange = StubExchange::new()
            .with_market(snapshot("A", "active", Some(dec!(0.50))))
            .with_market(snapshot("B", "active", Some(dec!(0.25))));
        let theme = theme("t1", vec![leg("A", dec!(0), true), leg("B", dec!(0), true)]);

        let pre = preview(&exchange, &theme, dec!(50), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(pre.legs.len(), 2);
        for leg in &pre.legs {
            assert_eq!(leg.contracts, 0);
            assert!(leg
                .warnings
                .contains(&"Budget too small for at least 1 contract.".to_string()));
        }
        assert_eq!(pre.est_total_cost, Decimal::ZERO);
    }
}
