//! Sale-strategy scenarios with time-value-of-money projections.

use serde::{Deserialize, Serialize};

use crate::domain::TargetProperty;
use crate::fairprice::FairPriceResult;
use crate::liquidity::LiquidityProfile;
use crate::rate::MarketRate;
use crate::ValidationError;

/// Canonical sale strategies, always emitted in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    QuickSale,
    Market,
    Patient,
    Premium,
}

impl ScenarioKind {
    pub const ORDER: [Self; 4] = [Self::QuickSale, Self::Market, Self::Patient, Self::Premium];

    pub const fn label(self) -> &'static str {
        match self {
            Self::QuickSale => "quick sale below market",
            Self::Market => "sell at market rate",
            Self::Patient => "patient sale above market",
            Self::Premium => "premium positioning",
        }
    }
}

/// One sale strategy with its financial projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub label: String,
    /// Asking price in currency minor units.
    pub target_price: u64,
    pub expected_days_on_market: u32,
    /// Cost of capital tied up while unsold, in minor units.
    pub opportunity_cost: u64,
    /// Price minus opportunity cost; can go negative for long holds.
    pub net_outcome: i64,
    /// Signed percent relative to the fair price point.
    pub discount_pct: f64,
    /// Net outcome minus the purchase price and the holding cost accrued
    /// since purchase, when the purchase price is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<i64>,
}

/// Scenario stage output; `degenerate` marks the guarded zero/absent
/// fair-price case.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub scenarios: Vec<Scenario>,
    pub degenerate: bool,
}

/// Injected pricing policy for the canonical scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioPolicy {
    pub quick_sale_multiplier: f64,
    pub market_multiplier: f64,
    pub patient_multiplier: f64,
    pub premium_multiplier: f64,
    /// Days a market-priced listing is expected to take at speed 1.0.
    pub base_days_on_market: f64,
    /// Exponent translating pricing aggressiveness into time on market.
    pub aggressiveness_exponent: f64,
}

impl Default for ScenarioPolicy {
    fn default() -> Self {
        Self {
            quick_sale_multiplier: 0.92,
            market_multiplier: 1.0,
            patient_multiplier: 1.05,
            premium_multiplier: 1.12,
            base_days_on_market: 90.0,
            aggressiveness_exponent: 3.0,
        }
    }
}

impl ScenarioPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("quick_sale_multiplier", self.quick_sale_multiplier),
            ("market_multiplier", self.market_multiplier),
            ("patient_multiplier", self.patient_multiplier),
            ("premium_multiplier", self.premium_multiplier),
            ("base_days_on_market", self.base_days_on_market),
            ("aggressiveness_exponent", self.aggressiveness_exponent),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
            if value <= 0.0 {
                return Err(ValidationError::NonPositiveValue { field });
            }
        }
        Ok(())
    }

    const fn multiplier_for(&self, kind: ScenarioKind) -> f64 {
        match kind {
            ScenarioKind::QuickSale => self.quick_sale_multiplier,
            ScenarioKind::Market => self.market_multiplier,
            ScenarioKind::Patient => self.patient_multiplier,
            ScenarioKind::Premium => self.premium_multiplier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    policy: ScenarioPolicy,
}

impl ScenarioGenerator {
    pub fn new(policy: ScenarioPolicy) -> Self {
        Self { policy }
    }

    /// Produce the canonical scenario list.
    ///
    /// An absent or zero fair price short-circuits to an empty list with
    /// the degenerate flag set; the discount computation divides by the
    /// fair-price point and must never see zero.
    pub fn generate(
        &self,
        fair_price: &FairPriceResult,
        liquidity: &LiquidityProfile,
        rate: &MarketRate,
        target: &TargetProperty,
    ) -> ScenarioOutcome {
        let point = match fair_price.point() {
            Some(point) if point > 0 => point as f64,
            _ => {
                return ScenarioOutcome {
                    scenarios: Vec::new(),
                    degenerate: true,
                }
            }
        };

        let daily_rate = rate.annual_rate / 365.0;
        let scenarios = ScenarioKind::ORDER
            .iter()
            .map(|kind| {
                let pricing = self.policy.multiplier_for(*kind);
                let price = point * pricing * liquidity.price_base_multiplier;

                // Pricing above fair slows the sale, below speeds it up.
                let aggressiveness = pricing.powf(self.policy.aggressiveness_exponent);
                let days = (self.policy.base_days_on_market / liquidity.speed_multiplier)
                    * aggressiveness;

                let opportunity_cost = price * daily_rate * days;
                let net_outcome = price - opportunity_cost;
                let discount_pct = (price / point - 1.0) * 100.0;
                let gross_profit = target.purchase_price.map(|purchase| {
                    // Days held are anchored to the rate's as-of date, not
                    // the wall clock.
                    let held_days = target
                        .purchase_date
                        .map_or(0, |date| rate.as_of.days_since(date));
                    let holding_cost = purchase as f64 * daily_rate * held_days as f64;
                    net_outcome.round() as i64 - purchase as i64 - holding_cost.round() as i64
                });

                Scenario {
                    kind: *kind,
                    label: kind.label().to_owned(),
                    target_price: price.round() as u64,
                    expected_days_on_market: days.round() as u32,
                    opportunity_cost: opportunity_cost.round() as u64,
                    net_outcome: net_outcome.round() as i64,
                    discount_pct,
                    gross_profit,
                }
            })
            .collect();

        ScenarioOutcome {
            scenarios,
            degenerate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Characteristics;
    use crate::fairprice::{FairPriceEstimate, InsufficientDataReason};
    use crate::liquidity::LiquiditySegment;
    use crate::rate::{RateProvenance, RateSourceId};
    use crate::UtcDateTime;

    fn priced(point: u64) -> FairPriceResult {
        FairPriceResult::Priced(FairPriceEstimate {
            point,
            interval: None,
            per_area_basis: point as f64 / 60.0,
            multiplier: 1.0,
            low_confidence: false,
        })
    }

    fn liquidity() -> LiquidityProfile {
        LiquidityProfile {
            segment: LiquiditySegment::Comfort,
            speed_multiplier: 1.0,
            price_base_multiplier: 1.0,
        }
    }

    fn rate(annual: f64) -> MarketRate {
        let now = UtcDateTime::parse("2025-06-01T00:00:00Z").expect("valid timestamp");
        MarketRate {
            annual_rate: annual,
            as_of: now,
            source: RateSourceId::Static,
            fetched_at: now,
            provenance: RateProvenance::Fresh,
        }
    }

    fn target() -> TargetProperty {
        TargetProperty::new("target", 60.0, Characteristics::new()).expect("valid target")
    }

    fn generator() -> ScenarioGenerator {
        ScenarioGenerator::new(ScenarioPolicy::default())
    }

    #[test]
    fn emits_four_scenarios_in_canonical_order() {
        let outcome = generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &target());

        assert!(!outcome.degenerate);
        let kinds: Vec<ScenarioKind> = outcome.scenarios.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ScenarioKind::ORDER);
    }

    #[test]
    fn quick_sale_discounts_and_sells_faster() {
        let outcome = generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &target());
        let quick = &outcome.scenarios[0];
        let market = &outcome.scenarios[1];

        assert!(quick.target_price < market.target_price);
        assert!(quick.expected_days_on_market < market.expected_days_on_market);
        assert!((quick.discount_pct - -8.0).abs() < 1e-9);
        assert_eq!(market.discount_pct, 0.0);
    }

    #[test]
    fn opportunity_cost_subtracts_from_net_outcome() {
        let outcome = generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &target());
        let market = &outcome.scenarios[1];

        // 6,000,000 * (0.1/365) * 90 days.
        let expected_cost: f64 = 6_000_000.0 * (0.1 / 365.0) * 90.0;
        assert_eq!(market.opportunity_cost, expected_cost.round() as u64);
        assert_eq!(
            market.net_outcome,
            (6_000_000.0 - expected_cost).round() as i64
        );
    }

    #[test]
    fn absent_fair_price_short_circuits() {
        let absent = FairPriceResult::InsufficientData {
            reason: InsufficientDataReason::NoUsableComparables,
        };

        let outcome = generator().generate(&absent, &liquidity(), &rate(0.1), &target());

        assert!(outcome.scenarios.is_empty());
        assert!(outcome.degenerate);
    }

    #[test]
    fn zero_fair_price_short_circuits() {
        let outcome = generator().generate(&priced(0), &liquidity(), &rate(0.1), &target());

        assert!(outcome.scenarios.is_empty());
        assert!(outcome.degenerate);
    }

    #[test]
    fn liquidity_multipliers_scale_price_and_time() {
        let slow = LiquidityProfile {
            segment: LiquiditySegment::Illiquid,
            speed_multiplier: 0.5,
            price_base_multiplier: 0.95,
        };

        let fast = generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &target());
        let sluggish = generator().generate(&priced(6_000_000), &slow, &rate(0.1), &target());

        assert!(sluggish.scenarios[1].target_price < fast.scenarios[1].target_price);
        assert!(
            sluggish.scenarios[1].expected_days_on_market
                > fast.scenarios[1].expected_days_on_market
        );
    }

    #[test]
    fn purchase_price_yields_gross_profit_net_of_holding_cost() {
        let purchased = target()
            .with_purchase(
                5_000_000,
                UtcDateTime::parse("2024-01-01T00:00:00Z").expect("valid timestamp"),
            )
            .expect("purchase must apply");

        let outcome =
            generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &purchased);
        let market = &outcome.scenarios[1];

        // 517 days held between purchase and the rate's as-of date.
        let holding_cost = (5_000_000.0_f64 * (0.1 / 365.0) * 517.0).round() as i64;
        assert_eq!(
            market.gross_profit,
            Some(market.net_outcome - 5_000_000 - holding_cost)
        );
    }

    #[test]
    fn purchase_without_a_date_accrues_no_holding_cost() {
        let mut purchased = target();
        purchased.purchase_price = Some(5_000_000);

        let outcome =
            generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &purchased);
        let market = &outcome.scenarios[1];

        assert_eq!(market.gross_profit, Some(market.net_outcome - 5_000_000));
    }

    #[test]
    fn repeated_generation_is_bit_identical() {
        let first = generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &target());
        let second = generator().generate(&priced(6_000_000), &liquidity(), &rate(0.1), &target());
        assert_eq!(first, second);
    }
}
