//! Qualitative strengths, weaknesses and strategy advice.
//!
//! Derived from the same numbers the scenario stage used (including the
//! same rate value), so the narrative never contradicts the projections.

use serde::{Deserialize, Serialize};

use crate::adjust::AdjustmentResult;
use crate::domain::{CharacteristicCategory, Mutability};
use crate::rate::MarketRate;
use crate::scenario::Scenario;
use crate::stats::StatisticsResult;

const COEFFICIENT_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Strength,
    Weakness,
    Strategy,
}

/// One piece of advice for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CharacteristicCategory>,
    pub message: String,
}

pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Derive recommendations from the upstream stage outputs.
    ///
    /// Missing or degenerate inputs shrink the list, down to empty; this
    /// stage never fails the analysis.
    pub fn derive(
        stats: &StatisticsResult,
        adjustment: &AdjustmentResult,
        scenarios: &[Scenario],
        rate: &MarketRate,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for entry in &adjustment.per_category {
            if !entry.coefficient.is_finite() {
                continue;
            }
            let gap_pct = (entry.coefficient - 1.0).abs() * 100.0;

            if entry.coefficient > 1.0 + COEFFICIENT_EPS {
                recommendations.push(Recommendation {
                    kind: RecommendationKind::Strength,
                    category: Some(entry.category),
                    message: format!(
                        "{} '{}' prices about {:.1}% above the typical comparable ('{}')",
                        entry.category, entry.target_value, gap_pct, entry.comparable_value
                    ),
                });
            } else if entry.coefficient < 1.0 - COEFFICIENT_EPS {
                let message = match entry.mutability {
                    Mutability::Variable => format!(
                        "improving {} from '{}' toward the market's '{}' could close a {:.1}% pricing gap",
                        entry.category, entry.target_value, entry.comparable_value, gap_pct
                    ),
                    Mutability::Fixed => format!(
                        "{} '{}' cannot be changed; expect pricing about {:.1}% below comparables with '{}'",
                        entry.category, entry.target_value, gap_pct, entry.comparable_value
                    ),
                };
                recommendations.push(Recommendation {
                    kind: RecommendationKind::Weakness,
                    category: Some(entry.category),
                    message,
                });
            }
        }

        if stats.dispersion() > 0.2 {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Weakness,
                category: None,
                message: format!(
                    "comparable prices are widely dispersed (spread is {:.0}% of the median); the estimate is sensitive to the comparable set",
                    stats.dispersion() * 100.0
                ),
            });
        }
        if stats.low_confidence && stats.sample_size > 0 {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Weakness,
                category: None,
                message: format!(
                    "only {} comparable(s) support the estimate; widen the search before committing to a price",
                    stats.sample_size
                ),
            });
        }

        if let Some(strategy) = strategy_narrative(scenarios, rate) {
            recommendations.push(strategy);
        }

        recommendations
    }
}

fn strategy_narrative(scenarios: &[Scenario], rate: &MarketRate) -> Option<Recommendation> {
    if !rate.annual_rate.is_finite() {
        return None;
    }
    // Earlier canonical order wins ties, keeping the pick stable.
    let best = scenarios
        .iter()
        .max_by(|a, b| a.net_outcome.cmp(&b.net_outcome).then(std::cmp::Ordering::Greater))?;
    let quickest = scenarios
        .iter()
        .min_by_key(|scenario| scenario.expected_days_on_market)?;

    let mut message = format!(
        "at a {:.1}% annual opportunity cost, '{}' nets the most ({} after holding costs over ~{} days)",
        rate.annual_rate * 100.0,
        best.label,
        best.net_outcome,
        best.expected_days_on_market
    );
    if quickest.kind != best.kind {
        let days_saved = best
            .expected_days_on_market
            .saturating_sub(quickest.expected_days_on_market);
        message.push_str(&format!(
            "; '{}' frees capital ~{} days sooner at a {:.1}% discount",
            quickest.label, days_saved, quickest.discount_pct.abs()
        ));
    }

    Some(Recommendation {
        kind: RecommendationKind::Strategy,
        category: None,
        message,
    })
}
