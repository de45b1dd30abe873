//! Fair price point estimate and interval for the target property.

use serde::{Deserialize, Serialize};

use crate::adjust::AdjustmentResult;
use crate::stats::StatisticsResult;

/// Fair price interval in currency minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInterval {
    pub lower: u64,
    pub upper: u64,
}

/// A usable fair price estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairPriceEstimate {
    /// Point estimate in currency minor units.
    pub point: u64,
    /// Interval in currency minor units; absent when the statistics carry
    /// no interval (samples of 0 or 1).
    pub interval: Option<PriceInterval>,
    /// Adjusted price-per-area the point was derived from.
    pub per_area_basis: f64,
    /// The combined adjustment multiplier that was applied.
    pub multiplier: f64,
    pub low_confidence: bool,
}

/// Why no numeric fair price could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientDataReason {
    NoUsableComparables,
    DegenerateStatistics,
}

/// Explicit sum type: a numeric estimate or a declared absence.
///
/// Absence is a first-class value so downstream consumers (notably the
/// scenario generator) must handle it instead of dividing by a sentinel
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FairPriceResult {
    Priced(FairPriceEstimate),
    InsufficientData { reason: InsufficientDataReason },
}

impl FairPriceResult {
    pub fn point(&self) -> Option<u64> {
        match self {
            Self::Priced(estimate) => Some(estimate.point),
            Self::InsufficientData { .. } => None,
        }
    }

    pub const fn is_priced(&self) -> bool {
        matches!(self, Self::Priced(_))
    }
}

pub struct FairPriceCalculator;

impl FairPriceCalculator {
    /// Combine statistics and adjustments into the target's fair price.
    ///
    /// Always returns a result; degenerate statistics produce an explicit
    /// [`FairPriceResult::InsufficientData`], and a thin-but-usable sample
    /// produces a numeric estimate flagged `low_confidence`.
    pub fn calculate(
        stats: &StatisticsResult,
        adjustment: &AdjustmentResult,
        target_area: f64,
    ) -> FairPriceResult {
        if stats.sample_size == 0 {
            return FairPriceResult::InsufficientData {
                reason: InsufficientDataReason::NoUsableComparables,
            };
        }
        if !stats.median.is_finite() || stats.median <= 0.0 {
            return FairPriceResult::InsufficientData {
                reason: InsufficientDataReason::DegenerateStatistics,
            };
        }

        let per_area_basis = stats.median * adjustment.multiplier;
        let point = per_area_basis * target_area;

        let interval = stats.interval.map(|interval| PriceInterval {
            lower: to_minor_units(interval.lower * adjustment.multiplier * target_area),
            upper: to_minor_units(interval.upper * adjustment.multiplier * target_area),
        });

        FairPriceResult::Priced(FairPriceEstimate {
            point: to_minor_units(point),
            interval,
            per_area_basis,
            multiplier: adjustment.multiplier,
            low_confidence: stats.low_confidence,
        })
    }
}

fn to_minor_units(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfidenceLevel;
    use crate::stats::StatisticsEngine;

    fn stats_for(samples: &[f64]) -> StatisticsResult {
        StatisticsEngine::new(ConfidenceLevel::NinetyFive, 5).compute(samples)
    }

    #[test]
    fn point_is_median_times_multiplier_times_area() {
        let stats = stats_for(&[100_000.0, 101_639.34, 98_360.66]);
        let adjustment = AdjustmentResult {
            multiplier: 1.1,
            ..AdjustmentResult::identity()
        };

        let result = FairPriceCalculator::calculate(&stats, &adjustment, 60.0);

        let estimate = match result {
            FairPriceResult::Priced(estimate) => estimate,
            other => panic!("expected a priced result, got {other:?}"),
        };
        assert_eq!(estimate.point, (100_000.0f64 * 1.1 * 60.0).round() as u64);
        assert!(estimate.low_confidence, "3 samples is below the floor");
    }

    #[test]
    fn point_lies_within_scaled_interval() {
        let stats = stats_for(&[95_000.0, 100_000.0, 103_000.0, 99_000.0, 104_000.0]);
        let adjustment = AdjustmentResult {
            multiplier: 0.9,
            ..AdjustmentResult::identity()
        };

        let result = FairPriceCalculator::calculate(&stats, &adjustment, 55.0);

        let estimate = match result {
            FairPriceResult::Priced(estimate) => estimate,
            other => panic!("expected a priced result, got {other:?}"),
        };
        let interval = estimate.interval.expect("interval must exist");
        assert!(interval.lower <= estimate.point);
        assert!(estimate.point <= interval.upper);
    }

    #[test]
    fn zero_samples_produce_explicit_absence() {
        let stats = stats_for(&[]);
        let result =
            FairPriceCalculator::calculate(&stats, &AdjustmentResult::identity(), 60.0);

        assert_eq!(
            result,
            FairPriceResult::InsufficientData {
                reason: InsufficientDataReason::NoUsableComparables
            }
        );
        assert_eq!(result.point(), None);
    }

    #[test]
    fn single_sample_is_priced_without_interval() {
        let stats = stats_for(&[100_000.0]);
        let result =
            FairPriceCalculator::calculate(&stats, &AdjustmentResult::identity(), 42.0);

        let estimate = match result {
            FairPriceResult::Priced(estimate) => estimate,
            other => panic!("expected a priced result, got {other:?}"),
        };
        assert_eq!(estimate.point, 4_200_000);
        assert!(estimate.interval.is_none());
        assert!(estimate.low_confidence);
    }
}
