//! Market segment classification for expected sale speed and price base.

use serde::{Deserialize, Serialize};

use crate::stats::StatisticsResult;
use crate::ValidationError;

/// Liquidity segment of the local market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquiditySegment {
    /// Entry-tier stock that turns over quickly.
    Mass,
    Comfort,
    Premium,
    /// Thin or noisy market regardless of tier.
    Illiquid,
}

/// Classification output: segment plus its two multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityProfile {
    pub segment: LiquiditySegment,
    /// Divides the base days-on-market; above 1.0 sells faster.
    pub speed_multiplier: f64,
    /// Scales scenario prices; below 1.0 prices the segment down.
    pub price_base_multiplier: f64,
}

/// Per-segment multiplier pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub speed_multiplier: f64,
    pub price_base_multiplier: f64,
}

/// Injected classification policy: price-tier breakpoints, market-velocity
/// thresholds and the per-segment multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityPolicy {
    /// Total price (minor units) at which Mass turns into Comfort.
    pub comfort_threshold: u64,
    /// Total price (minor units) at which Comfort turns into Premium.
    pub premium_threshold: u64,
    /// Area above which the property shifts one tier toward Premium.
    pub large_area_sqm: f64,
    /// Relative dispersion above which the market reads as noisy.
    pub high_dispersion: f64,
    /// Kept-sample size below which the market reads as thin.
    pub thin_sample: usize,
    pub mass: SegmentProfile,
    pub comfort: SegmentProfile,
    pub premium: SegmentProfile,
    pub illiquid: SegmentProfile,
}

impl Default for LiquidityPolicy {
    fn default() -> Self {
        Self {
            comfort_threshold: 8_000_000,
            premium_threshold: 20_000_000,
            large_area_sqm: 120.0,
            high_dispersion: 0.25,
            thin_sample: 3,
            mass: SegmentProfile {
                speed_multiplier: 1.3,
                price_base_multiplier: 1.0,
            },
            comfort: SegmentProfile {
                speed_multiplier: 1.0,
                price_base_multiplier: 1.0,
            },
            premium: SegmentProfile {
                speed_multiplier: 0.7,
                price_base_multiplier: 1.03,
            },
            illiquid: SegmentProfile {
                speed_multiplier: 0.5,
                price_base_multiplier: 0.95,
            },
        }
    }
}

impl LiquidityPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.premium_threshold < self.comfort_threshold {
            return Err(ValidationError::InvalidBound {
                lower: self.comfort_threshold as f64,
                upper: self.premium_threshold as f64,
            });
        }
        for (field, profile) in [
            ("mass", self.mass),
            ("comfort", self.comfort),
            ("premium", self.premium),
            ("illiquid", self.illiquid),
        ] {
            if !profile.speed_multiplier.is_finite() || profile.speed_multiplier <= 0.0 {
                return Err(ValidationError::NonPositiveValue { field });
            }
            if !profile.price_base_multiplier.is_finite() || profile.price_base_multiplier <= 0.0 {
                return Err(ValidationError::NonPositiveValue { field });
            }
        }
        Ok(())
    }

    const fn profile_for(&self, segment: LiquiditySegment) -> SegmentProfile {
        match segment {
            LiquiditySegment::Mass => self.mass,
            LiquiditySegment::Comfort => self.comfort,
            LiquiditySegment::Premium => self.premium,
            LiquiditySegment::Illiquid => self.illiquid,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiquidityProfiler {
    policy: LiquidityPolicy,
}

impl LiquidityProfiler {
    pub fn new(policy: LiquidityPolicy) -> Self {
        Self { policy }
    }

    /// Pure classification from price tier, area and market velocity
    /// signals (sample density, price dispersion).
    pub fn classify(
        &self,
        fair_price_point: u64,
        total_area: f64,
        market_stats: &StatisticsResult,
    ) -> LiquidityProfile {
        let mut segment = if fair_price_point >= self.policy.premium_threshold {
            LiquiditySegment::Premium
        } else if fair_price_point >= self.policy.comfort_threshold {
            LiquiditySegment::Comfort
        } else {
            LiquiditySegment::Mass
        };

        if total_area > self.policy.large_area_sqm {
            segment = match segment {
                LiquiditySegment::Mass => LiquiditySegment::Comfort,
                LiquiditySegment::Comfort => LiquiditySegment::Premium,
                other => other,
            };
        }

        // A noisy or thin comparable market dominates the tier signal.
        if market_stats.dispersion() > self.policy.high_dispersion
            || market_stats.sample_size < self.policy.thin_sample
        {
            segment = LiquiditySegment::Illiquid;
        }

        let profile = self.policy.profile_for(segment);
        LiquidityProfile {
            segment,
            speed_multiplier: profile.speed_multiplier,
            price_base_multiplier: profile.price_base_multiplier,
        }
    }
}
