//! Robust outlier rejection over comparable price-per-area.
//!
//! Uses the median absolute deviation (MAD) so a single wild listing cannot
//! drag the exclusion threshold with it. When MAD collapses to zero (all
//! prices identical) the filter falls back to a fixed percentage band around
//! the median instead of dividing by zero.

use serde::{Deserialize, Serialize};

use crate::config::OutlierConfig;
use crate::domain::ComparableProperty;

/// Why a comparable was left out of the statistics sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The user toggled the record off; kept visible for reporting.
    UserExcluded,
    /// The record failed the input contract (absent price/area).
    InvalidRecord { detail: String },
    /// Robust z-score above the (possibly relaxed) threshold.
    RobustZScore { score: f64, threshold: f64 },
    /// Deviation outside the identical-price band (zero-MAD fallback).
    BandDeviation { deviation_pct: f64, band_pct: f64 },
}

/// Diagnostic record for one excluded comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRecord {
    pub id: String,
    pub reason: ExclusionReason,
}

/// Result of one filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub kept: Vec<ComparableProperty>,
    pub excluded: Vec<ExclusionRecord>,
    /// How many times the threshold had to be relaxed to respect the floor.
    pub relaxed_rounds: u32,
}

impl FilterOutcome {
    /// Count of exclusions caused by contract violations.
    pub fn invalid_count(&self) -> usize {
        self.excluded
            .iter()
            .filter(|record| matches!(record.reason, ExclusionReason::InvalidRecord { .. }))
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct OutlierFilter {
    config: OutlierConfig,
}

impl OutlierFilter {
    pub fn new(config: OutlierConfig) -> Self {
        Self { config }
    }

    /// Partition comparables into a kept sample and tagged exclusions.
    ///
    /// Statistical exclusion never reduces the kept count below the
    /// configured floor unless the usable input was already smaller.
    pub fn filter(&self, comparables: &[ComparableProperty]) -> FilterOutcome {
        let mut excluded = Vec::new();
        let mut candidates: Vec<(&ComparableProperty, f64)> = Vec::new();

        for comparable in comparables {
            if !comparable.included {
                excluded.push(ExclusionRecord {
                    id: comparable.id.clone(),
                    reason: ExclusionReason::UserExcluded,
                });
                continue;
            }
            if let Some(violation) = comparable.contract_violation() {
                excluded.push(ExclusionRecord {
                    id: comparable.id.clone(),
                    reason: ExclusionReason::InvalidRecord {
                        detail: violation.to_string(),
                    },
                });
                continue;
            }
            let per_area = comparable
                .price_per_area()
                .expect("contract holds, price_per_area must derive");
            candidates.push((comparable, per_area));
        }

        // Too few usable records for any statistical exclusion.
        if candidates.len() <= self.config.min_kept {
            return FilterOutcome {
                kept: candidates.into_iter().map(|(c, _)| c.clone()).collect(),
                excluded,
                relaxed_rounds: 0,
            };
        }

        let values: Vec<f64> = candidates.iter().map(|(_, v)| *v).collect();
        let center = median(&values);
        let mad = median_absolute_deviation(&values, center);

        if mad <= f64::EPSILON * center.max(1.0) {
            return self.filter_by_band(candidates, excluded, center);
        }

        self.filter_by_robust_z(candidates, excluded, center, mad)
    }

    fn filter_by_robust_z(
        &self,
        candidates: Vec<(&ComparableProperty, f64)>,
        mut excluded: Vec<ExclusionRecord>,
        center: f64,
        mad: f64,
    ) -> FilterOutcome {
        let mut threshold = self.config.threshold;
        let mut rounds = 0u32;

        loop {
            let kept_count = candidates
                .iter()
                .filter(|(_, value)| (value - center).abs() / mad <= threshold)
                .count();

            if kept_count >= self.config.min_kept {
                let mut kept = Vec::with_capacity(kept_count);
                for (comparable, value) in candidates {
                    let score = (value - center).abs() / mad;
                    if score <= threshold {
                        kept.push(comparable.clone());
                    } else {
                        excluded.push(ExclusionRecord {
                            id: comparable.id.clone(),
                            reason: ExclusionReason::RobustZScore { score, threshold },
                        });
                    }
                }
                return FilterOutcome {
                    kept,
                    excluded,
                    relaxed_rounds: rounds,
                };
            }

            if rounds >= self.config.max_relaxation_rounds {
                // Exclusion would starve the sample even after relaxation.
                return FilterOutcome {
                    kept: candidates.into_iter().map(|(c, _)| c.clone()).collect(),
                    excluded,
                    relaxed_rounds: rounds,
                };
            }

            threshold *= 1.5;
            rounds += 1;
        }
    }

    fn filter_by_band(
        &self,
        candidates: Vec<(&ComparableProperty, f64)>,
        mut excluded: Vec<ExclusionRecord>,
        center: f64,
    ) -> FilterOutcome {
        let band_pct = self.config.identical_band_pct;
        let kept_count = candidates
            .iter()
            .filter(|(_, value)| deviation_pct(*value, center) <= band_pct)
            .count();

        // The band is a degenerate-spread fallback; if it would starve the
        // sample, exclusion is skipped rather than relaxed.
        if kept_count < self.config.min_kept {
            return FilterOutcome {
                kept: candidates.into_iter().map(|(c, _)| c.clone()).collect(),
                excluded,
                relaxed_rounds: 0,
            };
        }

        let mut kept = Vec::with_capacity(kept_count);
        for (comparable, value) in candidates {
            let deviation = deviation_pct(value, center);
            if deviation <= band_pct {
                kept.push(comparable.clone());
            } else {
                excluded.push(ExclusionRecord {
                    id: comparable.id.clone(),
                    reason: ExclusionReason::BandDeviation {
                        deviation_pct: deviation,
                        band_pct,
                    },
                });
            }
        }

        FilterOutcome {
            kept,
            excluded,
            relaxed_rounds: 0,
        }
    }
}

fn deviation_pct(value: f64, center: f64) -> f64 {
    ((value - center).abs() / center) * 100.0
}

/// Median of an unsorted slice; 0.0 for an empty slice.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("samples must be finite"));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn median_absolute_deviation(values: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = values.iter().map(|value| (value - center).abs()).collect();
    median(&deviations)
}
