//! Central tendency, spread and confidence interval over price-per-area.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceLevel;
use crate::outlier::median;

/// Two-sided confidence interval in price-per-area units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Statistical summary of the kept comparable sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub median: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub sample_size: usize,
    /// Undefined for samples of 0 or 1 rather than fabricated.
    pub interval: Option<ConfidenceInterval>,
    pub confidence_level: ConfidenceLevel,
    pub low_confidence: bool,
}

impl StatisticsResult {
    /// Relative spread (sample standard deviation over the median); zero
    /// when the median is degenerate.
    pub fn dispersion(&self) -> f64 {
        if self.median > 0.0 {
            self.std_dev / self.median
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    confidence_level: ConfidenceLevel,
    min_confident_sample: usize,
}

impl StatisticsEngine {
    pub fn new(confidence_level: ConfidenceLevel, min_confident_sample: usize) -> Self {
        Self {
            confidence_level,
            min_confident_sample,
        }
    }

    /// Summarize a price-per-area sample.
    ///
    /// The interval is centered on the median, the same basis the fair-price
    /// point uses, so the point estimate always falls inside its own
    /// interval. Width comes from the Student-t half-width for samples under
    /// 30 and the normal approximation beyond that.
    pub fn compute(&self, samples: &[f64]) -> StatisticsResult {
        let n = samples.len();
        if n == 0 {
            return StatisticsResult {
                median: 0.0,
                mean: 0.0,
                std_dev: 0.0,
                sample_size: 0,
                interval: None,
                confidence_level: self.confidence_level,
                low_confidence: true,
            };
        }

        let center = median(samples);
        let mean = samples.iter().sum::<f64>() / n as f64;

        if n == 1 {
            return StatisticsResult {
                median: center,
                mean,
                std_dev: 0.0,
                sample_size: 1,
                interval: None,
                confidence_level: self.confidence_level,
                low_confidence: true,
            };
        }

        let std_dev = sample_std_dev(samples, mean);
        let half_width = critical_value(self.confidence_level, n) * std_dev / (n as f64).sqrt();

        StatisticsResult {
            median: center,
            mean,
            std_dev,
            sample_size: n,
            interval: Some(ConfidenceInterval {
                lower: center - half_width,
                upper: center + half_width,
            }),
            confidence_level: self.confidence_level,
            low_confidence: n < self.min_confident_sample,
        }
    }
}

/// Bessel-corrected sample standard deviation.
fn sample_std_dev(samples: &[f64], mean: f64) -> f64 {
    let n = samples.len();
    debug_assert!(n >= 2);
    let sum_sq: f64 = samples.iter().map(|value| (value - mean).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Two-sided critical value for the configured level.
///
/// Student-t for samples under 30, normal z beyond.
fn critical_value(level: ConfidenceLevel, sample_size: usize) -> f64 {
    if sample_size >= 30 {
        return match level {
            ConfidenceLevel::Ninety => 1.645,
            ConfidenceLevel::NinetyFive => 1.960,
            ConfidenceLevel::NinetyNine => 2.576,
        };
    }

    let table = match level {
        ConfidenceLevel::Ninety => &T_90,
        ConfidenceLevel::NinetyFive => &T_95,
        ConfidenceLevel::NinetyNine => &T_99,
    };
    table[sample_size - 2]
}

// Two-sided Student-t critical values, df 1..=29.
const T_90: [f64; 29] = [
    6.314, 2.920, 2.353, 2.132, 2.015, 1.943, 1.895, 1.860, 1.833, 1.812, 1.796, 1.782, 1.771,
    1.761, 1.753, 1.746, 1.740, 1.734, 1.729, 1.725, 1.721, 1.717, 1.714, 1.711, 1.708, 1.706,
    1.703, 1.701, 1.699,
];
const T_95: [f64; 29] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045,
];
const T_99: [f64; 29] = [
    63.657, 9.925, 5.841, 4.604, 4.032, 3.707, 3.499, 3.355, 3.250, 3.169, 3.106, 3.055, 3.012,
    2.977, 2.947, 2.921, 2.898, 2.878, 2.861, 2.845, 2.831, 2.819, 2.807, 2.797, 2.787, 2.779,
    2.771, 2.763, 2.756,
];
