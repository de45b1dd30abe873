//! Analysis configuration.
//!
//! Everything tunable about a single analysis lives here; policy tables for
//! adjustments, liquidity and scenarios are injected separately so tests can
//! substitute fixtures.

use serde::{Deserialize, Serialize};

use crate::domain::validate_currency_code;
use crate::ValidationError;

/// Supported two-sided confidence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Ninety,
    #[default]
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    pub const fn value(self) -> f64 {
        match self {
            Self::Ninety => 0.90,
            Self::NinetyFive => 0.95,
            Self::NinetyNine => 0.99,
        }
    }

    pub fn from_value(value: f64) -> Result<Self, ValidationError> {
        if (value - 0.90).abs() < 1e-9 {
            return Ok(Self::Ninety);
        }
        if (value - 0.95).abs() < 1e-9 {
            return Ok(Self::NinetyFive);
        }
        if (value - 0.99).abs() < 1e-9 {
            return Ok(Self::NinetyNine);
        }
        Err(ValidationError::UnsupportedConfidenceLevel { value })
    }
}

/// Outlier rejection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    /// Robust z-score threshold `k`.
    pub threshold: f64,
    /// Never reduce the kept set below this count by statistical exclusion.
    pub min_kept: usize,
    /// Percentage band around the median used when MAD is zero.
    pub identical_band_pct: f64,
    /// How many times the threshold may be relaxed before exclusion is
    /// skipped outright.
    pub max_relaxation_rounds: u32,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            threshold: 3.5,
            min_kept: 3,
            identical_band_pct: 10.0,
            max_relaxation_rounds: 3,
        }
    }
}

impl OutlierConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ValidationError::InvalidOutlierThreshold {
                value: self.threshold,
            });
        }
        if self.min_kept < 2 {
            return Err(ValidationError::InvalidSampleFloor {
                value: self.min_kept,
            });
        }
        if !self.identical_band_pct.is_finite() || self.identical_band_pct <= 0.0 {
            return Err(ValidationError::NonPositiveValue {
                field: "identical_band_pct",
            });
        }
        Ok(())
    }
}

/// Per-request analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub confidence_level: ConfidenceLevel,
    pub outlier: OutlierConfig,
    /// Samples below this count flag the whole result as low confidence.
    pub min_confident_sample: usize,
    /// ISO currency code for all money fields.
    pub currency: String,
    /// Overall soft deadline; on expiry the engine returns the partial
    /// result computed so far.
    pub deadline_ms: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_level: ConfidenceLevel::default(),
            outlier: OutlierConfig::default(),
            min_confident_sample: 5,
            currency: String::from("USD"),
            deadline_ms: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.outlier.validate()?;
        if self.min_confident_sample < 2 {
            return Err(ValidationError::InvalidSampleFloor {
                value: self.min_confident_sample,
            });
        }
        validate_currency_code(&self.currency)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::default();
        config.validate().expect("defaults must validate");
        assert_eq!(config.confidence_level, ConfidenceLevel::NinetyFive);
        assert_eq!(config.outlier.min_kept, 3);
        assert_eq!(config.min_confident_sample, 5);
    }

    #[test]
    fn maps_confidence_values() {
        assert_eq!(
            ConfidenceLevel::from_value(0.95).expect("must map"),
            ConfidenceLevel::NinetyFive
        );
        assert!(matches!(
            ConfidenceLevel::from_value(0.8),
            Err(ValidationError::UnsupportedConfidenceLevel { .. })
        ));
    }

    #[test]
    fn rejects_degenerate_outlier_config() {
        let config = OutlierConfig {
            threshold: 0.0,
            ..OutlierConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidOutlierThreshold { .. })
        ));

        let config = OutlierConfig {
            min_kept: 1,
            ..OutlierConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSampleFloor { .. })
        ));
    }
}
