// Test library for analysis behavior suites
pub use fairmark_core::{
    adjust::{AdjustmentModel, AdjustmentPolicy},
    pipeline::{AnalysisEngine, AnalysisRequest, AnalysisResult},
    rate::{MarketRateProvider, RateObservation, RateSource, StaticRateSource},
    AnalysisConfig, CharacteristicCategory, Characteristics, ComparableProperty, DiagnosticFlag,
    FairPriceResult, TargetProperty, UtcDateTime,
};
pub use std::sync::Arc;
