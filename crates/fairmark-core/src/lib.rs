//! # Fairmark Core
//!
//! Fair-price analytics engine: turns a target property plus comparable
//! listings into a statistically defensible fair price, a confidence
//! interval, characteristic-based adjustments, and sale-strategy scenarios
//! with financial projections.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Property records, characteristics, timestamps |
//! | [`config`] | Per-request analysis configuration |
//! | [`outlier`] | MAD-based robust outlier rejection |
//! | [`stats`] | Central tendency, spread, confidence intervals |
//! | [`adjust`] | Bounded multiplicative characteristic adjustments |
//! | [`fairprice`] | Point estimate and interval for the target |
//! | [`rate`] | Cached external opportunity-cost rate |
//! | [`liquidity`] | Market segment classification |
//! | [`scenario`] | Canonical sale-strategy scenarios |
//! | [`recommend`] | Qualitative strengths/weaknesses and strategy advice |
//! | [`pipeline`] | The end-to-end analysis engine |
//! | [`diagnostics`] | Structured degradation flags |
//! | [`envelope`] | Machine-readable response envelope |
//! | [`error`] | Validation and analysis error taxonomy |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fairmark_core::{
//!     AnalysisEngine, AnalysisRequest, MarketRateProvider, StaticRateSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(MarketRateProvider::with_default_config(Arc::new(
//!         StaticRateSource::with_default_rate(),
//!     )));
//!     let engine = AnalysisEngine::with_standard_policies(provider);
//!
//!     let request: AnalysisRequest = serde_json::from_str(&std::fs::read_to_string(
//!         "request.json",
//!     )?)?;
//!     let result = engine.analyze(&request).await?;
//!
//!     if let Some(point) = result.fair_price.point() {
//!         println!("fair price: {point} {}", result.currency);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Degradation
//!
//! The engine never crashes on degenerate inputs. A zero or absent fair
//! price empties the scenario list instead of dividing by it; a failing
//! rate source resolves to a stale or default rate; a thin sample flags
//! `low_confidence`; an expired caller deadline returns the partial result
//! computed so far. Every recovered condition leaves a typed flag in
//! [`Diagnostics`].

pub mod adjust;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fairprice;
pub mod liquidity;
pub mod outlier;
pub mod pipeline;
pub mod rate;
pub mod recommend;
pub mod scenario;
pub mod stats;

pub use adjust::{
    AdjustmentModel, AdjustmentPolicy, AdjustmentResult, CategoryAdjustment, CoefficientTable,
};
pub use config::{AnalysisConfig, ConfidenceLevel, OutlierConfig};
pub use diagnostics::{AnalysisStage, DiagnosticFlag, Diagnostics};
pub use domain::{
    CharacteristicCategory, Characteristics, ComparableProperty, Mutability, TargetProperty,
    UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{AnalysisError, CoreError, ValidationError};
pub use fairprice::{
    FairPriceCalculator, FairPriceEstimate, FairPriceResult, InsufficientDataReason, PriceInterval,
};
pub use liquidity::{LiquidityPolicy, LiquidityProfile, LiquidityProfiler, LiquiditySegment};
pub use outlier::{ExclusionReason, ExclusionRecord, FilterOutcome, OutlierFilter};
pub use pipeline::{AnalysisEngine, AnalysisRequest, AnalysisResult};
pub use rate::{
    HttpRateSource, MarketRate, MarketRateProvider, RateError, RateErrorKind, RateLookup,
    RateObservation, RateProvenance, RateProviderConfig, RateSource, RateSourceId, RefreshMode,
    StaticRateSource,
};
pub use recommend::{Recommendation, RecommendationEngine, RecommendationKind};
pub use scenario::{
    Scenario, ScenarioGenerator, ScenarioKind, ScenarioOutcome, ScenarioPolicy,
};
pub use stats::{ConfidenceInterval, StatisticsEngine, StatisticsResult};
