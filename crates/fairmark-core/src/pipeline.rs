//! The analysis pipeline: filter, statistics, adjustments, fair price,
//! liquidity, rate, scenarios, recommendations. Always in that order.
//!
//! Only a structurally unusable request fails; every partial-data condition
//! degrades into diagnostics on a successful result. A caller deadline is
//! checked at stage boundaries and returns the best partial result computed
//! so far.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::adjust::{AdjustmentModel, AdjustmentPolicy, AdjustmentResult};
use crate::config::AnalysisConfig;
use crate::diagnostics::{AnalysisStage, DiagnosticFlag, Diagnostics};
use crate::domain::{ComparableProperty, TargetProperty};
use crate::error::AnalysisError;
use crate::fairprice::{FairPriceCalculator, FairPriceResult};
use crate::liquidity::{LiquidityPolicy, LiquidityProfile, LiquidityProfiler};
use crate::outlier::OutlierFilter;
use crate::rate::{MarketRate, MarketRateProvider, RateProvenance};
use crate::recommend::{Recommendation, RecommendationEngine};
use crate::scenario::{Scenario, ScenarioGenerator, ScenarioOutcome, ScenarioPolicy};
use crate::stats::{StatisticsEngine, StatisticsResult};

/// A complete analysis request from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub target: TargetProperty,
    pub comparables: Vec<ComparableProperty>,
    #[serde(default)]
    pub config: AnalysisConfig,
}

impl AnalysisRequest {
    pub fn new(target: TargetProperty, comparables: Vec<ComparableProperty>) -> Self {
        Self {
            target,
            comparables,
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Boundary contract check; individual bad comparables are not rejected
    /// here, they surface as per-item diagnostics during filtering.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.comparables.is_empty() {
            return Err(AnalysisError::EmptyComparables);
        }
        if let Some(violation) = self.target.contract_violation() {
            return Err(AnalysisError::InvalidTarget(violation));
        }
        self.config.validate().map_err(AnalysisError::InvalidConfig)
    }
}

/// Aggregate output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub statistics: StatisticsResult,
    pub adjustments: AdjustmentResult,
    pub fair_price: FairPriceResult,
    /// Absent when no fair price exists or the deadline expired first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<LiquidityProfile>,
    /// Absent only when the deadline expired before the rate stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_rate: Option<MarketRate>,
    pub scenarios: Vec<Scenario>,
    pub recommendations: Vec<Recommendation>,
    pub currency: String,
    pub diagnostics: Diagnostics,
}

/// The fair-price analytics engine.
///
/// Policies are injected immutable at construction; the engine is safe to
/// share across concurrent analyses. The only interior mutability is the
/// rate provider's cache.
pub struct AnalysisEngine {
    adjustment_model: AdjustmentModel,
    liquidity_profiler: LiquidityProfiler,
    scenario_generator: ScenarioGenerator,
    rate_provider: Arc<MarketRateProvider>,
}

impl AnalysisEngine {
    pub fn new(
        adjustment_policy: AdjustmentPolicy,
        liquidity_policy: LiquidityPolicy,
        scenario_policy: ScenarioPolicy,
        rate_provider: Arc<MarketRateProvider>,
    ) -> Self {
        Self {
            adjustment_model: AdjustmentModel::new(adjustment_policy),
            liquidity_profiler: LiquidityProfiler::new(liquidity_policy),
            scenario_generator: ScenarioGenerator::new(scenario_policy),
            rate_provider,
        }
    }

    /// Engine with the standard policy data.
    pub fn with_standard_policies(rate_provider: Arc<MarketRateProvider>) -> Self {
        Self::new(
            AdjustmentPolicy::standard(),
            LiquidityPolicy::default(),
            ScenarioPolicy::default(),
            rate_provider,
        )
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] only for structurally invalid requests: an
    /// empty comparable list, a target failing the input contract, or an
    /// invalid configuration.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        request.validate()?;

        let started = Instant::now();
        let config = &request.config;
        let mut diagnostics = Diagnostics::new(config.confidence_level);

        let filtered = OutlierFilter::new(config.outlier.clone()).filter(&request.comparables);
        if filtered.invalid_count() > 0 {
            diagnostics.push_flag(DiagnosticFlag::InvalidComparable);
        }
        diagnostics.excluded_count = filtered.excluded.len();
        diagnostics.excluded = filtered.excluded;

        let samples: Vec<f64> = filtered
            .kept
            .iter()
            .filter_map(ComparableProperty::price_per_area)
            .collect();
        let statistics = StatisticsEngine::new(config.confidence_level, config.min_confident_sample)
            .compute(&samples);
        diagnostics.sample_size = statistics.sample_size;
        diagnostics.low_confidence = statistics.low_confidence;
        if statistics.low_confidence {
            diagnostics.push_flag(DiagnosticFlag::InsufficientData);
        }

        let adjustments = self
            .adjustment_model
            .adjust_against_set(&request.target.characteristics, &filtered.kept);
        for unknown in &adjustments.unknown_values {
            diagnostics.push_warning(format!(
                "no coefficient for '{unknown}'; adjusted at 1.0"
            ));
        }

        let fair_price =
            FairPriceCalculator::calculate(&statistics, &adjustments, request.target.total_area);

        let mut result = AnalysisResult {
            statistics,
            adjustments,
            fair_price,
            liquidity: None,
            market_rate: None,
            scenarios: Vec::new(),
            recommendations: Vec::new(),
            currency: config.currency.clone(),
            diagnostics,
        };

        if deadline_expired(started, config.deadline_ms) {
            for stage in [
                AnalysisStage::Liquidity,
                AnalysisStage::Rate,
                AnalysisStage::Scenarios,
                AnalysisStage::Recommendations,
            ] {
                result.diagnostics.mark_degraded(stage);
            }
            return Ok(result);
        }

        if let FairPriceResult::Priced(estimate) = &result.fair_price {
            result.liquidity = Some(self.liquidity_profiler.classify(
                estimate.point,
                request.target.total_area,
                &result.statistics,
            ));
        }

        let lookup = self.rate_provider.get_rate().await;
        result.diagnostics.rate_provenance = Some(lookup.rate.provenance);
        result.diagnostics.rate_cache_hit = Some(lookup.cache_hit);
        if lookup.rate.provenance != RateProvenance::Fresh {
            result
                .diagnostics
                .push_flag(DiagnosticFlag::RateSourceUnavailable);
        }
        result.market_rate = Some(lookup.rate);

        let scenario_outcome = match &result.liquidity {
            Some(liquidity) => self.scenario_generator.generate(
                &result.fair_price,
                liquidity,
                &lookup.rate,
                &request.target,
            ),
            None => ScenarioOutcome {
                scenarios: Vec::new(),
                degenerate: true,
            },
        };
        if scenario_outcome.degenerate {
            result
                .diagnostics
                .push_flag(DiagnosticFlag::DegenerateArithmetic);
        }
        result.scenarios = scenario_outcome.scenarios;

        if deadline_expired(started, config.deadline_ms) {
            result.diagnostics.mark_degraded(AnalysisStage::Recommendations);
            return Ok(result);
        }

        result.recommendations = RecommendationEngine::derive(
            &result.statistics,
            &result.adjustments,
            &result.scenarios,
            &lookup.rate,
        );

        Ok(result)
    }
}

fn deadline_expired(started: Instant, deadline_ms: Option<u64>) -> bool {
    deadline_ms.is_some_and(|ms| started.elapsed() >= Duration::from_millis(ms))
}
