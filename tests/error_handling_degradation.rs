//! Behavior-driven tests for error handling and graceful degradation
//!
//! The engine's contract: only structurally unusable requests fail; every
//! partial-data condition degrades into diagnostics on a successful result.

use std::sync::Arc;

use fairmark_core::{
    AnalysisConfig, AnalysisEngine, AnalysisError, AnalysisRequest, AnalysisStage,
    CharacteristicCategory, Characteristics, ComparableProperty, DiagnosticFlag,
    FairPriceEstimate, FairPriceResult, LiquidityProfile, LiquiditySegment, MarketRate,
    MarketRateProvider, RateObservation, RateProvenance, RateSourceId, ScenarioGenerator,
    ScenarioPolicy, StaticRateSource, TargetProperty, UtcDateTime,
};

fn engine() -> AnalysisEngine {
    let observation = RateObservation::new(
        0.16,
        UtcDateTime::parse("2025-06-01T00:00:00Z").expect("valid timestamp"),
    )
    .expect("valid observation");
    let provider = Arc::new(MarketRateProvider::with_default_config(Arc::new(
        StaticRateSource::new(observation),
    )));
    AnalysisEngine::with_standard_policies(provider)
}

fn comp(id: &str, price: u64, area: f64) -> ComparableProperty {
    ComparableProperty::new(id, price, area, Characteristics::new()).expect("valid comp")
}

fn target(area: f64) -> TargetProperty {
    TargetProperty::new("target", area, Characteristics::new()).expect("valid target")
}

// =============================================================================
// Hard Errors: Structurally Invalid Requests
// =============================================================================

#[tokio::test]
async fn request_without_comparables_fails_hard() {
    let request = AnalysisRequest::new(target(60.0), Vec::new());

    let error = engine().analyze(&request).await.expect_err("must fail");
    assert!(matches!(error, AnalysisError::EmptyComparables));
}

#[tokio::test]
async fn target_with_zero_area_fails_the_input_contract() {
    // A wire record can carry a zero area past serde; the boundary check
    // rejects it before any arithmetic sees it.
    let broken_target: TargetProperty =
        serde_json::from_str(r#"{"id": "target", "total_area": 0.0}"#)
            .expect("wire record deserializes");
    let request = AnalysisRequest::new(broken_target, vec![comp("a", 6_000_000, 60.0)]);

    let error = engine().analyze(&request).await.expect_err("must fail");
    assert!(matches!(error, AnalysisError::InvalidTarget(_)));
}

// =============================================================================
// Degradation: Degenerate Fair Price
// =============================================================================

#[test]
fn zero_fair_price_empties_the_scenario_list_without_panicking() {
    // The historically observed production crash: scenario discount math
    // dividing by a zero fair price.
    let zero_price = FairPriceResult::Priced(FairPriceEstimate {
        point: 0,
        interval: None,
        per_area_basis: 0.0,
        multiplier: 1.0,
        low_confidence: true,
    });
    let liquidity = LiquidityProfile {
        segment: LiquiditySegment::Mass,
        speed_multiplier: 1.0,
        price_base_multiplier: 1.0,
    };
    let now = UtcDateTime::parse("2025-06-01T00:00:00Z").expect("valid timestamp");
    let rate = MarketRate {
        annual_rate: 0.16,
        as_of: now,
        source: RateSourceId::Static,
        fetched_at: now,
        provenance: RateProvenance::Fresh,
    };

    let outcome = ScenarioGenerator::new(ScenarioPolicy::default()).generate(
        &zero_price,
        &liquidity,
        &rate,
        &target(60.0),
    );

    assert!(outcome.scenarios.is_empty());
    assert!(outcome.degenerate);
}

#[tokio::test]
async fn unusable_comparables_degrade_to_insufficient_data_with_flags() {
    // Every comparable fails the contract, so no fair price can exist.
    let broken: ComparableProperty =
        serde_json::from_str(r#"{"id": "broken", "price": null, "total_area": 50.0}"#)
            .expect("wire record deserializes");
    let request = AnalysisRequest::new(target(60.0), vec![broken]);

    let result = engine().analyze(&request).await.expect("still succeeds");

    assert!(matches!(
        result.fair_price,
        FairPriceResult::InsufficientData { .. }
    ));
    assert!(result.scenarios.is_empty());
    assert!(result
        .diagnostics
        .has_flag(DiagnosticFlag::DegenerateArithmetic));
    assert!(result.diagnostics.has_flag(DiagnosticFlag::InsufficientData));
    assert!(result.recommendations.is_empty());
}

// =============================================================================
// Degradation: Deadlines
// =============================================================================

#[tokio::test]
async fn expired_deadline_returns_a_partial_result_not_an_error() {
    let config = AnalysisConfig {
        deadline_ms: Some(0),
        ..AnalysisConfig::default()
    };
    let request = AnalysisRequest::new(
        target(60.0),
        vec![
            comp("a", 6_000_000, 60.0),
            comp("b", 6_100_000, 61.0),
            comp("c", 6_050_000, 60.5),
        ],
    )
    .with_config(config);

    let result = engine().analyze(&request).await.expect("still succeeds");

    // Statistics and fair price ran; the later stages were skipped.
    assert!(result.fair_price.is_priced());
    assert!(result.market_rate.is_none());
    assert!(result.scenarios.is_empty());
    assert!(result.recommendations.is_empty());
    assert!(result.diagnostics.has_flag(DiagnosticFlag::DeadlineExceeded));
    assert!(result
        .diagnostics
        .degraded_stages
        .contains(&AnalysisStage::Recommendations));
}

// =============================================================================
// Degradation: Unknown Policy Values
// =============================================================================

#[tokio::test]
async fn unknown_characteristic_value_adjusts_neutrally_and_warns() {
    let target = TargetProperty::new(
        "target",
        60.0,
        Characteristics::from([(CharacteristicCategory::RepairLevel, "palatial".to_owned())]),
    )
    .expect("valid target");
    let comparables: Vec<ComparableProperty> = (0..5)
        .map(|i| {
            ComparableProperty::new(
                format!("c{i}"),
                6_000_000 + i * 40_000,
                60.0,
                Characteristics::from([(
                    CharacteristicCategory::RepairLevel,
                    "cosmetic".to_owned(),
                )]),
            )
            .expect("valid comp")
        })
        .collect();

    let result = engine()
        .analyze(&AnalysisRequest::new(target, comparables))
        .await
        .expect("analysis succeeds");

    assert_eq!(result.adjustments.multiplier, 1.0);
    assert!(result
        .diagnostics
        .warnings
        .iter()
        .any(|warning| warning.contains("repair_level:palatial")));
}

// =============================================================================
// Degradation: Configuration Validation
// =============================================================================

#[tokio::test]
async fn invalid_configuration_is_rejected_at_the_boundary() {
    let config: AnalysisConfig = serde_json::from_str(
        r#"{"currency": "DOLLARS"}"#,
    )
    .expect("config deserializes");
    let request =
        AnalysisRequest::new(target(60.0), vec![comp("a", 6_000_000, 60.0)]).with_config(config);

    let error = engine().analyze(&request).await.expect_err("must fail");
    assert!(matches!(error, AnalysisError::InvalidConfig(_)));
}
