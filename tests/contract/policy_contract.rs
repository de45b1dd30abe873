//! Contract tests for the injected policy data.
//!
//! Whatever tables an operator injects, the documented invariants must
//! hold: coefficients inside their per-category bounds, the composed
//! multiplier inside the global bound, identity adjustments at exactly 1.0,
//! and canonical scenario ordering.

use fairmark_core::{
    AdjustmentModel, AdjustmentPolicy, CharacteristicCategory, Characteristics, LiquidityPolicy,
    ScenarioKind, ScenarioPolicy, ValidationError,
};

fn standard_model() -> AdjustmentModel {
    AdjustmentModel::new(AdjustmentPolicy::standard())
}

fn all_values_for(category: CharacteristicCategory) -> Vec<&'static str> {
    match category {
        CharacteristicCategory::RepairLevel => {
            vec!["none", "basic", "cosmetic", "euro", "designer"]
        }
        CharacteristicCategory::ViewType => vec!["street", "courtyard", "park", "water"],
        CharacteristicCategory::FloorTier => vec!["first", "middle", "last"],
        CharacteristicCategory::BuildingCondition => vec!["poor", "standard", "renovated"],
    }
}

#[test]
fn standard_tables_keep_every_coefficient_inside_its_bound() {
    let policy = AdjustmentPolicy::standard();
    policy.validate().expect("standard policy must validate");

    for category in CharacteristicCategory::ALL {
        let table = policy
            .table(category)
            .unwrap_or_else(|| panic!("standard policy must cover '{category}'"));
        let (lower, upper) = table.bounds();

        for value in all_values_for(category) {
            let coefficient = table
                .coefficient(value)
                .unwrap_or_else(|| panic!("'{category}' must price '{value}'"));
            assert!(
                (lower..=upper).contains(&coefficient),
                "'{category}:{value}' coefficient {coefficient} outside [{lower}, {upper}]"
            );
        }
    }
}

#[test]
fn identity_adjustment_is_exactly_one_for_every_value_combination() {
    let model = standard_model();

    for repair in all_values_for(CharacteristicCategory::RepairLevel) {
        for view in all_values_for(CharacteristicCategory::ViewType) {
            let characteristics = Characteristics::from([
                (CharacteristicCategory::RepairLevel, repair.to_owned()),
                (CharacteristicCategory::ViewType, view.to_owned()),
            ]);

            let result = model.adjust(&characteristics, &characteristics);
            assert_eq!(
                result.multiplier, 1.0,
                "identity adjustment for repair={repair}, view={view}"
            );
        }
    }
}

#[test]
fn composed_multiplier_never_leaves_the_global_bound() {
    let model = standard_model();
    let (global_lower, global_upper) = model.policy().global_bounds();

    // Exhaustive sweep over every pairing of extreme profiles.
    let profiles: Vec<Characteristics> = all_values_for(CharacteristicCategory::RepairLevel)
        .into_iter()
        .flat_map(|repair| {
            all_values_for(CharacteristicCategory::BuildingCondition)
                .into_iter()
                .flat_map(move |condition| {
                    all_values_for(CharacteristicCategory::ViewType).into_iter().map(
                        move |view| {
                            Characteristics::from([
                                (CharacteristicCategory::RepairLevel, repair.to_owned()),
                                (CharacteristicCategory::BuildingCondition, condition.to_owned()),
                                (CharacteristicCategory::ViewType, view.to_owned()),
                            ])
                        },
                    )
                })
        })
        .collect();

    for target in &profiles {
        for comparable in &profiles {
            let result = model.adjust(target, comparable);
            assert!(
                (global_lower..=global_upper).contains(&result.multiplier),
                "multiplier {} outside [{global_lower}, {global_upper}] for {target:?} vs {comparable:?}",
                result.multiplier
            );
        }
    }
}

#[test]
fn out_of_bound_custom_tables_are_rejected_at_construction() {
    use fairmark_core::CoefficientTable;

    let err = CoefficientTable::new(
        CharacteristicCategory::ViewType,
        0.95,
        1.05,
        &[("skyline", 1.40)],
    )
    .expect_err("coefficient above the bound must fail");
    assert!(matches!(err, ValidationError::CoefficientOutOfBounds { .. }));

    let err = CoefficientTable::new(CharacteristicCategory::ViewType, 1.05, 0.95, &[])
        .expect_err("inverted bound must fail");
    assert!(matches!(err, ValidationError::InvalidBound { .. }));
}

#[test]
fn policies_round_trip_through_configuration_json() {
    let policy = AdjustmentPolicy::standard();

    let json = serde_json::to_string(&policy).expect("policy serializes");
    let parsed: AdjustmentPolicy = serde_json::from_str(&json).expect("policy deserializes");

    parsed.validate().expect("round-tripped policy validates");
    assert_eq!(parsed, policy);
}

#[test]
fn default_liquidity_and_scenario_policies_validate() {
    LiquidityPolicy::default()
        .validate()
        .expect("default liquidity policy validates");
    ScenarioPolicy::default()
        .validate()
        .expect("default scenario policy validates");
}

#[test]
fn scenario_order_is_the_canonical_sequence() {
    assert_eq!(
        ScenarioKind::ORDER,
        [
            ScenarioKind::QuickSale,
            ScenarioKind::Market,
            ScenarioKind::Patient,
            ScenarioKind::Premium,
        ]
    );
}
