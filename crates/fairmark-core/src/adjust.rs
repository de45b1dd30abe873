//! Bounded multiplicative adjustments for characteristic differences.
//!
//! Coefficient tables are immutable policy data injected at construction;
//! concurrent analyses cannot interfere and tests substitute fixtures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CharacteristicCategory, Characteristics, ComparableProperty, Mutability};
use crate::ValidationError;

/// Value-to-multiplier lookup for one characteristic category, with the
/// documented bound every coefficient must respect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTable {
    coefficients: BTreeMap<String, f64>,
    lower: f64,
    upper: f64,
}

impl CoefficientTable {
    pub fn new(
        category: CharacteristicCategory,
        lower: f64,
        upper: f64,
        entries: &[(&str, f64)],
    ) -> Result<Self, ValidationError> {
        if !lower.is_finite() || !upper.is_finite() || lower <= 0.0 || upper < lower {
            return Err(ValidationError::InvalidBound { lower, upper });
        }

        let mut coefficients = BTreeMap::new();
        for (value, coefficient) in entries {
            if !coefficient.is_finite() || *coefficient < lower || *coefficient > upper {
                return Err(ValidationError::CoefficientOutOfBounds {
                    category: category.as_str(),
                    value: (*value).to_owned(),
                    coefficient: *coefficient,
                    lower,
                    upper,
                });
            }
            coefficients.insert((*value).to_owned(), *coefficient);
        }

        Ok(Self {
            coefficients,
            lower,
            upper,
        })
    }

    pub fn coefficient(&self, value: &str) -> Option<f64> {
        self.coefficients.get(value).copied()
    }

    pub const fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Largest multiplier ratio this table can produce between two values.
    fn ratio_bounds(&self) -> (f64, f64) {
        (self.lower / self.upper, self.upper / self.lower)
    }
}

/// Immutable adjustment policy: one coefficient table per category plus the
/// global sanity bound on the composed multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPolicy {
    tables: BTreeMap<CharacteristicCategory, CoefficientTable>,
    global_lower: f64,
    global_upper: f64,
}

impl AdjustmentPolicy {
    pub fn new(
        tables: BTreeMap<CharacteristicCategory, CoefficientTable>,
        global_lower: f64,
        global_upper: f64,
    ) -> Result<Self, ValidationError> {
        if !global_lower.is_finite()
            || !global_upper.is_finite()
            || global_lower <= 0.0
            || global_upper < global_lower
        {
            return Err(ValidationError::InvalidBound {
                lower: global_lower,
                upper: global_upper,
            });
        }
        Ok(Self {
            tables,
            global_lower,
            global_upper,
        })
    }

    /// The default policy data. Bounds per category: repair level may move a
    /// price by -25%..+100%, view by +-5%, floor tier by +-8%, building
    /// condition by -15%..+10%. The composed multiplier is clamped to
    /// [0.5, 1.5].
    pub fn standard() -> Self {
        let tables = BTreeMap::from([
            (
                CharacteristicCategory::RepairLevel,
                CoefficientTable::new(
                    CharacteristicCategory::RepairLevel,
                    0.75,
                    2.0,
                    &[
                        ("none", 0.75),
                        ("basic", 0.90),
                        ("cosmetic", 1.00),
                        ("euro", 1.20),
                        ("designer", 1.40),
                    ],
                )
                .expect("standard repair table must be in bounds"),
            ),
            (
                CharacteristicCategory::ViewType,
                CoefficientTable::new(
                    CharacteristicCategory::ViewType,
                    0.95,
                    1.05,
                    &[
                        ("street", 0.96),
                        ("courtyard", 1.00),
                        ("park", 1.04),
                        ("water", 1.05),
                    ],
                )
                .expect("standard view table must be in bounds"),
            ),
            (
                CharacteristicCategory::FloorTier,
                CoefficientTable::new(
                    CharacteristicCategory::FloorTier,
                    0.92,
                    1.08,
                    &[("first", 0.93), ("middle", 1.00), ("last", 0.96)],
                )
                .expect("standard floor table must be in bounds"),
            ),
            (
                CharacteristicCategory::BuildingCondition,
                CoefficientTable::new(
                    CharacteristicCategory::BuildingCondition,
                    0.85,
                    1.10,
                    &[("poor", 0.85), ("standard", 1.00), ("renovated", 1.08)],
                )
                .expect("standard condition table must be in bounds"),
            ),
        ]);

        Self::new(tables, 0.5, 1.5).expect("standard global bound must be valid")
    }

    pub fn table(&self, category: CharacteristicCategory) -> Option<&CoefficientTable> {
        self.tables.get(&category)
    }

    pub const fn global_bounds(&self) -> (f64, f64) {
        (self.global_lower, self.global_upper)
    }

    /// Re-check invariants after deserializing a policy from configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.global_lower.is_finite()
            || !self.global_upper.is_finite()
            || self.global_lower <= 0.0
            || self.global_upper < self.global_lower
        {
            return Err(ValidationError::InvalidBound {
                lower: self.global_lower,
                upper: self.global_upper,
            });
        }
        for (category, table) in &self.tables {
            let (lower, upper) = table.bounds();
            if !lower.is_finite() || !upper.is_finite() || lower <= 0.0 || upper < lower {
                return Err(ValidationError::InvalidBound { lower, upper });
            }
            for (value, coefficient) in &table.coefficients {
                if !coefficient.is_finite() || *coefficient < lower || *coefficient > upper {
                    return Err(ValidationError::CoefficientOutOfBounds {
                        category: category.as_str(),
                        value: value.clone(),
                        coefficient: *coefficient,
                        lower,
                        upper,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One category's contribution to the combined multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAdjustment {
    pub category: CharacteristicCategory,
    pub target_value: String,
    pub comparable_value: String,
    /// target coefficient over comparable coefficient, clamped to the
    /// category's ratio bound.
    pub coefficient: f64,
    pub mutability: Mutability,
}

/// Combined adjustment for a target against a comparable profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub per_category: Vec<CategoryAdjustment>,
    /// Product of category coefficients, clamped to the global bound.
    pub multiplier: f64,
    pub clamped: bool,
    /// Characteristic values absent from the policy tables; they adjust at
    /// 1.0 and surface as diagnostics.
    pub unknown_values: Vec<String>,
}

impl AdjustmentResult {
    /// Neutral result used when there is nothing to compare against.
    pub fn identity() -> Self {
        Self {
            per_category: Vec::new(),
            multiplier: 1.0,
            clamped: false,
            unknown_values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdjustmentModel {
    policy: AdjustmentPolicy,
}

impl AdjustmentModel {
    pub fn new(policy: AdjustmentPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AdjustmentPolicy {
        &self.policy
    }

    /// Structural vs. improvable classification for a category.
    pub const fn classify(category: CharacteristicCategory) -> Mutability {
        category.mutability()
    }

    /// Pure pairwise adjustment over the categories present in both maps.
    ///
    /// Identical characteristic sets always produce a multiplier of exactly
    /// 1.0.
    pub fn adjust(&self, target: &Characteristics, comparable: &Characteristics) -> AdjustmentResult {
        let mut per_category = Vec::new();
        let mut unknown_values = Vec::new();
        let mut multiplier = 1.0;

        for (category, target_value) in target {
            let Some(comparable_value) = comparable.get(category) else {
                continue;
            };

            // Identical values contribute exactly 1.0 without a table
            // lookup, so unknown-but-equal values stay neutral and silent.
            let coefficient = if target_value == comparable_value {
                1.0
            } else {
                let table = self.policy.table(*category);
                let target_coef =
                    resolve_coefficient(table, *category, target_value, &mut unknown_values);
                let comparable_coef =
                    resolve_coefficient(table, *category, comparable_value, &mut unknown_values);
                let ratio = target_coef / comparable_coef;
                match table {
                    Some(table) => {
                        let (lower, upper) = table.ratio_bounds();
                        ratio.clamp(lower, upper)
                    }
                    None => ratio,
                }
            };

            multiplier *= coefficient;
            per_category.push(CategoryAdjustment {
                category: *category,
                target_value: target_value.clone(),
                comparable_value: comparable_value.clone(),
                coefficient,
                mutability: category.mutability(),
            });
        }

        let (global_lower, global_upper) = self.policy.global_bounds();
        let clamped = multiplier < global_lower || multiplier > global_upper;
        if clamped {
            multiplier = multiplier.clamp(global_lower, global_upper);
        }

        AdjustmentResult {
            per_category,
            multiplier,
            clamped,
            unknown_values,
        }
    }

    /// Adjust the target against the representative profile of the kept
    /// comparable set: per category, the modal value among comparables
    /// (lexicographically smallest on ties, for determinism).
    pub fn adjust_against_set(
        &self,
        target: &Characteristics,
        comparables: &[ComparableProperty],
    ) -> AdjustmentResult {
        let profile = representative_profile(comparables);
        if profile.is_empty() {
            return AdjustmentResult::identity();
        }
        self.adjust(target, &profile)
    }
}

fn resolve_coefficient(
    table: Option<&CoefficientTable>,
    category: CharacteristicCategory,
    value: &str,
    unknown_values: &mut Vec<String>,
) -> f64 {
    match table.and_then(|table| table.coefficient(value)) {
        Some(coefficient) => coefficient,
        None => {
            unknown_values.push(format!("{category}:{value}"));
            1.0
        }
    }
}

/// Per category, the most common value among the given comparables.
pub fn representative_profile(comparables: &[ComparableProperty]) -> Characteristics {
    let mut counts: BTreeMap<CharacteristicCategory, BTreeMap<&str, usize>> = BTreeMap::new();
    for comparable in comparables {
        for (category, value) in &comparable.characteristics {
            *counts
                .entry(*category)
                .or_default()
                .entry(value.as_str())
                .or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(category, values)| {
            let (value, _) = values
                .into_iter()
                .max_by(|(a_value, a_count), (b_value, b_count)| {
                    // BTreeMap iterates values ascending, so on equal counts
                    // max_by keeps the earlier (smaller) value via Greater.
                    a_count.cmp(b_count).then(b_value.cmp(a_value))
                })
                .expect("category entry implies at least one value");
            (category, value.to_owned())
        })
        .collect()
}
