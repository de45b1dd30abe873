use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Recognized characteristic categories.
///
/// The scraping collaborator normalizes raw listing fields into this closed
/// set; anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicCategory {
    RepairLevel,
    ViewType,
    FloorTier,
    BuildingCondition,
}

/// Whether an owner can change a characteristic before selling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Structural, cannot be changed (floor, view).
    Fixed,
    /// Improvable before sale (repair, building condition via renovation).
    Variable,
}

impl CharacteristicCategory {
    pub const ALL: [Self; 4] = [
        Self::RepairLevel,
        Self::ViewType,
        Self::FloorTier,
        Self::BuildingCondition,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RepairLevel => "repair_level",
            Self::ViewType => "view_type",
            Self::FloorTier => "floor_tier",
            Self::BuildingCondition => "building_condition",
        }
    }

    pub const fn mutability(self) -> Mutability {
        match self {
            Self::RepairLevel | Self::BuildingCondition => Mutability::Variable,
            Self::ViewType | Self::FloorTier => Mutability::Fixed,
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "repair_level" => Ok(Self::RepairLevel),
            "view_type" => Ok(Self::ViewType),
            "floor_tier" => Ok(Self::FloorTier),
            "building_condition" => Ok(Self::BuildingCondition),
            other => Err(ValidationError::UnknownCategory {
                value: other.to_owned(),
            }),
        }
    }
}

impl Display for CharacteristicCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized characteristic map for a property record.
///
/// `BTreeMap` keeps category iteration deterministic, which keeps adjustment
/// breakdowns and recommendation ordering deterministic.
pub type Characteristics = BTreeMap<CharacteristicCategory, String>;

/// Validate a characteristic value: non-empty after trimming, lowercased.
pub fn normalize_value(
    category: CharacteristicCategory,
    value: &str,
) -> Result<String, ValidationError> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ValidationError::EmptyCharacteristicValue {
            category: category.as_str(),
        });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_categories() {
        for category in CharacteristicCategory::ALL {
            assert_eq!(
                CharacteristicCategory::parse(category.as_str()).expect("must parse"),
                category
            );
        }
    }

    #[test]
    fn rejects_unknown_category() {
        let err = CharacteristicCategory::parse("balcony_count").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnknownCategory { .. }));
    }

    #[test]
    fn classifies_mutability() {
        assert_eq!(
            CharacteristicCategory::RepairLevel.mutability(),
            Mutability::Variable
        );
        assert_eq!(
            CharacteristicCategory::ViewType.mutability(),
            Mutability::Fixed
        );
        assert_eq!(
            CharacteristicCategory::FloorTier.mutability(),
            Mutability::Fixed
        );
        assert_eq!(
            CharacteristicCategory::BuildingCondition.mutability(),
            Mutability::Variable
        );
    }

    #[test]
    fn normalizes_values() {
        let value =
            normalize_value(CharacteristicCategory::RepairLevel, "  Euro ").expect("must pass");
        assert_eq!(value, "euro");

        let err = normalize_value(CharacteristicCategory::ViewType, "   ").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::EmptyCharacteristicValue { .. }
        ));
    }
}
