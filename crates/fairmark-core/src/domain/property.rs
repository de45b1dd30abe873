use serde::{Deserialize, Serialize};

use crate::domain::characteristics::{normalize_value, CharacteristicCategory, Characteristics};
use crate::{UtcDateTime, ValidationError};

/// A reference property used to derive pricing for the target.
///
/// Records arrive from the normalization collaborator and may still be
/// structurally incomplete (absent price or area); the engine rejects such
/// records at the boundary with a per-item diagnostic instead of failing the
/// whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableProperty {
    pub id: String,
    /// Price in currency minor units.
    #[serde(default)]
    pub price: Option<u64>,
    /// Total area in square meters.
    #[serde(default)]
    pub total_area: Option<f64>,
    #[serde(default)]
    pub characteristics: Characteristics,
    /// User-controlled inclusion flag; excluded records stay visible in
    /// diagnostics.
    #[serde(default = "default_included")]
    pub included: bool,
}

const fn default_included() -> bool {
    true
}

impl ComparableProperty {
    /// Build a fully-populated comparable, validating the input contract.
    pub fn new(
        id: impl Into<String>,
        price: u64,
        total_area: f64,
        characteristics: Characteristics,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyPropertyId);
        }
        if price == 0 {
            return Err(ValidationError::MissingOrZeroPrice);
        }
        validate_area(total_area)?;
        let characteristics = normalize_characteristics(characteristics)?;

        Ok(Self {
            id,
            price: Some(price),
            total_area: Some(total_area),
            characteristics,
            included: true,
        })
    }

    /// Mark the record excluded by the user.
    pub fn excluded_by_user(mut self) -> Self {
        self.included = false;
        self
    }

    /// Check the input contract on a record that may have arrived over the
    /// wire. Returns the first violation, if any.
    pub fn contract_violation(&self) -> Option<ValidationError> {
        if self.id.trim().is_empty() {
            return Some(ValidationError::EmptyPropertyId);
        }
        match self.price {
            None | Some(0) => return Some(ValidationError::MissingOrZeroPrice),
            Some(_) => {}
        }
        match self.total_area {
            Some(area) if area.is_finite() && area > 0.0 => {}
            _ => return Some(ValidationError::InvalidArea),
        }
        None
    }

    /// Price per square meter; `None` until the contract holds.
    pub fn price_per_area(&self) -> Option<f64> {
        let price = self.price? as f64;
        let area = self.total_area?;
        if !area.is_finite() || area <= 0.0 {
            return None;
        }
        Some(price / area)
    }
}

/// The property being valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProperty {
    pub id: String,
    /// Total area in square meters.
    pub total_area: f64,
    #[serde(default)]
    pub characteristics: Characteristics,
    /// Original purchase price in currency minor units, for holding-cost
    /// and profit math.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<UtcDateTime>,
}

impl TargetProperty {
    pub fn new(
        id: impl Into<String>,
        total_area: f64,
        characteristics: Characteristics,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyPropertyId);
        }
        validate_area(total_area)?;
        let characteristics = normalize_characteristics(characteristics)?;

        Ok(Self {
            id,
            total_area,
            characteristics,
            purchase_price: None,
            purchase_date: None,
        })
    }

    pub fn with_purchase(
        mut self,
        price: u64,
        date: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        if price == 0 {
            return Err(ValidationError::MissingOrZeroPrice);
        }
        self.purchase_price = Some(price);
        self.purchase_date = Some(date);
        Ok(self)
    }

    /// Apply a user-editable characteristic override.
    pub fn with_override(
        mut self,
        category: CharacteristicCategory,
        value: &str,
    ) -> Result<Self, ValidationError> {
        let value = normalize_value(category, value)?;
        self.characteristics.insert(category, value);
        Ok(self)
    }

    pub fn contract_violation(&self) -> Option<ValidationError> {
        if self.id.trim().is_empty() {
            return Some(ValidationError::EmptyPropertyId);
        }
        if !self.total_area.is_finite() || self.total_area <= 0.0 {
            return Some(ValidationError::InvalidArea);
        }
        None
    }
}

fn validate_area(area: f64) -> Result<(), ValidationError> {
    if !area.is_finite() || area <= 0.0 {
        return Err(ValidationError::InvalidArea);
    }
    Ok(())
}

fn normalize_characteristics(
    characteristics: Characteristics,
) -> Result<Characteristics, ValidationError> {
    characteristics
        .into_iter()
        .map(|(category, value)| Ok((category, normalize_value(category, &value)?)))
        .collect()
}

/// Validate and normalize currency to an uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}
