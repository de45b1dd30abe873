//! # Domain Models
//!
//! Canonical property records for the fair-price engine.
//!
//! All types are strongly typed with construction-time validation and full
//! serde support. Records that arrive over the wire (from the normalization
//! collaborator) may still be structurally incomplete; the boundary contract
//! check ([`ComparableProperty::contract_violation`]) converts those into
//! per-item diagnostics instead of request failures.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ComparableProperty`] | Reference listing with price, area, characteristics |
//! | [`TargetProperty`] | The property being valued, plus purchase history |
//! | [`CharacteristicCategory`] | Closed set of recognized characteristics |
//! | [`Mutability`] | Fixed (structural) vs. variable (improvable) split |
//! | [`UtcDateTime`] | UTC RFC3339 timestamp |

mod characteristics;
mod property;
mod timestamp;

pub use characteristics::{
    normalize_value, CharacteristicCategory, Characteristics, Mutability,
};
pub use property::{validate_currency_code, ComparableProperty, TargetProperty};
pub use timestamp::UtcDateTime;
