use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// RFC3339 timestamp guaranteed to be UTC.
///
/// Rate timestamps and envelope metadata only ever carry UTC instants;
/// anything with a non-zero offset is rejected at the boundary instead of
/// being silently converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let rejected = || ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        };

        let instant = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| rejected())?;
        Self::from_offset_datetime(instant).map_err(|_| rejected())
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Result<Self, ValidationError> {
        if value.offset() == UtcOffset::UTC {
            return Ok(Self(value));
        }
        Err(ValidationError::TimestampNotUtc {
            value: value
                .format(&Rfc3339)
                .unwrap_or_else(|_| String::from("<unformattable>")),
        })
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// Whole days elapsed between `earlier` and `self`; zero when `earlier`
    /// is in the future.
    pub fn days_since(self, earlier: Self) -> u32 {
        let elapsed = self.0 - earlier.0;
        if elapsed < Duration::ZERO {
            return 0;
        }
        elapsed.whole_days() as u32
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_utc_timestamp() {
        let parsed = UtcDateTime::parse("2025-06-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.to_string(), "2025-06-01T00:00:00Z");
    }

    #[test]
    fn rejects_offsets_other_than_utc() {
        for input in ["2025-06-01T03:00:00+03:00", "2025-06-01T00:00:00-05:00"] {
            let err = UtcDateTime::parse(input).expect_err("offset must be rejected");
            assert!(matches!(err, ValidationError::TimestampNotUtc { .. }));
        }
    }

    #[test]
    fn days_since_clamps_future_reference() {
        let earlier = UtcDateTime::parse("2025-06-01T00:00:00Z").expect("must parse");
        let later = UtcDateTime::parse("2025-06-11T12:00:00Z").expect("must parse");

        assert_eq!(later.days_since(earlier), 10);
        assert_eq!(earlier.days_since(later), 0);
    }

    #[test]
    fn serde_uses_the_rfc3339_string_form() {
        let parsed = UtcDateTime::parse("2025-06-01T00:00:00Z").expect("must parse");

        let json = serde_json::to_string(&parsed).expect("must serialize");
        assert_eq!(json, r#""2025-06-01T00:00:00Z""#);

        let back: UtcDateTime = serde_json::from_str(&json).expect("must deserialize");
        assert_eq!(back, parsed);
    }
}
