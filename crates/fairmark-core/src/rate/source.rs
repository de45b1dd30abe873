//! Rate source contract and the deterministic in-process source.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::rate::RateSourceId;
use crate::UtcDateTime;

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateErrorKind {
    Unavailable,
    Timeout,
    MalformedResponse,
    InvalidRate,
}

/// Structured error returned by a rate source.
///
/// The provider treats every variant as non-fatal: retryable errors get the
/// bounded retry loop, and anything that survives it falls back to the
/// cached or default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateError {
    kind: RateErrorKind,
    message: String,
    retryable: bool,
}

impl RateError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: RateErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: RateErrorKind::Timeout,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self {
            kind: RateErrorKind::MalformedResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_rate(message: impl Into<String>) -> Self {
        Self {
            kind: RateErrorKind::InvalidRate,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> RateErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            RateErrorKind::Unavailable => "rate.unavailable",
            RateErrorKind::Timeout => "rate.timeout",
            RateErrorKind::MalformedResponse => "rate.malformed_response",
            RateErrorKind::InvalidRate => "rate.invalid_rate",
        }
    }
}

impl Display for RateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for RateError {}

/// One observation from a rate source: the annual rate and the date it
/// applies from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub annual_rate: f64,
    pub as_of: UtcDateTime,
}

impl RateObservation {
    pub fn new(annual_rate: f64, as_of: UtcDateTime) -> Result<Self, RateError> {
        if !annual_rate.is_finite() || annual_rate < 0.0 || annual_rate > 2.0 {
            return Err(RateError::invalid_rate(format!(
                "annual rate out of the plausible range [0, 2]: {annual_rate}"
            )));
        }
        Ok(Self {
            annual_rate,
            as_of,
        })
    }
}

/// Rate source adapter contract.
///
/// Implementations must be `Send + Sync`; the provider shares them across
/// concurrent analyses.
pub trait RateSource: Send + Sync {
    /// Returns the source identifier used for provenance tagging.
    fn id(&self) -> RateSourceId;

    /// Fetches the current rate observation.
    ///
    /// # Errors
    ///
    /// Returns [`RateError`] when the source is unreachable, times out, or
    /// returns an unusable payload. The provider never surfaces these to the
    /// analysis; they resolve to a stale or default rate instead.
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RateObservation, RateError>> + Send + 'a>>;
}

/// Deterministic in-process source for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    observation: RateObservation,
}

impl StaticRateSource {
    pub fn new(observation: RateObservation) -> Self {
        Self { observation }
    }

    /// A 10% annual rate stamped with the current time.
    pub fn with_default_rate() -> Self {
        let now = UtcDateTime::now();
        Self {
            observation: RateObservation {
                annual_rate: 0.10,
                as_of: now,
            },
        }
    }
}

impl RateSource for StaticRateSource {
    fn id(&self) -> RateSourceId {
        RateSourceId::Static
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RateObservation, RateError>> + Send + 'a>> {
        let observation = self.observation;
        Box::pin(async move { Ok(observation) })
    }
}
