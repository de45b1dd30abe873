//! Market-rate provider: cached external interest/opportunity-cost rate.
//!
//! The provider sits between the scenario stage and the external rate
//! source. A fresh cache entry is served as-is; a miss triggers a bounded
//! refresh; a refresh failure falls back to the last-known-good value or,
//! with an empty cache, to a documented default. Every returned rate is
//! tagged with its provenance so diagnostics can tell the three apart.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RateSource`] | Adapter contract for external rate sources |
//! | [`HttpRateSource`] | `reqwest`-backed JSON source |
//! | [`StaticRateSource`] | Deterministic in-process source |
//! | [`MarketRateProvider`] | TTL cache with stale-if-error fallback |
//! | [`MarketRate`] | The rate value plus provenance tags |

mod http;
mod provider;
mod retry;
mod source;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

pub use http::HttpRateSource;
pub use provider::{MarketRateProvider, RateLookup, RateProviderConfig, DEFAULT_ANNUAL_RATE};
pub use retry::{Backoff, RetryConfig};
pub use source::{RateError, RateErrorKind, RateObservation, RateSource, StaticRateSource};

/// Identifies where a rate value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSourceId {
    /// External central-bank style HTTP endpoint.
    CentralBank,
    /// In-process deterministic source.
    Static,
    /// The hardcoded fallback used when no source value is available.
    Fallback,
}

impl RateSourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CentralBank => "central_bank",
            Self::Static => "static",
            Self::Fallback => "fallback",
        }
    }
}

impl Display for RateSourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the returned rate value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateProvenance {
    /// Served from a live fetch or a cache entry within its TTL.
    Fresh,
    /// The refresh failed; this is the last-known-good cached value.
    Stale,
    /// No source value was ever obtained; this is the built-in default.
    Default,
}

/// Annual opportunity-cost rate used for scenario projections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRate {
    /// Annual rate as a fraction (0.16 = 16% per year).
    pub annual_rate: f64,
    /// The date the source says the rate applies from.
    pub as_of: UtcDateTime,
    pub source: RateSourceId,
    /// When this process obtained the value; identical across cache hits.
    pub fetched_at: UtcDateTime,
    pub provenance: RateProvenance,
}

/// Cache behavior for one rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// Serve a non-expired cache entry; fetch and cache otherwise.
    #[default]
    Use,
    /// Fetch even when a fresh entry exists, then cache the new value.
    Refresh,
    /// Fetch without reading or writing the cache.
    Bypass,
}
