//! TTL-cached rate provider with stale-if-error fallback.

use std::sync::Arc;
use std::time::Duration;

use crate::rate::retry::RetryConfig;
use crate::rate::source::{RateError, RateObservation, RateSource};
use crate::rate::{MarketRate, RateProvenance, RateSourceId, RefreshMode};
use crate::UtcDateTime;

/// Annual rate used when the source fails and the cache is empty.
pub const DEFAULT_ANNUAL_RATE: f64 = 0.10;

/// Provider tuning.
#[derive(Debug, Clone)]
pub struct RateProviderConfig {
    /// How long a fetched rate is served without a refresh.
    pub ttl: Duration,
    /// Bound on a single fetch attempt.
    pub fetch_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for RateProviderConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            fetch_timeout: Duration::from_secs(3),
            retry: RetryConfig::default(),
        }
    }
}

/// One rate lookup: the rate plus whether it was served from cache without
/// touching the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLookup {
    pub rate: MarketRate,
    pub cache_hit: bool,
}

/// Caching provider in front of a [`RateSource`].
///
/// The cache is a single slot behind a `tokio::sync::RwLock`: many
/// concurrent analyses read it; one refreshes it on expiry. A lookup never
/// fails: a refresh error resolves to the last-known-good value
/// (provenance `stale`) or, with an empty cache, to [`DEFAULT_ANNUAL_RATE`]
/// (provenance `default`).
pub struct MarketRateProvider {
    source: Arc<dyn RateSource>,
    config: RateProviderConfig,
    cache: tokio::sync::RwLock<Option<MarketRate>>,
}

impl MarketRateProvider {
    pub fn new(source: Arc<dyn RateSource>, config: RateProviderConfig) -> Self {
        Self {
            source,
            config,
            cache: tokio::sync::RwLock::new(None),
        }
    }

    pub fn with_default_config(source: Arc<dyn RateSource>) -> Self {
        Self::new(source, RateProviderConfig::default())
    }

    /// Look up the rate with the default cache behavior.
    pub async fn get_rate(&self) -> RateLookup {
        self.get_rate_with_mode(RefreshMode::Use).await
    }

    /// Look up the rate under an explicit cache mode.
    pub async fn get_rate_with_mode(&self, mode: RefreshMode) -> RateLookup {
        if mode == RefreshMode::Use {
            let cache = self.cache.read().await;
            if let Some(rate) = cache.as_ref().filter(|rate| self.is_fresh(rate)) {
                return RateLookup {
                    rate: *rate,
                    cache_hit: true,
                };
            }
        }

        if mode == RefreshMode::Bypass {
            return RateLookup {
                rate: self.fetch_or_fallback(None).await,
                cache_hit: false,
            };
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while this one waited for the
        // write lock.
        if mode == RefreshMode::Use {
            if let Some(rate) = cache.as_ref().filter(|rate| self.is_fresh(rate)) {
                return RateLookup {
                    rate: *rate,
                    cache_hit: true,
                };
            }
        }

        let rate = self.fetch_or_fallback(*cache).await;
        if rate.provenance == RateProvenance::Fresh {
            *cache = Some(rate);
        }

        RateLookup {
            rate,
            cache_hit: false,
        }
    }

    /// The cached rate, if any, regardless of freshness.
    pub async fn cached(&self) -> Option<MarketRate> {
        *self.cache.read().await
    }

    fn is_fresh(&self, rate: &MarketRate) -> bool {
        if self.config.ttl.is_zero() {
            return false;
        }
        let elapsed = UtcDateTime::now().into_inner() - rate.fetched_at.into_inner();
        elapsed >= time::Duration::ZERO
            && elapsed.unsigned_abs() < self.config.ttl
    }

    async fn fetch_or_fallback(&self, last_known_good: Option<MarketRate>) -> MarketRate {
        match self.fetch_with_retry().await {
            Ok(observation) => {
                let now = UtcDateTime::now();
                MarketRate {
                    annual_rate: observation.annual_rate,
                    as_of: observation.as_of,
                    source: self.source.id(),
                    fetched_at: now,
                    provenance: RateProvenance::Fresh,
                }
            }
            Err(_) => match last_known_good {
                Some(cached) => MarketRate {
                    provenance: RateProvenance::Stale,
                    ..cached
                },
                None => {
                    let now = UtcDateTime::now();
                    MarketRate {
                        annual_rate: DEFAULT_ANNUAL_RATE,
                        as_of: now,
                        source: RateSourceId::Fallback,
                        fetched_at: now,
                        provenance: RateProvenance::Default,
                    }
                }
            },
        }
    }

    async fn fetch_with_retry(&self) -> Result<RateObservation, RateError> {
        let attempts = if self.config.retry.enabled {
            self.config.retry.max_retries + 1
        } else {
            1
        };

        let mut last_error = RateError::unavailable("rate source never attempted");
        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry.delay_for_attempt(attempt - 1)).await;
            }

            match tokio::time::timeout(self.config.fetch_timeout, self.source.fetch()).await {
                Ok(Ok(observation)) => return Ok(observation),
                Ok(Err(error)) => {
                    let retryable = error.retryable();
                    last_error = error;
                    if !retryable {
                        break;
                    }
                }
                Err(_) => {
                    last_error = RateError::timeout(format!(
                        "rate fetch exceeded {}ms",
                        self.config.fetch_timeout.as_millis()
                    ));
                }
            }
        }

        Err(last_error)
    }
}
