//! Bounded retry between rate refresh attempts.

use std::time::Duration;

/// Delay strategy between refresh attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// The same delay before every retry.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`. Jitter spreads the delay
    /// uniformly over 50%..150% so concurrent refreshes do not align.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay for a 0-based retry attempt.
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scaled = base.mul_f64(factor.powi(attempt as i32)).min(max);
                if !jitter {
                    return scaled;
                }
                scaled.mul_f64(0.5 + fastrand::f64())
            }
        }
    }
}

/// Retry budget for one rate refresh.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 2,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            backoff: Backoff::default(),
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_delay_ignores_the_attempt_number() {
        let backoff = Backoff::Fixed {
            delay: Duration::from_millis(150),
        };

        assert_eq!(backoff.delay(0), backoff.delay(9));
        assert_eq!(backoff.delay(0), Duration::from_millis(150));
    }

    #[test]
    fn exponential_delay_grows_until_the_cap() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_millis(500),
            jitter: false,
        };

        let delays: Vec<u128> = (0..4).map(|attempt| backoff.delay(attempt).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 500]);
    }

    #[test]
    fn jittered_delay_stays_inside_the_half_band() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: true,
        };

        for attempt in 0..4 {
            let nominal = (100.0 * 2f64.powi(attempt as i32)).min(1000.0);
            for _ in 0..20 {
                let observed = backoff.delay(attempt).as_secs_f64() * 1000.0;
                assert!(
                    (nominal * 0.49..=nominal * 1.51).contains(&observed),
                    "attempt {attempt}: {observed}ms outside the jitter band of {nominal}ms"
                );
            }
        }
    }

    #[test]
    fn no_retry_zeroes_the_budget() {
        let config = RetryConfig::no_retry();
        assert!(!config.enabled);
        assert_eq!(config.max_retries, 0);
    }
}
