//! # Backoff between reconnection attempts.
//!
//! [`BackoffPolicy`] controls how the wait before each reconnection attempt grows.
//! It is parameterized by:
//! - [`BackoffPolicy::first`] the delay before the first retry (`backoffInitialMs`);
//! - [`BackoffPolicy::max`] the cap (`backoffMaxMs`);
//! - [`BackoffPolicy::factor`] the growth multiplier (`backoffMultiplier`).
//!
//! The delay for retry `k` (1-based) is `min(max, first × factor^(k-1))`, then
//! jitter is applied. The base is derived purely from `k`, so jitter output never
//! feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use evlink::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(1),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay_for_retry(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay_for_retry(3), Duration::from_millis(400));
//! assert_eq!(backoff.delay_for_retry(10), Duration::from_secs(1));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Reconnection backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Randomization applied on top of the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// `first = 1s`, `max = 5s`, `factor = 2.0`, no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(1000),
            max: Duration::from_millis(5000),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for a 0-indexed exponent.
    ///
    /// The base is `first × factor^exponent`, clamped to [`BackoffPolicy::max`];
    /// non-finite or negative products clamp to `max` as well.
    pub fn next(&self, exponent: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = exponent.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }

    /// Delay before retry `retry` (1-based): `min(max, first × factor^(retry-1))`.
    ///
    /// `retry = 0` is treated as the first retry.
    #[inline]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.next(retry.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(first_ms: u64, max_ms: u64, factor: f64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_millis(max_ms),
            factor,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn test_retry_delay_matches_formula() {
        let p = policy(250, 60_000, 3.0);
        for k in 1..=6u32 {
            let expected = (250.0 * 3.0f64.powi(k as i32 - 1)).min(60_000.0);
            assert_eq!(
                p.delay_for_retry(k),
                Duration::from_millis(expected as u64),
                "retry {k}"
            );
        }
    }

    #[test]
    fn test_default_doubles_until_cap() {
        let p = BackoffPolicy::default();
        assert_eq!(p.delay_for_retry(1), Duration::from_secs(1));
        assert_eq!(p.delay_for_retry(2), Duration::from_secs(2));
        assert_eq!(p.delay_for_retry(3), Duration::from_secs(4));
        assert_eq!(p.delay_for_retry(4), Duration::from_secs(5));
        assert_eq!(p.delay_for_retry(40), Duration::from_secs(5));
    }

    #[test]
    fn test_retry_zero_behaves_like_first() {
        let p = policy(100, 1_000, 2.0);
        assert_eq!(p.delay_for_retry(0), p.delay_for_retry(1));
    }

    #[test]
    fn test_constant_multiplier() {
        let p = policy(300, 10_000, 1.0);
        for k in 1..20 {
            assert_eq!(p.delay_for_retry(k), Duration::from_millis(300));
        }
    }

    #[test]
    fn test_initial_above_cap_is_capped() {
        let p = policy(10_000, 2_000, 2.0);
        assert_eq!(p.delay_for_retry(1), Duration::from_secs(2));
    }

    #[test]
    fn test_overflow_clamps_to_max() {
        let p = policy(100, 10_000, 2.0);
        assert_eq!(p.next(u32::MAX), Duration::from_secs(10));
        assert_eq!(p.delay_for_retry(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_equal_jitter_stays_within_half_and_base() {
        let p = BackoffPolicy {
            jitter: JitterPolicy::Equal,
            ..policy(1_000, 30_000, 2.0)
        };
        for k in 1..10u32 {
            let base_ms = (1_000.0 * 2.0f64.powi(k as i32 - 1)).min(30_000.0) as u64;
            let delay = p.delay_for_retry(k);
            assert!(delay >= Duration::from_millis(base_ms / 2), "retry {k}: {delay:?}");
            assert!(delay <= Duration::from_millis(base_ms), "retry {k}: {delay:?}");
        }
    }

    #[test]
    fn test_decorrelated_jitter_respects_floor_and_cap() {
        let p = BackoffPolicy {
            jitter: JitterPolicy::Decorrelated,
            ..policy(100, 5_000, 2.0)
        };
        for _ in 0..100 {
            let delay = p.delay_for_retry(8);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(5_000));
        }
    }
}
