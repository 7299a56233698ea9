//! # Reconnection policy.
//!
//! [`ReconnectPolicy`] decides, after a connect failure or an unexpected link
//! drop, whether the client schedules another attempt and how long it waits.
//!
//! ```text
//! failure ──► decide(retries_so_far)
//!               ├─ reconnect disabled            ─► GiveUp
//!               ├─ retries_so_far >= max_retries ─► GiveUp
//!               └─ otherwise                     ─► Retry { retry: n+1,
//!                                                           delay: backoff(n+1) }
//! ```
//!
//! The retry counter lives in the connection actor and is reset to zero on
//! every successful connect.

use std::time::Duration;

use crate::policies::backoff::BackoffPolicy;

/// Whether and how the client reconnects after a failure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconnectPolicy {
    /// Reconnect at all (`false` gives up on the first failure).
    pub enabled: bool,
    /// Maximum consecutive retries (`None` = unbounded).
    pub max_retries: Option<u32>,
    /// Delay schedule between retries.
    pub backoff: BackoffPolicy,
}

/// Outcome of [`ReconnectPolicy::decide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Schedule retry number `retry` (1-based) after `delay`.
    Retry {
        /// Retry number, counted since the last successful connect.
        retry: u32,
        /// Wait before the attempt.
        delay: Duration,
    },
    /// Stop reconnecting; the failure is terminal.
    GiveUp,
}

impl Default for ReconnectPolicy {
    /// Enabled, unbounded retries, default backoff.
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: None,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl ReconnectPolicy {
    /// Decides what follows a failure, given the retries already spent.
    pub fn decide(&self, retries_so_far: u32) -> ReconnectDecision {
        if !self.enabled {
            return ReconnectDecision::GiveUp;
        }
        if let Some(max) = self.max_retries {
            if retries_so_far >= max {
                return ReconnectDecision::GiveUp;
            }
        }
        let retry = retries_so_far.saturating_add(1);
        ReconnectDecision::Retry {
            retry,
            delay: self.backoff.delay_for_retry(retry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::JitterPolicy;

    fn policy(max_retries: Option<u32>) -> ReconnectPolicy {
        ReconnectPolicy {
            enabled: true,
            max_retries,
            backoff: BackoffPolicy {
                first: Duration::from_millis(100),
                max: Duration::from_millis(1_000),
                factor: 2.0,
                jitter: JitterPolicy::None,
            },
        }
    }

    #[test]
    fn test_disabled_gives_up_immediately() {
        let p = ReconnectPolicy {
            enabled: false,
            ..policy(None)
        };
        assert_eq!(p.decide(0), ReconnectDecision::GiveUp);
    }

    #[test]
    fn test_bounded_retries_give_up_after_max() {
        let p = policy(Some(2));
        assert_eq!(
            p.decide(0),
            ReconnectDecision::Retry {
                retry: 1,
                delay: Duration::from_millis(100)
            }
        );
        assert_eq!(
            p.decide(1),
            ReconnectDecision::Retry {
                retry: 2,
                delay: Duration::from_millis(200)
            }
        );
        assert_eq!(p.decide(2), ReconnectDecision::GiveUp);
    }

    #[test]
    fn test_zero_max_retries_never_retries() {
        assert_eq!(policy(Some(0)).decide(0), ReconnectDecision::GiveUp);
    }

    #[test]
    fn test_unbounded_keeps_retrying_at_cap() {
        let p = policy(None);
        assert_eq!(
            p.decide(10_000),
            ReconnectDecision::Retry {
                retry: 10_001,
                delay: Duration::from_millis(1_000)
            }
        );
    }
}
