//! # Client configuration.
//!
//! [`ClientConfig`] is passed to [`Client::start`](crate::Client::start) and
//! governs one connection lifecycle. [`ConnectOptions`] is its serde-facing
//! mirror, using the camelCase option names of the wire-level client API, so a
//! configuration can be read from JSON and converted with `From`.
//!
//! ## Sentinel values
//! - `max_retries = None` → unbounded retries
//! - `handler_timeout = 0s` → handlers are never timed out
//! - `stop_grace = 0s` → `stop()` aborts the actor if it is not already done
//!
//! ## Example
//! ```rust
//! use evlink::{ClientConfig, ConnectOptions};
//!
//! let opts: ConnectOptions =
//!     serde_json::from_str(r#"{"maxRetries": 2, "backoffInitialMs": 250}"#).unwrap();
//! let cfg = ClientConfig::from(opts);
//!
//! assert_eq!(cfg.max_retries, Some(2));
//! assert!(cfg.reconnect);
//! assert_eq!(cfg.backoff.first.as_millis(), 250);
//! assert_eq!(cfg.backoff.max.as_millis(), 5000);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policies::{BackoffPolicy, JitterPolicy, ReconnectPolicy};

/// Settings for one connection lifecycle.
///
/// All fields are public. Prefer the helper accessors over checking the
/// sentinels directly.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Reconnect after a failed open or a dropped link.
    ///
    /// With `false` the first failure is terminal.
    pub reconnect: bool,

    /// Maximum consecutive retries before giving up (`None` = unbounded).
    ///
    /// The counter resets on every successful connect.
    pub max_retries: Option<u32>,

    /// Delay schedule between retries.
    pub backoff: BackoffPolicy,

    /// Per-handler execution limit (`Duration::ZERO` = none).
    ///
    /// A handler exceeding it is reported as a fault and the next handler runs.
    pub handler_timeout: Duration,

    /// How long `stop()` waits for the connection actor before aborting it.
    pub stop_grace: Duration,
}

impl ClientConfig {
    /// Reconnection policy derived from `reconnect`, `max_retries` and `backoff`.
    #[inline]
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            enabled: self.reconnect,
            max_retries: self.max_retries,
            backoff: self.backoff,
        }
    }

    /// Returns the handler timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → each handler invocation is limited to `d`
    #[inline]
    pub fn handler_timeout(&self) -> Option<Duration> {
        if self.handler_timeout == Duration::ZERO {
            None
        } else {
            Some(self.handler_timeout)
        }
    }
}

impl Default for ClientConfig {
    /// Default configuration:
    ///
    /// - `reconnect = true`, `max_retries = None`
    /// - `backoff = 1s → ×2 → capped at 5s`, no jitter
    /// - `handler_timeout = 0s` (none)
    /// - `stop_grace = 5s`
    fn default() -> Self {
        Self {
            reconnect: true,
            max_retries: None,
            backoff: BackoffPolicy::default(),
            handler_timeout: Duration::ZERO,
            stop_grace: Duration::from_secs(5),
        }
    }
}

/// Connection options as accepted by `start` in the wire-level API.
///
/// Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectOptions {
    /// See [`ClientConfig::reconnect`].
    pub reconnect: bool,
    /// See [`ClientConfig::max_retries`].
    pub max_retries: Option<u32>,
    /// Delay before the first retry, in milliseconds.
    pub backoff_initial_ms: u64,
    /// Delay cap, in milliseconds.
    pub backoff_max_ms: u64,
    /// Growth factor between consecutive delays.
    pub backoff_multiplier: f64,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            reconnect: true,
            max_retries: None,
            backoff_initial_ms: 1000,
            backoff_max_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl From<ConnectOptions> for ClientConfig {
    fn from(opts: ConnectOptions) -> Self {
        Self {
            reconnect: opts.reconnect,
            max_retries: opts.max_retries,
            backoff: BackoffPolicy {
                first: Duration::from_millis(opts.backoff_initial_ms),
                max: Duration::from_millis(opts.backoff_max_ms),
                factor: opts.backoff_multiplier,
                jitter: JitterPolicy::None,
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_match_defaults() {
        let opts: ConnectOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ConnectOptions::default());
        assert_eq!(ClientConfig::from(opts), ClientConfig::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let opts: ConnectOptions = serde_json::from_str(
            r#"{"reconnect":false,"maxRetries":3,"backoffInitialMs":250,"backoffMaxMs":2000,"backoffMultiplier":3.0}"#,
        )
        .unwrap();
        let cfg = ClientConfig::from(opts);
        let policy = cfg.reconnect_policy();

        assert!(!policy.enabled);
        assert_eq!(policy.max_retries, Some(3));
        assert_eq!(policy.backoff.delay_for_retry(2), Duration::from_millis(750));
        assert_eq!(policy.backoff.delay_for_retry(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_zero_handler_timeout_means_none() {
        let mut cfg = ClientConfig::default();
        assert_eq!(cfg.handler_timeout(), None);
        cfg.handler_timeout = Duration::from_millis(200);
        assert_eq!(cfg.handler_timeout(), Some(Duration::from_millis(200)));
    }
}
