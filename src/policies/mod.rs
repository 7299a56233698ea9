//! Reconnection policies.
//!
//! This module groups the knobs that control **whether** the client reconnects
//! after a failure and **how long** it waits between attempts.
//!
//! ## Contents
//! - [`ReconnectPolicy`] reconnect or give up (enabled / max retries)
//! - [`BackoffPolicy`]   how delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]    randomization to avoid synchronized reconnect storms
//!
//! ## Quick wiring
//! ```text
//! ClientConfig { reconnect, max_retries, backoff, .. }
//!      └─► ClientConfig::reconnect_policy()
//!           └─► core::actor::ConnectionActor uses decide(retries) after each failure
//! ```
//!
//! ## Defaults
//! - reconnect enabled, unbounded retries.
//! - `BackoffPolicy::default()` → first=1s, factor=2.0, max=5s, jitter=None.

mod backoff;
mod jitter;
mod reconnect;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use reconnect::{ReconnectDecision, ReconnectPolicy};
