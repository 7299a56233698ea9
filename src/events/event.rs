//! # Lifecycle and diagnostic events published by the client.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Lifecycle**: state transitions, connect failures, link drops, backoff, giving up
//! - **Dispatch**: handler faults and dropped inbound frames
//! - **Subscriber**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries timestamps and optional metadata.
//!
//! ## Ordering guarantees
//! Each event has a process-wide sequence number (`seq`) that increases
//! monotonically; use it to restore order when subscribers see events late.
//!
//! ## Example
//! ```rust
//! use evlink::{ConnectionState, Event, EventKind};
//!
//! let ev = Event::state_changed(ConnectionState::Connecting, ConnectionState::Connected);
//! assert_eq!(ev.kind, EventKind::StateChanged);
//! assert_eq!(ev.state, Some(ConnectionState::Connected));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::ConnectionState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of client events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle ===
    /// Connection state changed. Published exactly once per transition.
    ///
    /// Sets: `previous`, `state`.
    StateChanged,

    /// Opening the link failed.
    ///
    /// Sets: `attempt` (retry number, 0 for the initial attempt), `error`, `reason`.
    ConnectFailed,

    /// An established link dropped unexpectedly.
    ///
    /// Sets: `error`, `reason`.
    LinkLost,

    /// A reconnection attempt was scheduled.
    ///
    /// Sets: `attempt` (retry number), `delay_ms`, and `error`/`reason` of the
    /// failure that triggered it.
    BackoffScheduled,

    /// The reconnection policy gave up; the carried error is terminal.
    ///
    /// Sets: `attempt` (retries spent), `error`, `reason`.
    RetriesExhausted,

    // === Dispatch ===
    /// An application handler returned an error, panicked or timed out.
    ///
    /// Sets: `event`, `handler`, `error`, `reason`.
    HandlerFault,

    /// An inbound frame was discarded (undecodable, or arrived while not connected).
    ///
    /// Sets: `error` (for decode failures), `reason`.
    MessageDropped,

    // === Subscribers ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `subscriber`, `reason`.
    SubscriberPanicked,

    /// Subscriber queue was full or closed; the event was dropped for it.
    ///
    /// Sets: `subscriber`, `reason`.
    SubscriberOverflow,
}

/// Client event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// State after the transition.
    pub state: Option<ConnectionState>,
    /// State before the transition.
    pub previous: Option<ConnectionState>,
    /// Retry number (see [`EventKind`] for meaning per kind).
    pub attempt: Option<u32>,
    /// Backoff delay in milliseconds.
    pub delay_ms: Option<u32>,
    /// Application event name involved.
    pub event: Option<Arc<str>>,
    /// Registration sequence of the faulting handler.
    pub handler: Option<u64>,
    /// Subscriber name (overflow/panic events).
    pub subscriber: Option<&'static str>,
    /// Stable error label (`as_label()` of the underlying error).
    pub error: Option<&'static str>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            state: None,
            previous: None,
            attempt: None,
            delay_ms: None,
            event: None,
            handler: None,
            subscriber: None,
            error: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a stable error label.
    #[inline]
    pub fn with_error(mut self, label: &'static str) -> Self {
        self.error = Some(label);
        self
    }

    /// Attaches an application event name.
    #[inline]
    pub fn with_event(mut self, name: impl Into<Arc<str>>) -> Self {
        self.event = Some(name.into());
        self
    }

    /// Attaches a retry number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches the registration sequence of a handler.
    #[inline]
    pub fn with_handler(mut self, seq: u64) -> Self {
        self.handler = Some(seq);
        self
    }

    /// Creates a state transition event.
    #[inline]
    pub fn state_changed(from: ConnectionState, to: ConnectionState) -> Self {
        let mut ev = Event::new(EventKind::StateChanged);
        ev.previous = Some(from);
        ev.state = Some(to);
        ev
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"));
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Returns the delay as a [`Duration`], if set.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::LinkLost);
        let b = Event::new(EventKind::LinkLost);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates_at_u32_millis() {
        let ev = Event::new(EventKind::BackoffScheduled)
            .with_delay(Duration::from_secs(u64::MAX / 4));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
        assert_eq!(
            Event::new(EventKind::BackoffScheduled)
                .with_delay(Duration::from_millis(1500))
                .delay(),
            Some(Duration::from_millis(1500))
        );
    }
}
