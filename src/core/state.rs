//! # Connection state machine.
//!
//! ```text
//!            start                 open ok
//! Disconnected ──► Connecting ─────────────► Connected
//!   ▲   Closed ──►    │  ▲                    │   │
//!   │                 │  │ backoff elapsed    │   │ clean close
//!   │     open failed │  │                    │   ▼
//!   │                 ▼  │       link down    │  Disconnected
//!   │              Reconnecting ◄─────────────┘
//!   │                                   (retries left)
//!   └── gave up (from Connecting or Connected)
//!
//! stop(): any non-Closed state ──► Closed
//! ```
//!
//! [`StateCell`] is the single owner of the current value. It wraps a
//! `tokio::sync::watch` sender so readers can query or await states, and it
//! publishes exactly one [`EventKind::StateChanged`] per accepted transition.

use std::fmt;

use tokio::sync::watch;

use crate::events::{Bus, Event, EventKind};

/// Lifecycle state of the single logical connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No link and no attempt in progress.
    Disconnected,
    /// Opening a link.
    Connecting,
    /// Link established; inbound frames are dispatched.
    Connected,
    /// Waiting out a backoff delay before the next attempt.
    Reconnecting,
    /// Stopped by the caller.
    Closed,
}

impl ConnectionState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Closed => "closed",
        }
    }

    /// `true` for the states a new lifecycle may start from.
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, ConnectionState::Disconnected | ConnectionState::Closed)
    }

    /// Returns whether `self → to` is an edge of the state machine.
    pub fn can_transition_to(&self, to: ConnectionState) -> bool {
        use ConnectionState::*;

        match (*self, to) {
            (Closed, Closed) => false,
            (_, Closed) => true,
            (Disconnected | Closed, Connecting) => true,
            (Connecting, Connected | Reconnecting | Disconnected) => true,
            (Connected, Reconnecting | Disconnected) => true,
            (Reconnecting, Connecting) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Owner of the current [`ConnectionState`].
pub(crate) struct StateCell {
    tx: watch::Sender<ConnectionState>,
    bus: Bus,
}

impl StateCell {
    pub(crate) fn new(bus: Bus) -> Self {
        let (tx, _rx) = watch::channel(ConnectionState::Disconnected);
        Self { tx, bus }
    }

    #[inline]
    pub(crate) fn current(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }

    /// Applies `to` if it is a valid edge from the current state.
    ///
    /// Returns the previous state on success. Invalid edges are logged and
    /// ignored; they indicate a bug in the caller, not a runtime condition.
    pub(crate) fn transition(&self, to: ConnectionState) -> Option<ConnectionState> {
        let mut from = None;
        self.tx.send_if_modified(|state| {
            if !state.can_transition_to(to) {
                return false;
            }
            from = Some(*state);
            *state = to;
            true
        });

        match from {
            Some(prev) => {
                tracing::debug!(from = %prev, to = %to, "connection state changed");
                self.bus.publish(Event::state_changed(prev, to));
                Some(prev)
            }
            None => {
                tracing::error!(
                    from = %self.current(),
                    to = %to,
                    "rejected invalid state transition"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    const ALL: [ConnectionState; 5] = [Disconnected, Connecting, Connected, Reconnecting, Closed];

    #[test]
    fn test_closed_reachable_from_every_live_state() {
        for s in ALL {
            assert_eq!(s.can_transition_to(Closed), s != Closed, "{s} -> closed");
        }
    }

    #[test]
    fn test_start_only_from_idle_states() {
        for s in ALL {
            assert_eq!(s.can_transition_to(Connecting), s.is_idle() || s == Reconnecting, "{s}");
        }
    }

    #[test]
    fn test_connected_only_after_connecting() {
        for s in ALL {
            assert_eq!(s.can_transition_to(Connected), s == Connecting, "{s}");
        }
    }

    #[tokio::test]
    async fn test_cell_publishes_one_event_per_transition() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let cell = StateCell::new(bus);

        assert_eq!(cell.transition(Connecting), Some(Disconnected));
        assert_eq!(cell.transition(Connected), Some(Connecting));
        assert_eq!(cell.transition(Connecting), None);
        assert_eq!(cell.current(), Connected);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::StateChanged);
        assert_eq!(first.previous, Some(Disconnected));
        assert_eq!(first.state, Some(Connecting));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.state, Some(Connected));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watchers_observe_latest_state() {
        let cell = StateCell::new(Bus::new(4));
        let watcher = cell.watch();
        cell.transition(Connecting);
        cell.transition(Closed);
        assert_eq!(*watcher.borrow(), Closed);
    }
}
