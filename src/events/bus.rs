//! # Event bus for broadcasting client events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. The state cell,
//! connection actor, dispatcher and subscriber workers publish into it; the
//! client's subscriber listener and any [`Client::subscribe`](crate::Client::subscribe)
//! receivers consume it.
//!
//! ```text
//! StateCell  ──┐
//! Actor      ──┼──► Bus ──┬──► subscriber_listener ──► SubscriberSet
//! Dispatcher ──┘          └──► Client::subscribe() receivers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest events.
//! - **No persistence**: events published with no receivers are lost.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for client events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to a minimum of 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers (dropped if there are none).
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
