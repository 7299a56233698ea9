//! # Handler registry.
//!
//! Maps each [`EventName`] to its handlers in registration order.
//!
//! ## Architecture
//! ```text
//! Client::on / once ──► insert(name, handler) ──► HandlerToken { name, seq }
//! Client::off       ──► remove(token)               (idempotent)
//! Dispatcher        ──► snapshot(name) ──► Vec<(seq, HandlerRef)>
//!                                           (once-entries removed here)
//! ```
//!
//! ## Rules
//! - Sequence numbers are allocated under the write lock, so each per-name
//!   list is always sorted by `seq` (FIFO dispatch order).
//! - Dispatch runs on a snapshot taken before any handler is invoked: handlers
//!   may call `on`/`off` without deadlocking, and changes apply from the next
//!   message on.
//! - Empty per-name lists are removed.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::codec::EventName;
use crate::handlers::HandlerRef;

/// Token returned by registration, used to remove the handler again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerToken {
    event: EventName,
    seq: u64,
}

impl HandlerToken {
    /// Event the handler was registered for.
    pub fn event(&self) -> &EventName {
        &self.event
    }

    /// Registration sequence number (dispatch order within one event).
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

struct HandlerEntry {
    seq: u64,
    once: bool,
    handler: HandlerRef,
}

#[derive(Default)]
struct Entries {
    next_seq: u64,
    by_event: HashMap<EventName, Vec<HandlerEntry>>,
}

/// Event name → ordered handlers.
#[derive(Default)]
pub(crate) struct Registry {
    entries: RwLock<Entries>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` under `event`.
    pub(crate) async fn insert(
        &self,
        event: EventName,
        handler: HandlerRef,
        once: bool,
    ) -> HandlerToken {
        let mut entries = self.entries.write().await;
        entries.next_seq += 1;
        let seq = entries.next_seq;
        entries
            .by_event
            .entry(event.clone())
            .or_default()
            .push(HandlerEntry { seq, once, handler });
        HandlerToken { event, seq }
    }

    /// Removes the entry for `token`; returns whether one was present.
    pub(crate) async fn remove(&self, token: &HandlerToken) -> bool {
        let mut entries = self.entries.write().await;
        let Some(list) = entries.by_event.get_mut(token.event.as_str()) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.seq != token.seq);
        let removed = list.len() != before;
        if list.is_empty() {
            entries.by_event.remove(token.event.as_str());
        }
        removed
    }

    /// Handlers for `event` in registration order.
    ///
    /// One-shot entries are removed from the registry as part of the snapshot,
    /// so each is returned at most once.
    pub(crate) async fn snapshot(&self, event: &str) -> Vec<(u64, HandlerRef)> {
        {
            let entries = self.entries.read().await;
            match entries.by_event.get(event) {
                None => return Vec::new(),
                Some(list) if !list.iter().any(|e| e.once) => {
                    return list.iter().map(|e| (e.seq, e.handler.clone())).collect();
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        let Some(list) = entries.by_event.get_mut(event) else {
            return Vec::new();
        };
        let handlers = list.iter().map(|e| (e.seq, e.handler.clone())).collect();
        list.retain(|e| !e.once);
        if list.is_empty() {
            entries.by_event.remove(event);
        }
        handlers
    }

    /// Number of handlers currently registered for `event`.
    pub(crate) async fn count(&self, event: &str) -> usize {
        self.entries
            .read()
            .await
            .by_event
            .get(event)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Payload;
    use crate::handlers::HandlerFn;

    fn noop() -> HandlerRef {
        HandlerFn::arc(|_: Payload| async { Ok(()) })
    }

    fn name(s: &str) -> EventName {
        EventName::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_is_in_registration_order() {
        let reg = Registry::new();
        let a = reg.insert(name("tick"), noop(), false).await;
        reg.insert(name("other"), noop(), false).await;
        let b = reg.insert(name("tick"), noop(), false).await;

        let seqs: Vec<u64> = reg.snapshot("tick").await.into_iter().map(|(s, _)| s).collect();
        assert_eq!(seqs, vec![a.seq(), b.seq()]);
        assert!(a.seq() < b.seq());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let reg = Registry::new();
        let keep = reg.insert(name("tick"), noop(), false).await;
        let gone = reg.insert(name("tick"), noop(), false).await;

        assert!(reg.remove(&gone).await);
        assert!(!reg.remove(&gone).await);
        assert_eq!(reg.count("tick").await, 1);

        assert!(reg.remove(&keep).await);
        assert_eq!(reg.count("tick").await, 0);
        assert!(!reg.remove(&keep).await);
    }

    #[tokio::test]
    async fn test_once_entries_leave_on_first_snapshot() {
        let reg = Registry::new();
        let first = reg.insert(name("c-player"), noop(), true).await;
        let steady = reg.insert(name("c-player"), noop(), false).await;

        let seqs: Vec<u64> = reg.snapshot("c-player").await.into_iter().map(|(s, _)| s).collect();
        assert_eq!(seqs, vec![first.seq(), steady.seq()]);

        let seqs: Vec<u64> = reg.snapshot("c-player").await.into_iter().map(|(s, _)| s).collect();
        assert_eq!(seqs, vec![steady.seq()]);
        assert!(!reg.remove(&first).await);
    }

    #[tokio::test]
    async fn test_unknown_event_is_empty() {
        let reg = Registry::new();
        assert!(reg.snapshot("nobody-listens").await.is_empty());
    }
}
