//! # Inbound dispatch.
//!
//! Turns one inbound frame into ordered handler invocations.
//!
//! ## Flow
//! ```text
//! dispatch(frame)
//!   ├─ state Disconnected/Closed ──► MessageDropped ("not connected")
//!   ├─ codec.decode(frame) ── Err ──► MessageDropped (codec label)
//!   └─ deliver(name, payload)
//!        └─ registry.snapshot(name)  (unknown name → nothing happens)
//!             └─ for each handler, sequentially:
//!                  ├─ Ok(())           → next
//!                  ├─ Err(HandlerError)→ HandlerFault → next
//!                  ├─ panic            → HandlerFault → next
//!                  └─ timeout          → HandlerFault → next
//! ```
//!
//! ## Rules
//! - Handlers for one message run **sequentially** in registration order.
//! - A fault is reported once (bus + `tracing`) and never stops sibling handlers.
//! - `deliver` is also used for synthetic lifecycle events; it performs no
//!   state check because the connection actor only calls it from live states.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::time;

use crate::codec::{Codec, Payload};
use crate::core::registry::Registry;
use crate::core::state::ConnectionState;
use crate::error::{ClientError, HandlerError};
use crate::events::{Bus, Event, EventKind};
use crate::handlers::HandlerRef;

/// Decodes frames and fans them out to registered handlers.
pub(crate) struct Dispatcher {
    registry: Arc<Registry>,
    codec: Arc<dyn Codec>,
    bus: Bus,
    state: watch::Receiver<ConnectionState>,
    handler_timeout: Option<Duration>,
}

impl Dispatcher {
    pub(crate) fn new(
        registry: Arc<Registry>,
        codec: Arc<dyn Codec>,
        bus: Bus,
        state: watch::Receiver<ConnectionState>,
        handler_timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            codec,
            bus,
            state,
            handler_timeout,
        }
    }

    /// Dispatches one inbound frame. Returns the number of handlers invoked.
    pub(crate) async fn dispatch(&self, frame: &[u8]) -> usize {
        let state = *self.state.borrow();
        if state.is_idle() {
            tracing::debug!(
                %state,
                len = frame.len(),
                "discarding frame received while not connected"
            );
            self.bus.publish(
                Event::new(EventKind::MessageDropped)
                    .with_reason(format!("not connected ({state})")),
            );
            return 0;
        }

        let msg = match self.codec.decode(frame) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, len = frame.len(), "failed to decode inbound frame");
                self.bus.publish(
                    Event::new(EventKind::MessageDropped)
                        .with_error(e.as_label())
                        .with_reason(e.to_string()),
                );
                return 0;
            }
        };

        self.deliver(msg.event.as_str(), msg.payload).await
    }

    /// Invokes every handler registered for `event`, in order.
    pub(crate) async fn deliver(&self, event: &str, payload: Payload) -> usize {
        let handlers = self.registry.snapshot(event).await;
        for (seq, handler) in &handlers {
            self.invoke(event, *seq, handler, payload.clone()).await;
        }
        handlers.len()
    }

    async fn invoke(&self, event: &str, seq: u64, handler: &HandlerRef, payload: Payload) {
        let handler = Arc::clone(handler);
        let call =
            std::panic::AssertUnwindSafe(async move { handler.call(payload).await }).catch_unwind();

        let outcome = match self.handler_timeout {
            Some(timeout) => match time::timeout(timeout, call).await {
                Ok(res) => res,
                Err(_elapsed) => Ok(Err(HandlerError::Timeout { timeout })),
            },
            None => call.await,
        };

        let (label, reason) = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => (e.as_label(), e.to_string()),
            Err(panic) => (
                "handler_panic",
                format!("panicked: {}", crate::core::panic_message(panic.as_ref())),
            ),
        };

        let fault = ClientError::HandlerFault {
            event: event.to_string(),
            reason,
        };
        tracing::warn!(event, handler = seq, error = %fault, "handler fault");
        self.bus.publish(
            Event::new(EventKind::HandlerFault)
                .with_event(event)
                .with_handler(seq)
                .with_error(label)
                .with_reason(fault.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{EventName, JsonCodec};
    use crate::handlers::HandlerFn;
    use serde_json::json;
    use tokio::sync::{broadcast, mpsc};

    struct Fixture {
        registry: Arc<Registry>,
        dispatcher: Dispatcher,
        state: watch::Sender<ConnectionState>,
        events: broadcast::Receiver<Event>,
    }

    fn fixture(timeout: Option<Duration>) -> Fixture {
        let bus = Bus::new(64);
        let events = bus.subscribe();
        let registry = Arc::new(Registry::new());
        let (state, rx) = watch::channel(ConnectionState::Connected);
        let dispatcher = Dispatcher::new(registry.clone(), Arc::new(JsonCodec), bus, rx, timeout);
        Fixture {
            registry,
            dispatcher,
            state,
            events,
        }
    }

    fn recorder(
        tag: &'static str,
        tx: mpsc::UnboundedSender<(&'static str, Payload)>,
    ) -> HandlerRef {
        HandlerFn::arc(move |payload: Payload| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((tag, payload));
                Ok(())
            }
        })
    }

    fn name(s: &str) -> EventName {
        EventName::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let f = fixture(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        f.registry.insert(name("tick"), recorder("h1", tx.clone()), false).await;
        f.registry.insert(name("tick"), recorder("h2", tx.clone()), false).await;

        assert_eq!(f.dispatcher.dispatch(br#"["tick",1]"#).await, 2);
        assert_eq!(rx.recv().await, Some(("h1", json!(1))));
        assert_eq!(rx.recv().await, Some(("h2", json!(1))));
    }

    #[tokio::test]
    async fn test_init_connection_payload_reaches_handler_once() {
        let f = fixture(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        f.registry.insert(name("init-connection"), recorder("h", tx), false).await;

        f.dispatcher.dispatch(br#"["init-connection",{"user":"x"}]"#).await;
        assert_eq!(rx.recv().await, Some(("h", json!({"user": "x"}))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failing_and_panicking_handlers_do_not_stop_siblings() {
        let mut f = fixture(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        f.registry
            .insert(
                name("attack"),
                HandlerFn::arc(|_: Payload| async { Err(HandlerError::fail("nope")) }),
                false,
            )
            .await;
        f.registry
            .insert(
                name("attack"),
                HandlerFn::arc(|_: Payload| async {
                    if true {
                        panic!("handler exploded");
                    }
                    Ok(())
                }),
                false,
            )
            .await;
        f.registry.insert(name("attack"), recorder("survivor", tx), false).await;

        assert_eq!(f.dispatcher.dispatch(br#"["attack",{"dir":1}]"#).await, 3);
        assert_eq!(rx.recv().await, Some(("survivor", json!({"dir": 1}))));

        let first = f.events.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::HandlerFault);
        assert_eq!(first.error, Some("handler_failed"));
        assert_eq!(first.event.as_deref(), Some("attack"));

        let second = f.events.recv().await.unwrap();
        assert_eq!(second.kind, EventKind::HandlerFault);
        assert_eq!(second.error, Some("handler_panic"));
        assert!(second.reason.as_deref().unwrap_or("").contains("handler exploded"));

        assert_eq!(*f.state.borrow(), ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_handler_times_out() {
        let mut f = fixture(Some(Duration::from_millis(50)));
        f.registry
            .insert(
                name("slow"),
                HandlerFn::arc(|_: Payload| async {
                    time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }),
                false,
            )
            .await;

        f.dispatcher.dispatch(br#"["slow"]"#).await;
        let ev = f.events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::HandlerFault);
        assert_eq!(ev.error, Some("handler_timeout"));
    }

    #[tokio::test]
    async fn test_frames_dropped_when_not_connected_or_undecodable() {
        let mut f = fixture(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        f.registry.insert(name("tick"), recorder("h", tx), false).await;

        f.state.send_replace(ConnectionState::Disconnected);
        assert_eq!(f.dispatcher.dispatch(br#"["tick"]"#).await, 0);
        assert_eq!(f.events.recv().await.unwrap().kind, EventKind::MessageDropped);

        f.state.send_replace(ConnectionState::Connected);
        assert_eq!(f.dispatcher.dispatch(b"{oops").await, 0);
        let ev = f.events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::MessageDropped);
        assert_eq!(ev.error, Some("codec_json"));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_event_is_ignored() {
        let mut f = fixture(None);
        assert_eq!(f.dispatcher.dispatch(br#"["who-knows",{}]"#).await, 0);
        assert!(f.events.try_recv().is_err());
    }
}
