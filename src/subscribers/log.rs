//! # LogWriter: renders client events through `tracing`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  evlink::subscribers::log: state changed from=connecting to=connected
//! WARN  evlink::subscribers::log: connect failed attempt=0 err=transport_refused reason=...
//! INFO  evlink::subscribers::log: reconnect scheduled attempt=1 delay_ms=1000
//! ERROR evlink::subscribers::log: gave up reconnecting attempt=2 err=connect_error
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::StateChanged => {
                tracing::info!(
                    seq = e.seq,
                    from = ?e.previous,
                    to = ?e.state,
                    "state changed"
                );
            }
            EventKind::ConnectFailed => {
                tracing::warn!(
                    seq = e.seq,
                    attempt = ?e.attempt,
                    err = ?e.error,
                    reason,
                    "connect failed"
                );
            }
            EventKind::LinkLost => {
                tracing::warn!(seq = e.seq, err = ?e.error, reason, "link lost");
            }
            EventKind::BackoffScheduled => {
                tracing::info!(
                    seq = e.seq,
                    attempt = ?e.attempt,
                    delay_ms = ?e.delay_ms,
                    "reconnect scheduled"
                );
            }
            EventKind::RetriesExhausted => {
                tracing::error!(
                    seq = e.seq,
                    attempt = ?e.attempt,
                    err = ?e.error,
                    reason,
                    "gave up reconnecting"
                );
            }
            EventKind::HandlerFault => {
                tracing::warn!(
                    seq = e.seq,
                    event = e.event.as_deref().unwrap_or("unknown"),
                    handler = ?e.handler,
                    err = ?e.error,
                    reason,
                    "handler fault"
                );
            }
            EventKind::MessageDropped => {
                tracing::debug!(seq = e.seq, err = ?e.error, reason, "inbound frame dropped");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(
                    subscriber = e.subscriber.unwrap_or("unknown"),
                    reason,
                    "subscriber overflow"
                );
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(
                    subscriber = e.subscriber.unwrap_or("unknown"),
                    reason,
                    "subscriber panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
