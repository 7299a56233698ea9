//! # ConnectionActor: owner of one connection lifecycle.
//!
//! Spawned by [`Client::start`](crate::Client::start) once the state is
//! `Connecting`. From then on it is the only writer of the connection state
//! until it exits or [`Client::stop`](crate::Client::stop) takes over.
//!
//! ## Architecture
//! ```text
//! loop {
//!   ├─► open(endpoint)              (raced against cancellation)
//!   │     ├─ Ok(link) ──► retries = 0 ──► serve(link)
//!   │     │                 ├─ Connected, "connect"
//!   │     │                 ├─ Received(frame) ──► Dispatcher::dispatch
//!   │     │                 └─ "disconnect", release link
//!   │     │                      ├─ Closed  ──► Disconnected, exit
//!   │     │                      ├─ stopped ──► exit
//!   │     │                      └─ Down    ──► failure = LinkLost
//!   │     └─ Err ──► ConnectFailed, "connect_error" ──► failure = Connect
//!   └─► ReconnectPolicy::decide(retries)
//!         ├─ GiveUp ──► "reconnect_failed", RetriesExhausted,
//!         │             terminal error (Connect unless reconnect is off),
//!         │             Disconnected, exit
//!         └─ Retry  ──► Reconnecting, BackoffScheduled, "reconnecting",
//!                       sleep(delay) (cancellable) ──► Connecting
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; at most one link is held at a time.
//! - The retry counter **resets on every successful open**.
//! - Cancellation is observed while opening, while waiting for inbound
//!   events and during the backoff sleep. A cancelled actor never moves the
//!   state; `stop()` performs the final `Closed` transition.
//! - The link is released before the actor's last state transition.

use std::sync::Arc;

use serde_json::json;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::codec::Payload;
use crate::core::dispatcher::Dispatcher;
use crate::core::shared::Shared;
use crate::core::state::ConnectionState;
use crate::error::ClientError;
use crate::events::{Event, EventKind};
use crate::handlers::lifecycle;
use crate::policies::{ReconnectDecision, ReconnectPolicy};
use crate::transport::{Link, LinkEvent};

/// Why the actor returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActorExit {
    /// Cancelled by `stop()` or by dropping the client.
    Stopped,
    /// The peer closed the link cleanly.
    Closed,
    /// The reconnection policy gave up.
    GaveUp,
}

enum LinkEnd {
    Stopped,
    Closed,
    Lost(String),
}

pub(crate) struct ConnectionActor {
    shared: Arc<Shared>,
    endpoint: String,
    policy: ReconnectPolicy,
    dispatcher: Dispatcher,
}

impl ConnectionActor {
    pub(crate) fn new(
        shared: Arc<Shared>,
        endpoint: String,
        policy: ReconnectPolicy,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            shared,
            endpoint,
            policy,
            dispatcher,
        }
    }

    /// Runs the lifecycle until a clean close, give-up, or cancellation.
    pub(crate) async fn run(self, token: CancellationToken) -> ActorExit {
        let mut retries: u32 = 0;

        loop {
            let opened = select! {
                biased;
                _ = token.cancelled() => return ActorExit::Stopped,
                res = self.shared.transport.open(&self.endpoint) => res,
            };

            let failure = match opened {
                Ok(link) => {
                    retries = 0;
                    match self.serve(link, &token).await {
                        LinkEnd::Stopped => return ActorExit::Stopped,
                        LinkEnd::Closed => {
                            self.shared.state.transition(ConnectionState::Disconnected);
                            return ActorExit::Closed;
                        }
                        LinkEnd::Lost(reason) => ClientError::LinkLost { reason },
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        retries,
                        error = %e,
                        "connect failed"
                    );
                    self.shared.bus.publish(
                        Event::new(EventKind::ConnectFailed)
                            .with_attempt(retries)
                            .with_error(e.as_label())
                            .with_reason(e.to_string()),
                    );
                    let reason = e.to_string();
                    self.dispatcher
                        .deliver(lifecycle::CONNECT_ERROR, Payload::String(reason.clone()))
                        .await;
                    ClientError::Connect { reason }
                }
            };

            match self.policy.decide(retries) {
                ReconnectDecision::GiveUp => {
                    self.give_up(failure, retries).await;
                    return ActorExit::GaveUp;
                }
                ReconnectDecision::Retry { retry, delay } => {
                    retries = retry;
                    self.shared.state.transition(ConnectionState::Reconnecting);
                    tracing::info!(
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        "reconnect scheduled"
                    );
                    self.shared.bus.publish(
                        Event::new(EventKind::BackoffScheduled)
                            .with_attempt(retry)
                            .with_delay(delay)
                            .with_error(failure.as_label())
                            .with_reason(failure.to_string()),
                    );
                    self.dispatcher.deliver(lifecycle::RECONNECTING, json!(retry)).await;

                    let sleep = time::sleep(delay);
                    tokio::pin!(sleep);
                    select! {
                        biased;
                        _ = token.cancelled() => return ActorExit::Stopped,
                        _ = &mut sleep => {}
                    }
                    self.shared.state.transition(ConnectionState::Connecting);
                }
            }
        }
    }

    /// Drives one open link until it ends.
    async fn serve(&self, link: Link, token: &CancellationToken) -> LinkEnd {
        let Link { id, mut events } = link;
        self.shared.set_link(id);
        self.shared.state.transition(ConnectionState::Connected);
        tracing::info!(endpoint = %self.endpoint, link = %id, "connected");
        self.dispatcher.deliver(lifecycle::CONNECT, Payload::Null).await;

        let end = loop {
            select! {
                biased;
                _ = token.cancelled() => break LinkEnd::Stopped,
                ev = events.recv() => match ev {
                    Some(LinkEvent::Received(frame)) => {
                        self.dispatcher.dispatch(&frame).await;
                    }
                    Some(LinkEvent::Down(reason)) => break LinkEnd::Lost(reason),
                    Some(LinkEvent::Closed) | None => break LinkEnd::Closed,
                },
            }
        };

        let reason = match &end {
            LinkEnd::Stopped => "client stopped",
            LinkEnd::Closed => "closed by peer",
            LinkEnd::Lost(reason) => {
                tracing::warn!(link = %id, reason = %reason, "link lost");
                self.shared.bus.publish(
                    Event::new(EventKind::LinkLost)
                        .with_error("link_lost")
                        .with_reason(reason.as_str()),
                );
                reason.as_str()
            }
        };
        self.dispatcher
            .deliver(lifecycle::DISCONNECT, Payload::String(reason.to_string()))
            .await;
        self.shared.release_link().await;
        end
    }

    async fn give_up(&self, failure: ClientError, retries: u32) {
        // With reconnection on, exhausting retries always ends as a connect error.
        let failure = match failure {
            ClientError::LinkLost { reason } if self.policy.enabled => {
                ClientError::Connect { reason }
            }
            other => other,
        };
        if self.policy.enabled {
            self.dispatcher
                .deliver(lifecycle::RECONNECT_FAILED, json!(retries))
                .await;
        }
        tracing::error!(retries, error = %failure, "giving up reconnecting");
        self.shared.bus.publish(
            Event::new(EventKind::RetriesExhausted)
                .with_attempt(retries)
                .with_error(failure.as_label())
                .with_reason(failure.to_string()),
        );
        self.shared.set_terminal(failure);
        self.shared.state.transition(ConnectionState::Disconnected);
    }
}
