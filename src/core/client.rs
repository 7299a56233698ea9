//! # Client: the application-facing handle.
//!
//! A [`Client`] owns one logical connection. It starts and stops the
//! connection lifecycle, registers event handlers and sends outbound events.
//!
//! ## Architecture
//! ```text
//! ClientBuilder::build() ──► Arc<Client>
//!
//! start(endpoint, cfg) ──► Disconnected|Closed → Connecting
//!                          └─► spawn ConnectionActor::run(child_token)
//!
//! on / once / off      ──► Registry (RwLock, snapshot on dispatch)
//! emit(name, payload)  ──► state == Connected ? Codec::encode ──► Transport::send
//!                                            : NotConnected
//!
//! stop()               ──► cancel token ──► await actor (≤ stop_grace, else abort)
//!                          └─► release link ──► Closed
//! ```
//!
//! ## Rules
//! - `start`/`stop` are serialized by a control mutex; between them the
//!   connection actor is the only writer of the state.
//! - Handlers must not await [`Client::stop`]: `stop` waits for the actor,
//!   and the actor waits for the handler.
//! - Dropping the client cancels its actor.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), evlink::ClientError> {
//! use evlink::{Client, ClientConfig, ConnectionState, HandlerFn, MemoryTransport, Payload};
//!
//! let transport = MemoryTransport::new();
//! let client = Client::builder(transport.clone()).build();
//!
//! client
//!     .on("init-connection", HandlerFn::arc(|payload: Payload| async move {
//!         println!("init: {payload}");
//!         Ok(())
//!     }))
//!     .await?;
//!
//! client.start("mem://game", ClientConfig::default()).await?;
//! client.wait_for_state(ConnectionState::Connected).await;
//! client.emit("move", serde_json::json!({"x": 1})).await?;
//!
//! client.stop().await;
//! assert_eq!(client.state(), ConnectionState::Closed);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::codec::{EventName, Message, Payload};
use crate::core::actor::{ActorExit, ConnectionActor};
use crate::core::builder::ClientBuilder;
use crate::core::config::ClientConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::registry::HandlerToken;
use crate::core::shared::Shared;
use crate::core::state::ConnectionState;
use crate::error::ClientError;
use crate::events::Event;
use crate::handlers::HandlerRef;
use crate::transport::Transport;

struct Run {
    token: CancellationToken,
    join: JoinHandle<ActorExit>,
    grace: Duration,
}

/// Realtime event client over a single logical connection.
pub struct Client {
    shared: Arc<Shared>,
    control: Mutex<Option<Run>>,
    runtime_token: CancellationToken,
}

impl Client {
    /// Returns a builder for a client speaking over `transport`.
    pub fn builder(transport: impl Transport) -> ClientBuilder {
        ClientBuilder::new(Arc::new(transport))
    }

    pub(crate) fn new_internal(shared: Arc<Shared>, runtime_token: CancellationToken) -> Self {
        Self {
            shared,
            control: Mutex::new(None),
            runtime_token,
        }
    }

    /// Starts a connection lifecycle towards `endpoint`.
    ///
    /// Transitions to `Connecting` and spawns the connection actor; the call
    /// does not wait for the link. Any terminal error left by a previous run
    /// is discarded.
    ///
    /// Returns [`ClientError::AlreadyStarted`] unless the state is
    /// `Disconnected` or `Closed`.
    pub async fn start(
        &self,
        endpoint: impl Into<String>,
        config: ClientConfig,
    ) -> Result<(), ClientError> {
        let mut control = self.control.lock().await;
        if !self.shared.state.current().is_idle() {
            return Err(ClientError::AlreadyStarted);
        }
        if let Some(prev) = control.take() {
            prev.token.cancel();
            let _ = prev.join.await;
        }
        if self.shared.state.transition(ConnectionState::Connecting).is_none() {
            return Err(ClientError::AlreadyStarted);
        }
        self.shared.take_terminal();

        let endpoint = endpoint.into();
        tracing::info!(endpoint = %endpoint, reconnect = config.reconnect, "starting client");

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.shared.registry),
            Arc::clone(&self.shared.codec),
            self.shared.bus.clone(),
            self.shared.state.watch(),
            config.handler_timeout(),
        );
        let actor = ConnectionActor::new(
            Arc::clone(&self.shared),
            endpoint,
            config.reconnect_policy(),
            dispatcher,
        );

        let token = self.runtime_token.child_token();
        let join = tokio::spawn(actor.run(token.clone()));
        *control = Some(Run {
            token,
            join,
            grace: config.stop_grace,
        });
        Ok(())
    }

    /// Stops the connection lifecycle and moves to `Closed`.
    ///
    /// Cancels any pending backoff or link wait, waits for the actor up to the
    /// configured `stop_grace` (aborting it past that), releases the link and
    /// transitions to `Closed`. Calling it again is a no-op.
    pub async fn stop(&self) {
        let mut control = self.control.lock().await;

        if let Some(run) = control.take() {
            run.token.cancel();
            let mut join = run.join;
            match time::timeout(run.grace, &mut join).await {
                Ok(Ok(exit)) => tracing::debug!(?exit, "connection actor finished"),
                Ok(Err(e)) => tracing::error!(error = %e, "connection actor failed"),
                Err(_elapsed) => {
                    tracing::warn!(
                        grace_ms = run.grace.as_millis() as u64,
                        "stop grace exceeded; aborting connection actor"
                    );
                    join.abort();
                    let _ = join.await;
                }
            }
        }

        self.shared.release_link().await;
        if self.shared.state.current() != ConnectionState::Closed {
            self.shared.state.transition(ConnectionState::Closed);
            tracing::info!("client stopped");
        }
    }

    /// Registers `handler` for `event`.
    ///
    /// Handlers for one event run in registration order. Fails only with
    /// [`ClientError::InvalidEventName`] for an empty name.
    pub async fn on(&self, event: &str, handler: HandlerRef) -> Result<HandlerToken, ClientError> {
        let name = EventName::new(event)?;
        Ok(self.shared.registry.insert(name, handler, false).await)
    }

    /// Like [`on`](Self::on), but the handler is removed before its first call.
    pub async fn once(
        &self,
        event: &str,
        handler: HandlerRef,
    ) -> Result<HandlerToken, ClientError> {
        let name = EventName::new(event)?;
        Ok(self.shared.registry.insert(name, handler, true).await)
    }

    /// Removes the handler behind `token`. Unknown or removed tokens are ignored.
    pub async fn off(&self, token: &HandlerToken) {
        if !self.shared.registry.remove(token).await {
            tracing::trace!(
                event = %token.event(),
                handler = token.seq(),
                "off: handler not registered"
            );
        }
    }

    /// Number of handlers currently registered for `event`.
    pub async fn handler_count(&self, event: &str) -> usize {
        self.shared.registry.count(event).await
    }

    /// Sends `event` with `payload` to the remote endpoint.
    ///
    /// Nothing is buffered: while the state is not `Connected` this fails with
    /// [`ClientError::NotConnected`] and the transport is not touched.
    pub async fn emit(&self, event: &str, payload: Payload) -> Result<(), ClientError> {
        if self.shared.state.current() != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let link = self.shared.current_link().ok_or(ClientError::NotConnected)?;
        let name = EventName::new(event)?;
        let frame = self.shared.codec.encode(&Message::new(name, payload))?;
        self.shared
            .transport
            .send(link, frame)
            .await
            .map_err(ClientError::Send)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state.current()
    }

    /// Receiver that observes every state change (latest value semantics).
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.watch()
    }

    /// Waits until the state equals `state`.
    ///
    /// Returns immediately if it already does. A state that is entered and
    /// left before this task observes it is missed.
    pub async fn wait_for_state(&self, state: ConnectionState) {
        let mut rx = self.shared.state.watch();
        let _ = rx.wait_for(|s| *s == state).await;
    }

    /// Subscribes to the raw lifecycle event bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Returns the error that ended the last lifecycle, once.
    ///
    /// Set when the reconnection policy gives up; `None` after a clean close
    /// or a `stop()`.
    pub fn take_terminal_error(&self) -> Option<ClientError> {
        self.shared.take_terminal()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}
