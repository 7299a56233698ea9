//! # evlink
//!
//! **evlink** is the core of a realtime event client: one logical connection
//! to a remote endpoint, automatic reconnection with exponential backoff, and
//! ordered dispatch of named inbound events to registered handlers.
//!
//! The crate does not speak a network protocol itself. A [`Transport`]
//! implementation supplies links; [`MemoryTransport`] is an in-process one for
//! tests and demos.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  application
//!   │  on / once / off        emit(name, payload)        start / stop
//!   ▼                                  │                        │
//! ┌────────────────────────────────────┴────────────────────────┴──────┐
//! │  Client                                                            │
//! │  - Registry   (event name → ordered handlers)                      │
//! │  - StateCell  (ConnectionState, watch channel)                     │
//! │  - Codec      (["name", args...] frames)                           │
//! └──────┬──────────────────────────────────────────────┬──────────────┘
//!        │ spawn                                        │ send(frame)
//!        ▼                                              ▼
//! ┌─────────────────┐   open / close / LinkEvent   ┌─────────────┐
//! │ ConnectionActor │ ◄──────────────────────────► │  Transport  │
//! │ (retry loop)    │                              └─────────────┘
//! └──┬──────────┬───┘
//!    │          │ Received(frame)
//!    │          ▼
//!    │   ┌────────────┐  sequential, isolated   ┌──────────────────┐
//!    │   │ Dispatcher │ ──────────────────────► │ handler1..N      │
//!    │   └─────┬──────┘                         └──────────────────┘
//!    │         │ HandlerFault / MessageDropped
//!    ▼         ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                       │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │ ──► SubscriberSet
//!                       └────────────────────────┘     ├─► LogWriter
//!                                                      └─► user subscribers
//! ```
//!
//! ### Lifecycle
//! ```text
//! start ──► Connecting ──open ok──► Connected ──clean close──► Disconnected
//!               ▲   │                   │
//!               │   │ open failed       │ link down
//!               │   ▼                   ▼
//!               └─ Reconnecting ◄───────┘   (retries left, after backoff)
//!
//! retries exhausted / reconnect disabled ──► Disconnected + terminal error
//! stop() from any state ──► Closed
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------|---------------------------------------------|
//! | **Client**        | Lifecycle control, handler registration, outbound events. | [`Client`], [`ClientBuilder`]               |
//! | **Handlers**      | Async callbacks per event name, lifecycle event names.    | [`Handler`], [`HandlerFn`], [`lifecycle`]   |
//! | **Policies**      | Reconnection, backoff and jitter.                         | [`ReconnectPolicy`], [`BackoffPolicy`]      |
//! | **Codec**         | Frame encoding seam and the JSON codec.                   | [`Codec`], [`JsonCodec`]                    |
//! | **Transport**     | Link capability consumed by the client.                   | [`Transport`], [`MemoryTransport`]          |
//! | **Subscriber API**| Observe lifecycle events (logging, metrics).              | [`Subscribe`], [`LogWriter`]                |
//! | **Errors**        | Typed errors with stable labels.                          | [`ClientError`], [`TransportError`]         |
//! | **Configuration** | Per-run settings and their serde mirror.                  | [`ClientConfig`], [`ConnectOptions`]        |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use evlink::{
//!     Client, ClientConfig, ConnectionState, HandlerFn, LogWriter, MemoryTransport, Payload,
//!     Subscribe, lifecycle,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = MemoryTransport::new();
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let client = Client::builder(transport.clone()).with_subscribers(subs).build();
//!
//!     client
//!         .on(lifecycle::CONNECT, HandlerFn::arc(|_: Payload| async {
//!             println!("connected");
//!             Ok(())
//!         }))
//!         .await?;
//!
//!     client.start("mem://game", ClientConfig::default()).await?;
//!     client.wait_for_state(ConnectionState::Connected).await;
//!
//!     client.stop().await;
//!     Ok(())
//! }
//! ```
mod codec;
mod core;
mod error;
mod events;
mod handlers;
mod policies;
mod subscribers;
mod transport;

// ---- Public re-exports ----

pub use codec::{Codec, EventName, InboundMessage, JsonCodec, Message, OutboundMessage, Payload};
pub use core::{Client, ClientBuilder, ClientConfig, ConnectOptions, ConnectionState, HandlerToken};
pub use error::{ClientError, CodecError, HandlerError, TransportError};
pub use events::{Bus, Event, EventKind};
pub use handlers::{BoxHandlerFuture, Handler, HandlerFn, HandlerRef, lifecycle};
pub use policies::{BackoffPolicy, JitterPolicy, ReconnectDecision, ReconnectPolicy};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use transport::{Link, LinkEvent, LinkId, MemoryTransport, Transport};
