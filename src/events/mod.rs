//! Client events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `StateCell` (transitions), `ConnectionActor` (connect
//!   failures, link loss, backoff, giving up), `Dispatcher` (handler faults,
//!   dropped frames), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the client's subscriber listener (fans out to
//!   `SubscriberSet`) and receivers from `Client::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
