//! Transport boundary.
//!
//! The client never speaks a network protocol itself. It consumes the
//! [`Transport`] capability set: open a [`Link`] to an endpoint, send frames on
//! it, close it, and read its inbound [`LinkEvent`] stream.
//!
//! ```text
//! Client::emit ──► Codec::encode ──► Transport::send(link, frame)
//!
//! Transport ──► Link.events ──► ConnectionActor
//!                  ├─ Received(frame) ──► Dispatcher
//!                  ├─ Down(reason)    ──► reconnection policy
//!                  └─ Closed / end    ──► Disconnected
//! ```
//!
//! [`MemoryTransport`] is an in-process implementation for tests and demos.

mod memory;

pub use memory::MemoryTransport;

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;

/// Identifier of an open link, assigned by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId(u64);

impl LinkId {
    /// Wraps a transport-assigned id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// Inbound notification from an open link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// A complete frame arrived.
    Received(Vec<u8>),
    /// The link dropped unexpectedly.
    Down(String),
    /// The peer closed the link cleanly.
    Closed,
}

/// An open link: its id plus the inbound event stream.
///
/// The stream ending (all senders dropped) is treated like [`LinkEvent::Closed`].
#[derive(Debug)]
pub struct Link {
    /// Id used for [`Transport::send`] and [`Transport::close`].
    pub id: LinkId,
    /// Inbound events, in arrival order.
    pub events: mpsc::Receiver<LinkEvent>,
}

/// Duplex connection capability consumed by the client.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Opens a link to `endpoint`.
    async fn open(&self, endpoint: &str) -> Result<Link, TransportError>;

    /// Sends one frame on `link`.
    async fn send(&self, link: LinkId, frame: Vec<u8>) -> Result<(), TransportError>;

    /// Releases `link`. Must be idempotent.
    async fn close(&self, link: LinkId);
}
