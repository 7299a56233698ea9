//! # In-process transport.
//!
//! [`MemoryTransport`] plays the remote endpoint inside the process. Tests
//! script open failures, push inbound frames, drop or close the live link, and
//! inspect what the client sent.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use evlink::{MemoryTransport, Transport};
//!
//! let transport = MemoryTransport::new();
//! transport.fail_next_opens(1, "booting");
//! assert!(transport.open("mem://game").await.is_err());
//!
//! let link = transport.open("mem://game").await.unwrap();
//! transport.send(link.id, b"[\"ping\"]".to_vec()).await.unwrap();
//! assert_eq!(transport.sent_frames(), vec![b"[\"ping\"]".to_vec()]);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::transport::{Link, LinkEvent, LinkId, Transport};

const LINK_QUEUE: usize = 64;

#[derive(Default)]
struct State {
    refuse_all: Option<String>,
    open_failures: VecDeque<String>,
    next_id: u64,
    live: Option<(LinkId, mpsc::Sender<LinkEvent>)>,
    endpoints: Vec<String>,
    sent: Vec<Vec<u8>>,
    opens: usize,
    sends: usize,
    closes: usize,
}

/// Scriptable in-memory [`Transport`]. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<State>>,
}

impl MemoryTransport {
    /// Creates a transport that accepts every open.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next `n` opens fail with `reason`.
    pub fn fail_next_opens(&self, n: usize, reason: &str) {
        let mut st = self.state();
        st.open_failures
            .extend(std::iter::repeat_n(reason.to_string(), n));
    }

    /// Makes every subsequent open fail with `reason`.
    pub fn refuse_all(&self, reason: &str) {
        self.state().refuse_all = Some(reason.to_string());
    }

    fn live_sender(&self) -> Option<mpsc::Sender<LinkEvent>> {
        self.state().live.as_ref().map(|(_, tx)| tx.clone())
    }

    /// Delivers `frame` on the live link. Returns `false` if no link is open.
    pub async fn inject(&self, frame: impl Into<Vec<u8>>) -> bool {
        match self.live_sender() {
            Some(tx) => tx.send(LinkEvent::Received(frame.into())).await.is_ok(),
            None => false,
        }
    }

    /// Drops the live link with `reason`. Returns `false` if no link is open.
    pub async fn drop_link(&self, reason: &str) -> bool {
        let live = self.state().live.take();
        match live {
            Some((_, tx)) => tx.send(LinkEvent::Down(reason.to_string())).await.is_ok(),
            None => false,
        }
    }

    /// Closes the live link cleanly. Returns `false` if no link is open.
    pub async fn close_link(&self) -> bool {
        let live = self.state().live.take();
        match live {
            Some((_, tx)) => tx.send(LinkEvent::Closed).await.is_ok(),
            None => false,
        }
    }

    /// Returns `true` while a link is open.
    pub fn is_link_open(&self) -> bool {
        self.state().live.is_some()
    }

    /// Frames sent so far, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.state().sent.clone()
    }

    /// Endpoints passed to `open`, in order.
    pub fn endpoints(&self) -> Vec<String> {
        self.state().endpoints.clone()
    }

    /// Number of `open` calls (successful or not).
    pub fn open_count(&self) -> usize {
        self.state().opens
    }

    /// Number of `send` calls (successful or not).
    pub fn send_count(&self) -> usize {
        self.state().sends
    }

    /// Number of `close` calls.
    pub fn close_count(&self) -> usize {
        self.state().closes
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn open(&self, endpoint: &str) -> Result<Link, TransportError> {
        let mut st = self.state();
        st.opens += 1;
        st.endpoints.push(endpoint.to_string());

        if let Some(reason) = st.refuse_all.clone().or_else(|| st.open_failures.pop_front()) {
            return Err(TransportError::Refused { reason });
        }

        st.next_id += 1;
        let id = LinkId::new(st.next_id);
        let (tx, rx) = mpsc::channel(LINK_QUEUE);
        st.live = Some((id, tx));
        Ok(Link { id, events: rx })
    }

    async fn send(&self, link: LinkId, frame: Vec<u8>) -> Result<(), TransportError> {
        let mut st = self.state();
        st.sends += 1;
        if !matches!(st.live, Some((id, _)) if id == link) {
            return Err(TransportError::Closed);
        }
        st.sent.push(frame);
        Ok(())
    }

    async fn close(&self, link: LinkId) {
        let mut st = self.state();
        st.closes += 1;
        if matches!(st.live, Some((id, _)) if id == link) {
            st.live = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_failures_then_success() {
        let t = MemoryTransport::new();
        t.fail_next_opens(2, "down");
        assert_eq!(
            t.open("mem://a").await.unwrap_err(),
            TransportError::Refused {
                reason: "down".into()
            }
        );
        assert!(t.open("mem://a").await.is_err());
        assert!(t.open("mem://a").await.is_ok());
        assert_eq!(t.open_count(), 3);
    }

    #[tokio::test]
    async fn test_injected_frames_arrive_in_order() {
        let t = MemoryTransport::new();
        let mut link = t.open("mem://a").await.unwrap();
        assert!(t.inject("one").await);
        assert!(t.inject("two").await);
        assert!(t.drop_link("reset").await);

        assert_eq!(link.events.recv().await, Some(LinkEvent::Received(b"one".to_vec())));
        assert_eq!(link.events.recv().await, Some(LinkEvent::Received(b"two".to_vec())));
        assert_eq!(link.events.recv().await, Some(LinkEvent::Down("reset".into())));
        assert_eq!(link.events.recv().await, None);
        assert!(!t.inject("late").await);
    }

    #[tokio::test]
    async fn test_send_on_stale_link_fails() {
        let t = MemoryTransport::new();
        let link = t.open("mem://a").await.unwrap();
        t.close(link.id).await;
        t.close(link.id).await;
        assert_eq!(t.send(link.id, vec![1]).await, Err(TransportError::Closed));
        assert_eq!(t.close_count(), 2);
        assert_eq!(t.send_count(), 1);
        assert!(t.sent_frames().is_empty());
    }
}
