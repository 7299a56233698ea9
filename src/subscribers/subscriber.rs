//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing client events
//! (logging, metrics, UI status indicators).
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently of the connection)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use evlink::{ConnectionState, Event, EventKind, Subscribe};
//!
//! struct StatusLight;
//!
//! #[async_trait]
//! impl Subscribe for StatusLight {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::StateChanged && ev.state == Some(ConnectionState::Connected) {
//!             // turn the light green
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "status-light" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of client events.
///
/// Events are delivered FIFO per subscriber from a dedicated worker; a slow
/// subscriber only fills its own queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic events. Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to a minimum of 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
