//! # Handler abstraction.
//!
//! A [`Handler`] receives the payload of one event and returns a future that
//! resolves to `Ok(())` or a [`HandlerError`]. The common handle type is
//! [`HandlerRef`], an `Arc<dyn Handler>` shared between the registry and
//! in-flight dispatches.
//!
//! # Example
//! ```
//! use evlink::{BoxHandlerFuture, Handler, HandlerError, Payload};
//!
//! struct PrintUser;
//!
//! impl Handler for PrintUser {
//!     fn call(&self, payload: Payload) -> BoxHandlerFuture {
//!         Box::pin(async move {
//!             let user = payload
//!                 .get("user")
//!                 .and_then(|u| u.as_str())
//!                 .ok_or_else(|| HandlerError::fail("missing user"))?;
//!             println!("hello {user}");
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::codec::Payload;
use crate::error::HandlerError;

/// Boxed future returned by [`Handler::call`].
pub type BoxHandlerFuture =
    Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send + 'static>>;

/// Shared handle to a handler.
pub type HandlerRef = Arc<dyn Handler>;

/// Callback for one named event.
///
/// Each invocation receives its own copy of the payload. Errors and panics are
/// reported as handler faults and never reach the connection.
pub trait Handler: Send + Sync + 'static {
    /// Creates the future that processes `payload`.
    fn call(&self, payload: Payload) -> BoxHandlerFuture;
}
