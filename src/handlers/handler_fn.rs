//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Payload) -> Fut`, producing a fresh
//! future per event. Shared state goes through explicit `Arc<...>` captures.
//!
//! ## Example
//! ```rust
//! use evlink::{HandlerFn, HandlerRef, Payload};
//!
//! let h: HandlerRef = HandlerFn::arc(|payload: Payload| async move {
//!     println!("{payload}");
//!     Ok(())
//! });
//! # let _ = h;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::codec::Payload;
use crate::error::HandlerError;
use crate::handlers::handler::{BoxHandlerFuture, Handler};

/// Closure-backed [`Handler`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    /// Wraps `f`.
    ///
    /// Prefer [`HandlerFn::arc`] when registering directly.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps `f` and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    fn call(&self, payload: Payload) -> BoxHandlerFuture {
        Box::pin((self.f)(payload))
    }
}
