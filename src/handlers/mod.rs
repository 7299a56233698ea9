//! Application event handlers.
//!
//! - [`Handler`] async callback trait (boxed-future form)
//! - [`HandlerFn`] closure-backed implementation
//! - [`HandlerRef`] shared handle stored by the registry
//! - [`lifecycle`] reserved names of the synthetic connection events

mod handler;
mod handler_fn;
pub mod lifecycle;

pub use handler::{BoxHandlerFuture, Handler, HandlerRef};
pub use handler_fn::HandlerFn;
