//! Client core: connection lifecycle and dispatch.
//!
//! The public API from this module is [`Client`] (built with
//! [`ClientBuilder`]), its configuration and the [`ConnectionState`] it exposes.
//!
//! Internal modules:
//! - [`state`]: the state machine and its single writer cell;
//! - [`registry`]: event name → ordered handlers;
//! - [`dispatcher`]: decodes inbound frames and runs handlers in isolation;
//! - [`actor`]: runs one connection lifecycle with reconnection and backoff;
//! - [`shared`]: state shared between the client handle and its actor.

mod actor;
mod builder;
mod client;
mod config;
mod dispatcher;
mod registry;
mod shared;
mod state;

pub use builder::ClientBuilder;
pub use client::Client;
pub use config::{ClientConfig, ConnectOptions};
pub use registry::HandlerToken;
pub use state::ConnectionState;

use std::any::Any;

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let err = std::panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(err.as_ref()), "static");

        let n = 7;
        let err = std::panic::catch_unwind(|| panic!("formatted {n}")).unwrap_err();
        assert_eq!(panic_message(err.as_ref()), "formatted 7");

        let err = std::panic::catch_unwind(|| std::panic::panic_any(42u8)).unwrap_err();
        assert_eq!(panic_message(err.as_ref()), "unknown panic");
    }
}
