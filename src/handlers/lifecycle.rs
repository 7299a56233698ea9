//! Reserved names of the synthetic lifecycle events.
//!
//! Handlers registered under these names are invoked by the connection actor.
//! Inbound frames that happen to use one of these names are not filtered and
//! reach the same handlers.
//!
//! | name               | when                                  | payload          |
//! |--------------------|---------------------------------------|------------------|
//! | `connect`          | after entering `Connected`            | `null`           |
//! | `disconnect`       | before leaving `Connected`            | reason string    |
//! | `connect_error`    | after a failed open                   | reason string    |
//! | `reconnecting`     | after entering `Reconnecting`         | retry number     |
//! | `reconnect_failed` | before giving up                      | retries spent    |

/// Link established.
pub const CONNECT: &str = "connect";
/// Link about to be left (lost, closed, or stopped).
pub const DISCONNECT: &str = "disconnect";
/// Opening the link failed.
pub const CONNECT_ERROR: &str = "connect_error";
/// A reconnection attempt has been scheduled.
pub const RECONNECTING: &str = "reconnecting";
/// Reconnection has been abandoned.
pub const RECONNECT_FAILED: &str = "reconnect_failed";
