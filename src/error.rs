//! Error types used by the evlink client, its transports, codecs and handlers.
//!
//! This module defines:
//!
//! - [`ClientError`]: errors surfaced by the client itself (lifecycle and dispatch).
//! - [`TransportError`]: errors reported by a [`Transport`](crate::Transport) implementation.
//! - [`CodecError`]: frame encode/decode failures.
//! - [`HandlerError`]: failures returned by application handlers.
//!
//! Every type provides `as_label` (a stable snake_case label for logs/metrics).

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the client.
///
/// `Connect` and `LinkLost` are absorbed by the connection actor and drive the
/// reconnection policy. They reach the caller only once, as the terminal error:
/// `Connect` when retries are exhausted, `LinkLost` when reconnection is off
/// and a live link drops. The remaining variants are returned directly from
/// the failing call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ClientError {
    /// Opening the link failed.
    #[error("connect failed: {reason}")]
    Connect {
        /// Transport-provided reason.
        reason: String,
    },

    /// An established link dropped unexpectedly.
    #[error("link lost: {reason}")]
    LinkLost {
        /// Transport-provided reason.
        reason: String,
    },

    /// `emit` was called while the client was not connected.
    #[error("not connected")]
    NotConnected,

    /// An event name failed validation (empty).
    #[error("invalid event name: {name:?}")]
    InvalidEventName {
        /// The rejected name.
        name: String,
    },

    /// An application handler failed, panicked or timed out during dispatch.
    #[error("handler for {event:?} faulted: {reason}")]
    HandlerFault {
        /// Event the handler was registered for.
        event: String,
        /// Failure description.
        reason: String,
    },

    /// `start` was called while a connection lifecycle was already running.
    #[error("client already started")]
    AlreadyStarted,

    /// Outbound message could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The transport rejected an outbound frame.
    #[error("send failed: {0}")]
    Send(#[source] TransportError),
}

impl ClientError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evlink::ClientError;
    ///
    /// assert_eq!(ClientError::NotConnected.as_label(), "not_connected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ClientError::Connect { .. } => "connect_error",
            ClientError::LinkLost { .. } => "link_lost",
            ClientError::NotConnected => "not_connected",
            ClientError::InvalidEventName { .. } => "invalid_event_name",
            ClientError::HandlerFault { .. } => "handler_fault",
            ClientError::AlreadyStarted => "already_started",
            ClientError::Codec(_) => "codec_error",
            ClientError::Send(_) => "send_failed",
        }
    }
}

/// # Errors reported by a transport.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint refused or could not be reached.
    #[error("refused: {reason}")]
    Refused {
        /// Underlying reason.
        reason: String,
    },

    /// I/O failure on an open link.
    #[error("io: {reason}")]
    Io {
        /// Underlying reason.
        reason: String,
    },

    /// The link is no longer open.
    #[error("link closed")]
    Closed,
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Refused { .. } => "transport_refused",
            TransportError::Io { .. } => "transport_io",
            TransportError::Closed => "transport_closed",
        }
    }
}

/// # Frame encode/decode failures.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CodecError {
    /// Frame is structurally valid JSON but not a `["name", ...]` array.
    #[error("malformed frame: {reason}")]
    Malformed {
        /// What was wrong with the frame.
        reason: &'static str,
    },

    /// Frame is not valid JSON (or the payload cannot be serialized).
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CodecError::Malformed { .. } => "codec_malformed",
            CodecError::Json(_) => "codec_json",
        }
    }
}

/// # Failure returned by an application handler.
///
/// Handlers report failures by returning this type; the dispatcher turns it
/// into a [`ClientError::HandlerFault`] report and keeps going.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler could not process the payload.
    #[error("handler failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// Handler exceeded the configured per-handler timeout.
    #[error("handler timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    ///
    /// # Example
    /// ```
    /// use evlink::HandlerError;
    ///
    /// let err = HandlerError::fail("bad payload");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn fail(reason: impl Into<String>) -> Self {
        HandlerError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Timeout { .. } => "handler_timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_keeps_transport_source() {
        let err = ClientError::Send(TransportError::Closed);
        assert_eq!(err.as_label(), "send_failed");
        assert_eq!(err.to_string(), "send failed: link closed");
    }
}
