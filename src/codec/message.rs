//! # Event names and messages.
//!
//! [`EventName`] is a validated, cheaply clonable, case-sensitive identifier.
//! [`Message`] pairs a name with a [`Payload`]; the same type serves as the
//! inbound and outbound message (see the [`InboundMessage`] / [`OutboundMessage`]
//! aliases).

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::ClientError;

/// Opaque message payload: any JSON value. Absent payloads are `Null`.
pub type Payload = serde_json::Value;

/// Non-empty, case-sensitive event identifier.
///
/// # Example
/// ```
/// use evlink::EventName;
///
/// let name = EventName::new("init-connection").unwrap();
/// assert_eq!(name.as_str(), "init-connection");
/// assert!(EventName::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Arc<str>);

impl EventName {
    /// Validates and wraps `name`.
    ///
    /// # Errors
    /// [`ClientError::InvalidEventName`] if `name` is empty.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ClientError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(ClientError::InvalidEventName {
                name: name.to_string(),
            });
        }
        Ok(Self(Arc::from(name)))
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EventName {
    type Error = ClientError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        EventName::new(value)
    }
}

impl TryFrom<String> for EventName {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EventName::new(value)
    }
}

/// A named event with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Event name.
    pub event: EventName,
    /// Event payload.
    pub payload: Payload,
}

/// Message decoded from an inbound frame.
pub type InboundMessage = Message;
/// Message to be encoded into an outbound frame.
pub type OutboundMessage = Message;

impl Message {
    /// Creates a message.
    pub fn new(event: EventName, payload: Payload) -> Self {
        Self { event, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_names_are_case_sensitive() {
        let lower = EventName::new("attack").unwrap();
        let upper = EventName::new("Attack").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(EventName::new("map-data").unwrap(), 1);
        assert_eq!(map.get("map-data"), Some(&1));
    }

    #[test]
    fn test_empty_name_is_rejected_with_label() {
        let err = EventName::try_from(String::new()).unwrap_err();
        assert_eq!(err.as_label(), "invalid_event_name");
    }
}
