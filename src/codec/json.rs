//! # JSON array codec.
//!
//! Frames are JSON arrays whose first element is the event name:
//!
//! ```text
//! ["map-clear"]                          → ("map-clear", null)
//! ["init-connection", {"user":"x"}]      → ("init-connection", {"user":"x"})
//! ["game-state", {"tick":3}, {"full":1}] → ("game-state", [{"tick":3}, {"full":1}])
//! ```
//!
//! Encoding is the inverse for the first two shapes: `Null` payloads are
//! written as `["name"]`, anything else as `["name", payload]`.

use serde_json::Value;

use crate::codec::{Codec, EventName, Message};
use crate::error::CodecError;

/// Default [`Codec`]: `["name", args...]` JSON arrays.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, CodecError> {
        let mut frame = Vec::with_capacity(2);
        frame.push(Value::String(msg.event.as_str().to_string()));
        if !msg.payload.is_null() {
            frame.push(msg.payload.clone());
        }
        Ok(serde_json::to_vec(&frame)?)
    }

    fn decode(&self, frame: &[u8]) -> Result<Message, CodecError> {
        let Value::Array(mut items) = serde_json::from_slice::<Value>(frame)? else {
            return Err(CodecError::Malformed {
                reason: "frame is not an array",
            });
        };
        if items.is_empty() {
            return Err(CodecError::Malformed {
                reason: "frame is empty",
            });
        }

        let name = match items.remove(0) {
            Value::String(s) => s,
            _ => {
                return Err(CodecError::Malformed {
                    reason: "event name is not a string",
                });
            }
        };
        let event = EventName::new(name).map_err(|_| CodecError::Malformed {
            reason: "event name is empty",
        })?;

        let payload = match items.len() {
            0 => Value::Null,
            1 => items.remove(0),
            _ => Value::Array(items),
        };
        Ok(Message { event, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: &str) -> Result<Message, CodecError> {
        JsonCodec.decode(raw.as_bytes())
    }

    #[test]
    fn test_decode_single_argument() {
        let msg = decode(r#"["init-connection",{"user":"x"}]"#).unwrap();
        assert_eq!(msg.event.as_str(), "init-connection");
        assert_eq!(msg.payload, json!({"user": "x"}));
    }

    #[test]
    fn test_decode_without_argument_is_null() {
        let msg = decode(r#"["map-clear"]"#).unwrap();
        assert_eq!(msg.payload, Value::Null);
    }

    #[test]
    fn test_decode_multiple_arguments_become_array() {
        let msg = decode(r#"["game-state",{"tick":3},{"full":true}]"#).unwrap();
        assert_eq!(msg.payload, json!([{"tick": 3}, {"full": true}]));
    }

    #[test]
    fn test_decode_rejects_malformed_frames() {
        assert!(matches!(decode(r#"{"event":"x"}"#), Err(CodecError::Malformed { .. })));
        assert!(matches!(decode("[]"), Err(CodecError::Malformed { .. })));
        assert!(matches!(decode("[42, 1]"), Err(CodecError::Malformed { .. })));
        assert!(matches!(decode(r#"["", 1]"#), Err(CodecError::Malformed { .. })));
        assert!(matches!(decode("not json"), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_encode_omits_null_payload() {
        let msg = Message::new(EventName::new("ping").unwrap(), Value::Null);
        assert_eq!(JsonCodec.encode(&msg).unwrap(), br#"["ping"]"#.to_vec());

        let msg = Message::new(EventName::new("c-player").unwrap(), json!("alice"));
        assert_eq!(JsonCodec.encode(&msg).unwrap(), br#"["c-player","alice"]"#.to_vec());
    }
}
