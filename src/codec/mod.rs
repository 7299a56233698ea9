//! Message model and wire codecs.
//!
//! ## Contents
//! - [`EventName`], [`Message`], [`Payload`] the message model
//! - [`Codec`] frame encode/decode seam between the dispatcher and the transport
//! - [`JsonCodec`] default `["name", args...]` JSON codec

mod json;
mod message;

pub use json::JsonCodec;
pub use message::{EventName, InboundMessage, Message, OutboundMessage, Payload};

use crate::error::CodecError;

/// Converts between transport frames and [`Message`]s.
///
/// Implementations must be stateless or internally synchronized: the client
/// encodes from any task and decodes on the connection actor.
pub trait Codec: Send + Sync + 'static {
    /// Encodes an outbound message into one frame.
    fn encode(&self, msg: &OutboundMessage) -> Result<Vec<u8>, CodecError>;

    /// Decodes one inbound frame.
    fn decode(&self, frame: &[u8]) -> Result<InboundMessage, CodecError>;
}
