//! Inbound server events and the envelope decoder.

use serde::{Deserialize, Serialize};

use crate::{error::ProtocolError, model::Message};

/// Events pushed by the server over the event channel.
///
/// Decoding is tolerant by contract: an envelope whose `event` name is
/// not recognized yields [`ProtocolError::UnknownEvent`], which callers
/// drop with a logged warning instead of propagating. Server-side
/// protocol additions must never crash the inbound pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Post-connect greeting (`connected` on the wire).
    #[serde(rename = "connected")]
    Greeting {
        /// Human-readable server banner.
        message: String,
    },

    /// A newly created message (`new_message` on the wire).
    NewMessage(Message),
}

/// Generic event envelope: `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GreetingData {
    #[serde(default)]
    message: String,
}

impl ServerEvent {
    /// Wire name of this event.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Greeting { .. } => "connected",
            Self::NewMessage(_) => "new_message",
        }
    }

    /// Decode a raw text frame into a typed event.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnknownEvent`] for names this client does not
    /// understand, [`ProtocolError::Json`] for malformed envelopes or
    /// payloads.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(raw)?;

        match envelope.event.as_str() {
            "connected" => {
                let greeting: GreetingData = serde_json::from_value(envelope.data)?;
                Ok(Self::Greeting { message: greeting.message })
            },
            "new_message" => Ok(Self::NewMessage(serde_json::from_value(envelope.data)?)),
            _ => Err(ProtocolError::UnknownEvent { name: envelope.event }),
        }
    }

    /// Encode into a text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn greeting_decodes_from_wire_name() {
        let event = ServerEvent::decode(
            r#"{"event": "connected", "data": {"message": "Connected to chat server"}}"#,
        )
        .unwrap();

        assert_eq!(event, ServerEvent::Greeting { message: "Connected to chat server".into() });
        assert_eq!(event.event_name(), "connected");
    }

    #[test]
    fn unknown_event_is_a_typed_error() {
        let err = ServerEvent::decode(r#"{"event": "user_typing", "data": {}}"#).unwrap_err();

        match err {
            ProtocolError::UnknownEvent { name } => assert_eq!(name, "user_typing"),
            other => panic!("expected UnknownEvent, got {other}"),
        }
    }

    #[test]
    fn malformed_envelope_is_a_json_error() {
        let err = ServerEvent::decode("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let event = ServerEvent::Greeting { message: "hello".into() };
        let decoded = ServerEvent::decode(&event.encode().unwrap()).unwrap();
        assert_eq!(decoded, event);
    }
}
