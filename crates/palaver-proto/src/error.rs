//! Wire protocol errors.

use thiserror::Error;

use crate::model::MessageId;

/// Errors produced while encoding or decoding wire payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Event name this client does not understand.
    ///
    /// Callers are expected to drop these with a logged warning rather
    /// than propagate them; new server-side event types must never crash
    /// the inbound pipeline.
    #[error("unknown event: {name}")]
    UnknownEvent {
        /// Wire name as received.
        name: String,
    },

    /// Malformed JSON, or a payload that does not match its schema.
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A message carrying both direct and group routing fields.
    #[error("message {id} has both receiver_id and group_id set")]
    AmbiguousRouting {
        /// Offending message id.
        id: MessageId,
    },

    /// A message carrying neither direct nor group routing fields.
    #[error("message {id} has neither receiver_id nor group_id set")]
    MissingRouting {
        /// Offending message id.
        id: MessageId,
    },
}
