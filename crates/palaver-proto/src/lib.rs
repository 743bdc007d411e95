//! Wire protocol for the Palaver messaging client.
//!
//! Defines the typed boundary between the synchronization engine and the
//! server: inbound push events ([`ServerEvent`]), outbound commands
//! ([`ClientCommand`]), and the data types shared with the REST
//! history-fetch collaborator ([`Message`], [`Conversation`], [`User`]).
//!
//! # Wire format
//!
//! Push-channel traffic travels as JSON event envelopes:
//!
//! ```json
//! {"event": "new_message", "data": {"id": 101, "sender_id": 1, ...}}
//! ```
//!
//! REST responses reuse the same [`Message`] and [`Conversation`] DTOs.
//! Field names are `snake_case` as produced by the server; `created_at`
//! is an RFC 3339 timestamp.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod error;
mod event;
mod model;

pub use command::ClientCommand;
pub use error::ProtocolError;
pub use event::ServerEvent;
pub use model::{
    Conversation, ConversationKey, GroupId, Message, MessageId, Recipient, Session, User, UserId,
};
