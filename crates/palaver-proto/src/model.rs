//! Domain model shared by the push channel and the REST collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Stable user identifier assigned by the server.
pub type UserId = u64;

/// Stable group identifier assigned by the server.
pub type GroupId = u64;

/// Server-assigned message identifier; the sole deduplication key.
pub type MessageId = u64;

/// Authenticated local user identity.
///
/// Supplied by the auth collaborator at login and immutable for the
/// lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id.
    pub id: UserId,
    /// Display and login name.
    pub username: String,
    /// Account email.
    pub email: String,
}

/// Session handed over by the auth collaborator.
///
/// Carries the local identity plus the opaque credential the transport
/// presents when connecting. The engine never inspects the credential
/// beyond checking that one is present.
#[derive(Debug, Clone)]
pub struct Session {
    /// The authenticated local user.
    pub user: User,
    /// Opaque session credential (cookie value).
    pub token: String,
}

impl Session {
    /// Whether the session carries a usable credential.
    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Routing class of a message. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// One-to-one message addressed to a single user.
    Direct {
        /// Receiving user.
        receiver_id: UserId,
    },
    /// Message fanned out to a group room.
    Group {
        /// Target group.
        group_id: GroupId,
    },
}

/// A chat message as created and delivered by the server.
///
/// `id` is server-assigned and is the sole deduplication key. On the
/// wire the message carries both optional routing columns
/// (`receiver_id`, `group_id`); decoding enforces that exactly one is
/// populated and folds them into [`Recipient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageDto", into = "MessageDto")]
pub struct Message {
    /// Server-assigned id.
    pub id: MessageId,
    /// Author id.
    pub sender_id: UserId,
    /// Author display name.
    pub sender_username: String,
    /// Message body.
    pub content: String,
    /// Server-side creation time.
    pub created_at: DateTime<Utc>,
    /// Direct or group routing.
    pub recipient: Recipient,
    /// Receiver display name, when the server resolved one.
    pub receiver_username: Option<String>,
    /// Group display name, when the server resolved one.
    pub group_name: Option<String>,
    /// Server-side read marker.
    pub is_read: bool,
}

impl Message {
    /// Receiver id if this is a direct message.
    pub fn receiver_id(&self) -> Option<UserId> {
        match self.recipient {
            Recipient::Direct { receiver_id } => Some(receiver_id),
            Recipient::Group { .. } => None,
        }
    }

    /// Group id if this is a group message.
    pub fn group_id(&self) -> Option<GroupId> {
        match self.recipient {
            Recipient::Direct { .. } => None,
            Recipient::Group { group_id } => Some(group_id),
        }
    }
}

/// Raw wire shape of a message (the server's `Message.to_dict`).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageDto {
    id: MessageId,
    content: String,
    sender_id: UserId,
    #[serde(default)]
    sender_username: Option<String>,
    #[serde(default)]
    receiver_id: Option<UserId>,
    #[serde(default)]
    receiver_username: Option<String>,
    #[serde(default)]
    group_id: Option<GroupId>,
    #[serde(default)]
    group_name: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    is_read: bool,
}

impl TryFrom<MessageDto> for Message {
    type Error = ProtocolError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        let recipient = match (dto.receiver_id, dto.group_id) {
            (Some(receiver_id), None) => Recipient::Direct { receiver_id },
            (None, Some(group_id)) => Recipient::Group { group_id },
            (Some(_), Some(_)) => return Err(ProtocolError::AmbiguousRouting { id: dto.id }),
            (None, None) => return Err(ProtocolError::MissingRouting { id: dto.id }),
        };

        Ok(Self {
            id: dto.id,
            sender_id: dto.sender_id,
            sender_username: dto.sender_username.unwrap_or_default(),
            content: dto.content,
            created_at: dto.created_at,
            recipient,
            receiver_username: dto.receiver_username,
            group_name: dto.group_name,
            is_read: dto.is_read,
        })
    }
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        let (receiver_id, group_id) = match message.recipient {
            Recipient::Direct { receiver_id } => (Some(receiver_id), None),
            Recipient::Group { group_id } => (None, Some(group_id)),
        };

        Self {
            id: message.id,
            content: message.content,
            sender_id: message.sender_id,
            sender_username: Some(message.sender_username),
            receiver_id,
            receiver_username: message.receiver_username,
            group_id,
            group_name: message.group_name,
            created_at: message.created_at,
            is_read: message.is_read,
        }
    }
}

/// Identity of a conversation: kind plus counterpart id.
///
/// Two conversations are the same iff kind and id match. This is the key
/// used for routing decisions and the stale-history guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKey {
    /// One-to-one thread with a peer user.
    Direct {
        /// The other participant.
        peer_id: UserId,
    },
    /// Group thread; receiving pushes requires room membership.
    Group {
        /// The group room.
        group_id: GroupId,
    },
}

/// Entry in the conversation list returned by the history collaborator.
///
/// Ephemeral view object: rebuilt on every list fetch, never treated as
/// a source of truth for persistence. The server orders the list by
/// newest activity first; the client does not re-sort it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConversationDto", into = "ConversationDto")]
pub struct Conversation {
    /// Conversation identity.
    pub key: ConversationKey,
    /// Display name (peer username or group name).
    pub name: String,
    /// Most recent message, if any.
    pub last_message: Option<Message>,
}

/// Raw wire shape of a conversation-list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConversationDto {
    #[serde(rename = "type")]
    kind: ConversationKind,
    id: u64,
    name: String,
    #[serde(default)]
    last_message: Option<Message>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConversationKind {
    Direct,
    Group,
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        let key = match dto.kind {
            ConversationKind::Direct => ConversationKey::Direct { peer_id: dto.id },
            ConversationKind::Group => ConversationKey::Group { group_id: dto.id },
        };

        Self { key, name: dto.name, last_message: dto.last_message }
    }
}

impl From<Conversation> for ConversationDto {
    fn from(conversation: Conversation) -> Self {
        let (kind, id) = match conversation.key {
            ConversationKey::Direct { peer_id } => (ConversationKind::Direct, peer_id),
            ConversationKey::Group { group_id } => (ConversationKind::Group, group_id),
        };

        Self { kind, id, name: conversation.name, last_message: conversation.last_message }
    }
}
