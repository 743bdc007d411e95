//! Outbound client commands.

use serde::{Deserialize, Serialize};

use crate::{
    error::ProtocolError,
    model::{GroupId, UserId},
};

/// Commands the client emits over the event channel.
///
/// Every command is fire-and-forget: the server does not acknowledge
/// receipt, and a sent message becomes visible only when it is echoed
/// back as a `new_message` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    /// `send_direct_message {receiver_id, content}`.
    SendDirectMessage {
        /// Receiving user.
        receiver_id: UserId,
        /// Message body.
        content: String,
    },

    /// `send_group_message {group_id, content}`.
    SendGroupMessage {
        /// Target group room.
        group_id: GroupId,
        /// Message body.
        content: String,
    },

    /// `join_group {group_id}`.
    JoinGroup {
        /// Group room to register for pushes.
        group_id: GroupId,
    },

    /// `leave_group {group_id}`.
    LeaveGroup {
        /// Group room to deregister from.
        group_id: GroupId,
    },
}

impl ClientCommand {
    /// Wire name of this command.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::SendDirectMessage { .. } => "send_direct_message",
            Self::SendGroupMessage { .. } => "send_group_message",
            Self::JoinGroup { .. } => "join_group",
            Self::LeaveGroup { .. } => "leave_group",
        }
    }

    /// Encode into a text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
