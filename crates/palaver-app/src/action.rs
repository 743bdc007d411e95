//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents
//! instructions produced by the [`crate::App`] state machine for the
//! runtime to execute.

use palaver_proto::{ConversationKey, GroupId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Establish the push-channel connection.
    Connect,

    /// Open a conversation.
    SelectConversation {
        /// Identity of the conversation to open.
        key: ConversationKey,
        /// Display name for the header.
        name: String,
    },

    /// Send a message to the active conversation.
    SendMessage {
        /// Raw input content.
        content: String,
    },

    /// Leave a group room.
    LeaveGroup {
        /// Group to leave.
        group_id: GroupId,
    },

    /// End the session and tear the connection down.
    Logout,
}
