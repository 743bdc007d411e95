//! Engine events and actions.

use palaver_proto::{ClientCommand, Conversation, ConversationKey, GroupId, Message, ServerEvent};

/// Events the caller feeds into the engine.
///
/// The caller is responsible for:
/// - Receiving events from the push channel in receipt order
/// - Forwarding UI intents (select conversation, send, leave, logout)
/// - Delivering history-fetch completions, tagged with the conversation
///   they were issued for
///
/// Between issuing an I/O operation and its completion other events may
/// interleave; the engine stays correct under any interleaving by
/// deduplicating on message id and guarding history results with the
/// requested conversation key.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Transport dial started.
    Connecting,

    /// Transport session established (initial connect or reconnect).
    Connected,

    /// Transport session lost or closed.
    Disconnected,

    /// Server greeting received after connect.
    Greeted {
        /// Human-readable server banner.
        message: String,
    },

    /// Push channel delivered a newly created message.
    MessageArrived(Message),

    /// Conversation-list fetch completed.
    ConversationsLoaded(Vec<Conversation>),

    /// Message-history fetch completed.
    HistoryLoaded {
        /// Conversation the fetch was issued for.
        key: ConversationKey,
        /// Messages ordered by `created_at` ascending.
        messages: Vec<Message>,
    },

    /// Message-history fetch failed.
    HistoryFailed {
        /// Conversation the fetch was issued for.
        key: ConversationKey,
        /// Failure description.
        reason: String,
    },

    /// UI switched the visible conversation.
    SelectConversation {
        /// Identity of the newly active conversation.
        key: ConversationKey,
        /// Display name for the header.
        name: String,
    },

    /// UI requested a message send to the active conversation.
    SendMessage {
        /// Raw input; trimmed before dispatch.
        content: String,
    },

    /// UI requested leaving a group room.
    LeaveGroup {
        /// Group to leave.
        group_id: GroupId,
    },

    /// An outbound command could not be delivered.
    CommandFailed {
        /// The command that failed.
        command: ClientCommand,
        /// Failure description.
        reason: String,
    },

    /// UI ended the session.
    Logout,
}

/// Actions the engine produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Emit a command on the push channel.
    Send(ClientCommand),

    /// Re-fetch the conversation list from the history collaborator.
    ///
    /// Issued on every arrived message so `last_message` summaries stay
    /// current, and after each (re)connect.
    FetchConversations,

    /// Fetch message history for a conversation.
    ///
    /// The completion must be delivered back as
    /// [`ClientEvent::HistoryLoaded`] (or `HistoryFailed`) tagged with
    /// the same key.
    FetchHistory(ConversationKey),

    /// Surface a transient notice to the user.
    Notify {
        /// Notice text.
        message: String,
    },

    /// Tear down the transport connection.
    Disconnect,
}

/// Ordered stream of transport signals, as produced by a socket driver.
///
/// Lifecycle signals and decoded payload events share one stream so the
/// engine observes them in the exact order the transport produced them.
/// `Connecting` is emitted by the dialer before the handshake; the
/// socket task emits the rest.
#[derive(Debug, Clone)]
pub enum SocketEvent {
    /// Dial started.
    Connecting,

    /// Session established.
    Connected,

    /// Decoded server event.
    Event(ServerEvent),

    /// Connection closed or lost.
    Closed,
}
