//! Client state machine.
//!
//! The [`Client`] is the top-level state machine for one authenticated
//! session. It owns the connection lifecycle state, the room membership
//! tracker and the conversation view, and routes every event through a
//! single exhaustive dispatch — state is looked up fresh on each event,
//! never captured at subscription time.

use palaver_proto::{
    ClientCommand, Conversation, ConversationKey, GroupId, Message, Session, User,
};

use crate::{
    error::ClientError,
    event::{ClientAction, ClientEvent},
    membership::MembershipTracker,
    sync::{ActiveConversation, ConversationSync},
};

/// Connection lifecycle state of the push channel.
///
/// Transitions only in response to transport lifecycle events; business
/// logic never sets it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected to the server.
    #[default]
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Connected with an established session.
    Connected,
}

/// Conversation synchronization engine for one authenticated session.
///
/// Pure state machine: it consumes [`ClientEvent`] inputs and produces
/// [`ClientAction`] instructions for the caller to execute. No I/O
/// dependencies — fully testable without a network.
#[derive(Debug, Clone)]
pub struct Client {
    /// Identity and credential from the auth collaborator.
    session: Session,
    /// Push-channel lifecycle state.
    connection: ConnectionState,
    /// Group rooms the session participates in.
    membership: MembershipTracker,
    /// Conversation list, active conversation and visible messages.
    sync: ConversationSync,
}

impl Client {
    /// Create an engine for the given session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            connection: ConnectionState::Disconnected,
            membership: MembershipTracker::new(),
            sync: ConversationSync::new(),
        }
    }

    /// Verify the session carries a usable credential.
    ///
    /// # Errors
    ///
    /// [`ClientError::AuthRequired`] when the credential is absent or
    /// blank. Fatal: callers must not attempt a connection.
    pub fn ensure_authenticated(&self) -> Result<(), ClientError> {
        if self.session.is_valid() { Ok(()) } else { Err(ClientError::AuthRequired) }
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Connecting => self.handle_connecting(),
            ClientEvent::Connected => self.handle_connected(),
            ClientEvent::Disconnected => self.handle_disconnected(),
            ClientEvent::Greeted { message } => Ok(vec![ClientAction::Notify { message }]),
            ClientEvent::MessageArrived(message) => self.handle_message_arrived(message),
            ClientEvent::ConversationsLoaded(conversations) => {
                self.sync.set_conversations(conversations);
                Ok(vec![])
            },
            ClientEvent::HistoryLoaded { key, messages } => {
                self.handle_history_loaded(key, messages)
            },
            ClientEvent::HistoryFailed { key, reason } => self.handle_history_failed(key, reason),
            ClientEvent::SelectConversation { key, name } => self.handle_select(key, name),
            ClientEvent::SendMessage { content } => self.handle_send_message(&content),
            ClientEvent::LeaveGroup { group_id } => self.handle_leave_group(group_id),
            ClientEvent::CommandFailed { command, reason } => {
                self.handle_command_failed(command, reason)
            },
            ClientEvent::Logout => self.handle_logout(),
        }
    }

    fn handle_connecting(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        self.connection = ConnectionState::Connecting;
        Ok(vec![])
    }

    /// Handle an established transport session.
    ///
    /// The transport does not persist room membership across reconnects,
    /// so every tracked group is re-joined, and the conversation list is
    /// refreshed to pick up anything missed while offline. A `Connected`
    /// event while already connected is a no-op.
    fn handle_connected(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        if self.connection == ConnectionState::Connected {
            return Ok(vec![]);
        }

        self.connection = ConnectionState::Connected;
        tracing::info!(user = %self.session.user.username, "push channel connected");

        let mut actions: Vec<ClientAction> = self
            .membership
            .resync()
            .into_iter()
            .map(|group_id| ClientAction::Send(ClientCommand::JoinGroup { group_id }))
            .collect();

        actions.push(ClientAction::FetchConversations);
        Ok(actions)
    }

    fn handle_disconnected(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        // Membership is kept for resync on the next Connected.
        self.connection = ConnectionState::Disconnected;
        tracing::info!("push channel disconnected");
        Ok(vec![])
    }

    /// Handle a newly arrived message from the push channel.
    ///
    /// The message joins the visible list only when it is routable to
    /// the active conversation and its id is not already present.
    /// Regardless of relevance, the conversation list is re-fetched so
    /// `last_message` summaries reflect the newest state.
    fn handle_message_arrived(
        &mut self,
        message: Message,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if self.sync.is_relevant(&message, self.session.user.id) {
            let id = message.id;
            if !self.sync.append_if_new(message) {
                tracing::debug!(message_id = id, "dropping duplicate delivery");
            }
        }

        Ok(vec![ClientAction::FetchConversations])
    }

    fn handle_history_loaded(
        &mut self,
        key: ConversationKey,
        messages: Vec<Message>,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if !self.sync.apply_history(key, messages) {
            tracing::debug!(?key, "discarding stale history response");
        }
        Ok(vec![])
    }

    fn handle_history_failed(
        &mut self,
        key: ConversationKey,
        reason: String,
    ) -> Result<Vec<ClientAction>, ClientError> {
        // Prior visible state stays untouched; the caller surfaces a
        // transient indicator.
        if !self.sync.history_failed(key) {
            tracing::debug!(?key, "ignoring stale history failure");
            return Ok(vec![]);
        }

        Err(ClientError::HistoryFetch { reason })
    }

    /// Switch the visible conversation.
    ///
    /// Clears the visible list, requests history for the new
    /// conversation, and for groups registers room membership. Direct
    /// conversations have no room concept and never trigger a join.
    fn handle_select(
        &mut self,
        key: ConversationKey,
        name: String,
    ) -> Result<Vec<ClientAction>, ClientError> {
        self.sync.activate(key, name);

        let mut actions = vec![ClientAction::FetchHistory(key)];
        if let ConversationKey::Group { group_id } = key
            && self.membership.join(group_id)
        {
            actions.push(ClientAction::Send(ClientCommand::JoinGroup { group_id }));
        }

        Ok(actions)
    }

    /// Resolve a send intent into an outbound command.
    ///
    /// Fire-and-forget: no local echo — the message becomes visible only
    /// when the server delivers it back through the arrived-message
    /// path.
    fn handle_send_message(&mut self, content: &str) -> Result<Vec<ClientAction>, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::EmptyContent);
        }

        let Some(active) = self.sync.active() else {
            return Err(ClientError::EmptyContent);
        };

        let command = match active.key {
            ConversationKey::Direct { peer_id } => ClientCommand::SendDirectMessage {
                receiver_id: peer_id,
                content: content.to_owned(),
            },
            ConversationKey::Group { group_id } => {
                ClientCommand::SendGroupMessage { group_id, content: content.to_owned() }
            },
        };

        Ok(vec![ClientAction::Send(command)])
    }

    fn handle_leave_group(&mut self, group_id: GroupId) -> Result<Vec<ClientAction>, ClientError> {
        if self.membership.leave(group_id) {
            Ok(vec![ClientAction::Send(ClientCommand::LeaveGroup { group_id })])
        } else {
            Ok(vec![])
        }
    }

    /// Handle a command the transport failed to deliver.
    ///
    /// An optimistic join is rolled back so membership converges with
    /// the server; the failure is surfaced either way and the caller
    /// decides whether to resubmit — the engine never retries.
    fn handle_command_failed(
        &mut self,
        command: ClientCommand,
        reason: String,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if let ClientCommand::JoinGroup { group_id } = command {
            self.membership.evict(group_id);
        }

        Err(ClientError::Transport { reason })
    }

    fn handle_logout(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        self.connection = ConnectionState::Disconnected;
        self.membership.clear();
        self.sync.reset();
        Ok(vec![ClientAction::Disconnect])
    }

    /// Session supplied by the auth collaborator.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The authenticated local user.
    pub fn local_user(&self) -> &User {
        &self.session.user
    }

    /// Current push-channel lifecycle state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Conversation list as last fetched, newest activity first.
    pub fn conversations(&self) -> &[Conversation] {
        self.sync.conversations()
    }

    /// Currently active conversation. `None` if nothing is open.
    pub fn active_conversation(&self) -> Option<&ActiveConversation> {
        self.sync.active()
    }

    /// Visible messages of the active conversation, in append order.
    pub fn messages(&self) -> &[Message] {
        self.sync.messages()
    }

    /// Group rooms the session currently participates in.
    pub fn membership(&self) -> &MembershipTracker {
        &self.membership
    }
}
