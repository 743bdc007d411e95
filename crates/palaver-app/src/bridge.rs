//! Engine-to-application translation layer.
//!
//! The [`Bridge`] wraps the sans-IO [`palaver_client::Client`] and
//! adapts it to the application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] intents into engine
//!   events and feeds them through the state machine.
//! - Accumulates outgoing [`ClientCommand`]s and history-fetch work
//!   items for the runtime to execute in the next I/O cycle.
//! - Interprets engine results and converts them back into
//!   [`crate::AppEvent`]s to update the UI.

use palaver_client::{Client, ClientAction, ClientError, ClientEvent, SocketEvent};
use palaver_proto::{ClientCommand, Conversation, ConversationKey, Message, ServerEvent, Session};

use crate::{AppAction, AppEvent};

/// A history-collaborator request the runtime must execute.
///
/// Completions are fed back through the matching `handle_*` method on
/// the bridge, tagged with the key they were issued for so the engine
/// can discard stale responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    /// Re-fetch the conversation list.
    Conversations,
    /// Fetch message history for one conversation.
    History(ConversationKey),
}

/// Bridge between App intents and the engine.
pub struct Bridge {
    client: Client,
    outgoing: Vec<ClientCommand>,
    fetches: Vec<FetchRequest>,
    disconnect_requested: bool,
}

impl Bridge {
    /// Create a new Bridge for the given session.
    pub fn new(session: Session) -> Self {
        Self {
            client: Client::new(session),
            outgoing: Vec::new(),
            fetches: Vec::new(),
            disconnect_requested: false,
        }
    }

    /// The wrapped engine, for read-only rendering.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::SelectConversation { key, name } => {
                let mut events = self.dispatch(ClientEvent::SelectConversation { key, name });
                events.push(AppEvent::MessagesUpdated);
                events
            },
            AppAction::SendMessage { content } => {
                self.dispatch(ClientEvent::SendMessage { content })
            },
            AppAction::LeaveGroup { group_id } => {
                self.dispatch(ClientEvent::LeaveGroup { group_id })
            },
            AppAction::Logout => {
                let mut events = self.dispatch(ClientEvent::Logout);
                events.push(AppEvent::ConnectionChanged);
                events
            },
            AppAction::Render | AppAction::Quit | AppAction::Connect => vec![],
        }
    }

    /// Handle a lifecycle signal or decoded event from the socket.
    pub fn handle_socket_event(&mut self, event: SocketEvent) -> Vec<AppEvent> {
        match event {
            SocketEvent::Connecting => {
                let mut events = self.dispatch(ClientEvent::Connecting);
                events.push(AppEvent::ConnectionChanged);
                events
            },
            SocketEvent::Connected => {
                let mut events = self.dispatch(ClientEvent::Connected);
                events.push(AppEvent::ConnectionChanged);
                events
            },
            SocketEvent::Closed => {
                let mut events = self.dispatch(ClientEvent::Disconnected);
                events.push(AppEvent::ConnectionChanged);
                events
            },
            SocketEvent::Event(ServerEvent::Greeting { message }) => {
                self.dispatch(ClientEvent::Greeted { message })
            },
            SocketEvent::Event(ServerEvent::NewMessage(message)) => {
                let mut events = self.dispatch(ClientEvent::MessageArrived(message));
                events.push(AppEvent::MessagesUpdated);
                events
            },
        }
    }

    /// Feed a completed conversation-list fetch back to the engine.
    pub fn handle_conversations_loaded(
        &mut self,
        conversations: Vec<Conversation>,
    ) -> Vec<AppEvent> {
        let mut events = self.dispatch(ClientEvent::ConversationsLoaded(conversations));
        events.push(AppEvent::ConversationsUpdated);
        events
    }

    /// Surface a failed conversation-list fetch.
    ///
    /// There is no engine state to roll back — the previous list simply
    /// stays visible.
    pub fn handle_conversations_failed(&mut self, reason: String) -> Vec<AppEvent> {
        tracing::warn!(%reason, "conversation list fetch failed");
        vec![AppEvent::Error { message: format!("history fetch failed: {reason}") }]
    }

    /// Feed a completed history fetch back to the engine.
    pub fn handle_history_loaded(
        &mut self,
        key: ConversationKey,
        messages: Vec<Message>,
    ) -> Vec<AppEvent> {
        let mut events = self.dispatch(ClientEvent::HistoryLoaded { key, messages });
        events.push(AppEvent::MessagesUpdated);
        events
    }

    /// Feed a failed history fetch back to the engine.
    pub fn handle_history_failed(&mut self, key: ConversationKey, reason: String) -> Vec<AppEvent> {
        self.dispatch(ClientEvent::HistoryFailed { key, reason })
    }

    /// Report a command the driver failed to deliver.
    pub fn handle_command_failed(&mut self, command: ClientCommand, reason: String) -> Vec<AppEvent> {
        self.dispatch(ClientEvent::CommandFailed { command, reason })
    }

    /// Take pending outgoing commands.
    pub fn take_outgoing(&mut self) -> Vec<ClientCommand> {
        std::mem::take(&mut self.outgoing)
    }

    /// Take pending history-collaborator requests.
    pub fn take_fetch_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.fetches)
    }

    /// Whether the engine asked for the connection to be torn down.
    pub fn take_disconnect_request(&mut self) -> bool {
        std::mem::take(&mut self.disconnect_requested)
    }

    fn dispatch(&mut self, event: ClientEvent) -> Vec<AppEvent> {
        match self.client.handle(event) {
            Ok(actions) => self.process_client_actions(actions),
            Err(ClientError::EmptyContent) => {
                // Silent rejection: no state changed, nothing to surface.
                tracing::debug!("ignoring send with no content or no active conversation");
                vec![]
            },
            Err(e) => vec![AppEvent::Error { message: e.to_string() }],
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ClientAction::Send(command) => self.outgoing.push(command),
                ClientAction::FetchConversations => self.fetches.push(FetchRequest::Conversations),
                ClientAction::FetchHistory(key) => self.fetches.push(FetchRequest::History(key)),
                ClientAction::Notify { message } => events.push(AppEvent::Notice { message }),
                ClientAction::Disconnect => self.disconnect_requested = true,
            }
        }

        events
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use palaver_proto::{Recipient, User};

    use super::*;

    fn bridge() -> Bridge {
        let session = Session {
            user: User { id: 1, username: "alice".into(), email: "alice@example.com".into() },
            token: "s3cr3t".into(),
        };
        let mut bridge = Bridge::new(session);
        let _ = bridge.handle_socket_event(SocketEvent::Connected);
        let _ = bridge.take_fetch_requests();
        bridge
    }

    #[test]
    fn select_conversation_queues_history_fetch() {
        let mut bridge = bridge();
        let _ = bridge.process_app_action(AppAction::SelectConversation {
            key: ConversationKey::Direct { peer_id: 42 },
            name: "bob".into(),
        });

        assert_eq!(bridge.take_fetch_requests(), vec![FetchRequest::History(
            ConversationKey::Direct { peer_id: 42 }
        )]);
    }

    #[test]
    fn send_produces_outgoing_command() {
        let mut bridge = bridge();
        let _ = bridge.process_app_action(AppAction::SelectConversation {
            key: ConversationKey::Group { group_id: 7 },
            name: "backend".into(),
        });
        let _ = bridge.take_outgoing();

        let events = bridge.process_app_action(AppAction::SendMessage { content: "hi".into() });

        assert!(events.iter().all(|e| !matches!(e, AppEvent::Error { .. })));
        assert_eq!(bridge.take_outgoing(), vec![ClientCommand::SendGroupMessage {
            group_id: 7,
            content: "hi".into(),
        }]);
    }

    #[test]
    fn empty_send_is_silently_rejected() {
        let mut bridge = bridge();
        let events = bridge.process_app_action(AppAction::SendMessage { content: "  ".into() });

        assert!(events.is_empty());
        assert!(bridge.take_outgoing().is_empty());
    }

    #[test]
    fn greeting_becomes_a_notice() {
        let mut bridge = bridge();
        let events = bridge.handle_socket_event(SocketEvent::Event(ServerEvent::Greeting {
            message: "Connected to chat server".into(),
        }));

        assert_eq!(events, vec![AppEvent::Notice {
            message: "Connected to chat server".into()
        }]);
    }

    #[test]
    fn arrived_message_refreshes_conversations() {
        let mut bridge = bridge();
        let message = Message {
            id: 101,
            sender_id: 2,
            sender_username: "bob".into(),
            content: "hi".into(),
            created_at: chrono::DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
            recipient: Recipient::Direct { receiver_id: 1 },
            receiver_username: None,
            group_name: None,
            is_read: false,
        };

        let events = bridge.handle_socket_event(SocketEvent::Event(ServerEvent::NewMessage(message)));

        assert!(events.contains(&AppEvent::MessagesUpdated));
        assert_eq!(bridge.take_fetch_requests(), vec![FetchRequest::Conversations]);
    }

    #[test]
    fn history_failure_surfaces_an_error() {
        let mut bridge = bridge();
        let key = ConversationKey::Direct { peer_id: 42 };
        let _ = bridge.process_app_action(AppAction::SelectConversation {
            key,
            name: "bob".into(),
        });

        let events = bridge.handle_history_failed(key, "http 500".into());
        assert!(events.iter().any(|e| matches!(e, AppEvent::Error { .. })));
    }

    #[test]
    fn logout_requests_disconnect() {
        let mut bridge = bridge();
        let _ = bridge.process_app_action(AppAction::Logout);

        assert!(bridge.take_disconnect_request());
        assert!(!bridge.take_disconnect_request());
    }
}
