//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! UI-facing surface of the application decoupled from I/O and engine
//! mechanics. The engine owns the conversation view; App holds only
//! what the engine does not — the transient status line — and turns
//! user intents into [`crate::AppAction`] instructions.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs
//! and produces [`crate::AppAction`] instructions for the runtime to
//! execute.

use palaver_proto::{ConversationKey, GroupId};

use crate::{AppAction, AppEvent};

/// UI-facing application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::ConnectionChanged
            | AppEvent::ConversationsUpdated
            | AppEvent::MessagesUpdated => vec![AppAction::Render],
            AppEvent::Notice { message } => {
                self.status_message = Some(message);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Initiate connection to the server.
    pub fn connect(&self) -> Vec<AppAction> {
        vec![AppAction::Connect, AppAction::Render]
    }

    /// Open a conversation.
    pub fn select_conversation(
        &self,
        key: ConversationKey,
        name: impl Into<String>,
    ) -> Vec<AppAction> {
        vec![AppAction::SelectConversation { key, name: name.into() }, AppAction::Render]
    }

    /// Send a message to the active conversation.
    pub fn send_message(&self, content: impl Into<String>) -> Vec<AppAction> {
        vec![AppAction::SendMessage { content: content.into() }, AppAction::Render]
    }

    /// Leave the specified group room.
    pub fn leave_group(&self, group_id: GroupId) -> Vec<AppAction> {
        vec![AppAction::LeaveGroup { group_id }, AppAction::Render]
    }

    /// End the session.
    pub fn logout(&mut self) -> Vec<AppAction> {
        self.status_message = Some("Logged out".into());
        vec![AppAction::Logout, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
