//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific
//! I/O implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles
//! all orchestration.

use std::future::Future;

use palaver_client::{Client, SocketEvent};
use palaver_proto::{ClientCommand, Conversation, ConversationKey, Message};

use crate::{App, AppAction};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This
/// ensures the same orchestration code runs in production and in
/// deterministic simulation.
///
/// # Implementations
///
/// - **Production**: `palaver-client`'s `transport` feature for the
///   WebSocket push channel and `rest::HistoryClient` for fetches
/// - **Simulation**: scripted queues and fixture responses
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next user intent.
    ///
    /// Returns an action or `None` if none is ready. The driver owns
    /// input decoding; the runtime only sees typed intents.
    fn poll_action(&mut self)
    -> impl Future<Output = Result<Option<AppAction>, Self::Error>> + Send;

    /// Establish the push-channel connection.
    ///
    /// Calling this while already connected is a no-op. Transport-level
    /// retry, backoff and downgrade strategies live behind this method
    /// and are invisible to the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Check if the push channel is connected.
    fn is_connected(&self) -> bool;

    /// Emit a command on the push channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the send fails.
    fn send_command(
        &mut self,
        command: ClientCommand,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receive the next socket event.
    ///
    /// Returns `None` if no event is ready or the connection closed.
    fn recv_socket_event(&mut self) -> impl Future<Output = Option<SocketEvent>> + Send;

    /// Fetch the conversation list from the history collaborator.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the runtime surfaces it
    /// as a transient indicator and keeps prior state.
    fn fetch_conversations(
        &mut self,
    ) -> impl Future<Output = Result<Vec<Conversation>, Self::Error>> + Send;

    /// Fetch message history for a conversation, ordered by
    /// `created_at` ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn fetch_messages(
        &mut self,
        key: ConversationKey,
    ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// The engine exposes the conversation view read-only; the App adds
    /// the status surface.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App, client: &Client) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
