//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine. Events are produced by the
//! [`crate::Bridge`] as it processes engine output; the engine itself
//! owns the conversation view, so App events only describe what kind of
//! change the UI must reflect.

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Connection indicator changed.
    ConnectionChanged,

    /// Conversation list changed.
    ConversationsUpdated,

    /// Visible message list or conversation header changed.
    MessagesUpdated,

    /// Transient informational notice.
    Notice {
        /// Notice text.
        message: String,
    },

    /// Non-fatal error to surface.
    Error {
        /// Error description.
        message: String,
    },
}
