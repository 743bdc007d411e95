//! Conversation state merge.
//!
//! [`ConversationSync`] owns the view the UI renders: the conversation
//! list, the single active conversation, and its visible message list.
//! It is where the two data sources meet — history-fetch results form
//! the baseline, push events are appended on top — and where the
//! consistency rules live: dedup by message id, routing relevance
//! against the active conversation, and the stale-history guard that
//! keeps a superseded fetch from leaking into a newer conversation.

use palaver_proto::{Conversation, ConversationKey, Message, Recipient, UserId};

/// The single conversation currently displayed, plus its header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConversation {
    /// Conversation identity.
    pub key: ConversationKey,
    /// Display name for the header.
    pub name: String,
}

/// Merges history-fetch results and push events into one consistent
/// view.
///
/// Messages are kept in append order of arrival/history-load; history
/// results arrive ordered by `created_at` ascending and are not
/// re-sorted locally. Pathological out-of-order push delivery is
/// accepted as eventual rather than strict temporal consistency.
#[derive(Debug, Clone, Default)]
pub struct ConversationSync {
    conversations: Vec<Conversation>,
    active: Option<ActiveConversation>,
    messages: Vec<Message>,
    /// Key of the conversation whose history fetch is in flight.
    pending_history: Option<ConversationKey>,
}

impl ConversationSync {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active conversation.
    ///
    /// Atomically replaces the active conversation and clears the
    /// visible list, so the header and messages never mix two
    /// conversations. Marks a history fetch for `key` as pending,
    /// superseding any fetch still in flight for the previous
    /// conversation.
    pub fn activate(&mut self, key: ConversationKey, name: String) {
        self.active = Some(ActiveConversation { key, name });
        self.messages.clear();
        self.pending_history = Some(key);
    }

    /// Routing decision for an arrived message against the active
    /// conversation.
    ///
    /// Direct: relevant iff the message travels between the local user
    /// and the active peer, in either direction. Group: relevant iff the
    /// message targets the active group. No active conversation: nothing
    /// is relevant.
    pub fn is_relevant(&self, message: &Message, local_user: UserId) -> bool {
        let Some(active) = &self.active else {
            return false;
        };

        match (active.key, message.recipient) {
            (ConversationKey::Direct { peer_id }, Recipient::Direct { receiver_id }) => {
                (message.sender_id == peer_id && receiver_id == local_user)
                    || (message.sender_id == local_user && receiver_id == peer_id)
            },
            (ConversationKey::Group { group_id }, Recipient::Group { group_id: target }) => {
                group_id == target
            },
            _ => false,
        }
    }

    /// Append a message unless its id is already visible.
    ///
    /// Returns `false` for duplicates, which are discarded silently:
    /// the transport may deliver the same message twice, and a history
    /// load may race a push carrying the same id.
    pub fn append_if_new(&mut self, message: Message) -> bool {
        if self.messages.iter().any(|existing| existing.id == message.id) {
            return false;
        }

        self.messages.push(message);
        true
    }

    /// Apply a completed history fetch.
    ///
    /// Returns `false` and leaves the view untouched when the result is
    /// stale: either a newer fetch has been issued since, or the active
    /// conversation is no longer the one the fetch was for. Otherwise
    /// the fetched list becomes the baseline and any message that
    /// arrived while the fetch was in flight is re-appended on top
    /// (dedup by id, not by position).
    pub fn apply_history(&mut self, key: ConversationKey, loaded: Vec<Message>) -> bool {
        if self.pending_history != Some(key) {
            return false;
        }
        if self.active.as_ref().map(|active| active.key) != Some(key) {
            return false;
        }

        let arrived_during_load: Vec<Message> = self
            .messages
            .drain(..)
            .filter(|message| !loaded.iter().any(|m| m.id == message.id))
            .collect();

        self.messages = loaded;
        self.messages.extend(arrived_during_load);
        self.pending_history = None;
        true
    }

    /// Record a failed history fetch.
    ///
    /// Clears the pending marker if the failure belongs to the in-flight
    /// fetch; prior visible state is always left untouched. Returns
    /// whether the failure was current (stale failures are ignored).
    pub fn history_failed(&mut self, key: ConversationKey) -> bool {
        if self.pending_history == Some(key) {
            self.pending_history = None;
            true
        } else {
            false
        }
    }

    /// Replace the conversation list with a freshly fetched one.
    ///
    /// The server orders the list by newest activity; it is not
    /// re-sorted locally.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Conversation list as last fetched.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Currently active conversation. `None` if nothing is open.
    pub fn active(&self) -> Option<&ActiveConversation> {
        self.active.as_ref()
    }

    /// Visible messages of the active conversation, in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a history fetch is still in flight.
    pub fn history_pending(&self) -> bool {
        self.pending_history.is_some()
    }

    /// Drop all view state (logout).
    pub fn reset(&mut self) {
        self.conversations.clear();
        self.active = None;
        self.messages.clear();
        self.pending_history = None;
    }
}
