//! REST history-fetch collaborator.
//!
//! The request/response side of synchronization: the conversation list
//! and per-conversation message history, both served by the API the
//! push channel's server also backs. Responses are the authoritative
//! baseline the engine reconciles push events against.

use palaver_proto::{Conversation, ConversationKey, Message, Session};
use thiserror::Error;

/// History-fetch errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Request could not be built, sent, or its body decoded.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the session credential.
    #[error("authentication required")]
    AuthRequired,

    /// The server returned an unexpected status.
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the history-fetch collaborator.
///
/// All requests present the session cookie; a `401` maps to
/// [`HistoryError::AuthRequired`] so callers can route back to login.
pub struct HistoryClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl HistoryClient {
    /// Create a client rooted at `api_base` (e.g. `http://host/api`).
    pub fn new(api_base: impl Into<String>, session: &Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            token: session.token.clone(),
        }
    }

    /// Fetch the conversation list, ordered by newest activity first.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, HistoryError> {
        self.get_json(&format!("{}/conversations", self.api_base)).await
    }

    /// Fetch message history for one conversation, ordered by
    /// `created_at` ascending.
    pub async fn messages(&self, key: ConversationKey) -> Result<Vec<Message>, HistoryError> {
        let url = match key {
            ConversationKey::Direct { peer_id } => {
                format!("{}/messages/direct/{peer_id}", self.api_base)
            },
            ConversationKey::Group { group_id } => {
                format!("{}/messages/group/{group_id}", self.api_base)
            },
        };

        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, HistoryError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::COOKIE, format!("session={}", self.token))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(HistoryError::AuthRequired);
        }
        if !response.status().is_success() {
            return Err(HistoryError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
