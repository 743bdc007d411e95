//! Engine error taxonomy.

use thiserror::Error;

/// Errors surfaced by the [`crate::Client`] engine.
///
/// Only [`ClientError::AuthRequired`] is fatal to the synchronization
/// loop; everything else degrades to stale-but-consistent local state
/// plus a surfaced warning.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No valid session credential at connect time.
    #[error("authentication required")]
    AuthRequired,

    /// The transport failed to carry an outbound command.
    #[error("transport failure: {reason}")]
    Transport {
        /// Description from the transport layer.
        reason: String,
    },

    /// Send pipeline precondition: blank content, or no conversation is
    /// active to address.
    #[error("nothing to send")]
    EmptyContent,

    /// A history-collaborator request failed.
    #[error("history fetch failed: {reason}")]
    HistoryFetch {
        /// Description from the fetch layer.
        reason: String,
    },
}
