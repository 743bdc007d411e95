//! Conversation synchronization engine.
//!
//! Sans-IO client state machine for the Palaver messaging protocol. The
//! engine reconciles two independent data sources into one consistent
//! in-memory view: the REST history-fetch collaborator (authoritative
//! baseline) and the asynchronous push channel (newly arrived messages).
//!
//! # Architecture
//!
//! The engine follows the Sans-IO, action-based pattern: it receives
//! events ([`ClientEvent`]), processes them through pure state machine
//! logic, and returns actions ([`ClientAction`]) for the caller to
//! execute. The caller owns all I/O and delivers events in receipt order
//! on a single logical loop, which makes the engine deterministic and
//! fully testable without a network.
//!
//! # Components
//!
//! - [`Client`]: top-level state machine owning connection, membership
//!   and conversation state
//! - [`MembershipTracker`]: group-room membership with reconnect resync
//! - [`ConversationSync`]: active conversation, visible messages, dedup
//!   and the stale-history guard
//! - [`ClientEvent`] / [`ClientAction`]: the engine's typed interface
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedSocket`]: WebSocket push channel
//! - [`transport::connect`]: connect for an authenticated session
//! - [`rest::HistoryClient`]: REST history-fetch collaborator

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
mod event;
mod membership;
mod sync;

#[cfg(feature = "transport")]
pub mod rest;
#[cfg(feature = "transport")]
pub mod transport;

pub use client::{Client, ConnectionState};
pub use error::ClientError;
pub use event::{ClientAction, ClientEvent, SocketEvent};
pub use membership::MembershipTracker;
pub use sync::{ActiveConversation, ConversationSync};
