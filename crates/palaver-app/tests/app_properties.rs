//! Property-based tests for App and Bridge behavior.
//!
//! Tests verify that view invariants hold under arbitrary interleavings
//! of user intents and socket events: visible message ids stay unique,
//! every visible message is routable to the active conversation, and no
//! message is visible when nothing is open.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use chrono::DateTime;
use palaver_app::{App, AppAction, AppEvent, Bridge};
use palaver_client::{Client, SocketEvent};
use palaver_proto::{ConversationKey, Message, Recipient, ServerEvent, Session, User};
use proptest::prelude::*;

const LOCAL_USER: u64 = 1;

fn session() -> Session {
    Session {
        user: User { id: LOCAL_USER, username: "alice".into(), email: "alice@example.com".into() },
        token: "s3cr3t".into(),
    }
}

fn message(id: u64, sender_id: u64, recipient: Recipient) -> Message {
    Message {
        id,
        sender_id,
        sender_username: format!("user{sender_id}"),
        content: format!("message {id}"),
        created_at: DateTime::from_timestamp(1_750_000_000 + id as i64, 0).unwrap(),
        recipient,
        receiver_username: None,
        group_name: None,
        is_read: false,
    }
}

/// One step a user or the transport could take.
#[derive(Debug, Clone)]
enum Step {
    SelectDirect(u64),
    SelectGroup(u64),
    Send(String),
    Leave(u64),
    Arrive(Message),
    Drop,
    Reconnect,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let recipient = prop_oneof![
        (1u64..6).prop_map(|receiver_id| Recipient::Direct { receiver_id }),
        (1u64..6).prop_map(|group_id| Recipient::Group { group_id }),
    ];
    let arrive = (0u64..40, 1u64..6, recipient)
        .prop_map(|(id, sender, recipient)| Step::Arrive(message(id, sender, recipient)));

    prop_oneof![
        2 => (2u64..6).prop_map(Step::SelectDirect),
        2 => (1u64..6).prop_map(Step::SelectGroup),
        2 => ".{0,12}".prop_map(Step::Send),
        1 => (1u64..6).prop_map(Step::Leave),
        4 => arrive,
        1 => Just(Step::Drop),
        1 => Just(Step::Reconnect),
    ]
}

fn apply(app: &mut App, bridge: &mut Bridge, step: Step) {
    let actions = match step {
        Step::SelectDirect(peer_id) => {
            app.select_conversation(ConversationKey::Direct { peer_id }, "peer")
        },
        Step::SelectGroup(group_id) => {
            app.select_conversation(ConversationKey::Group { group_id }, "room")
        },
        Step::Send(content) => app.send_message(content),
        Step::Leave(group_id) => app.leave_group(group_id),
        Step::Arrive(message) => {
            let events =
                bridge.handle_socket_event(SocketEvent::Event(ServerEvent::NewMessage(message)));
            for event in events {
                let _ = app.handle(event);
            }
            return;
        },
        Step::Drop => {
            for event in bridge.handle_socket_event(SocketEvent::Closed) {
                let _ = app.handle(event);
            }
            return;
        },
        Step::Reconnect => {
            for event in bridge.handle_socket_event(SocketEvent::Connected) {
                let _ = app.handle(event);
            }
            return;
        },
    };

    for action in actions {
        match action {
            AppAction::SelectConversation { .. }
            | AppAction::SendMessage { .. }
            | AppAction::LeaveGroup { .. }
            | AppAction::Logout => {
                for event in bridge.process_app_action(action) {
                    let _ = app.handle(event);
                }
            },
            AppAction::Render | AppAction::Quit | AppAction::Connect => {},
        }
    }
}

/// The routing rule, restated independently of the engine.
fn is_routable(active: ConversationKey, message: &Message) -> bool {
    match (active, message.recipient) {
        (ConversationKey::Direct { peer_id }, Recipient::Direct { receiver_id }) => {
            (message.sender_id == peer_id && receiver_id == LOCAL_USER)
                || (message.sender_id == LOCAL_USER && receiver_id == peer_id)
        },
        (ConversationKey::Group { group_id }, Recipient::Group { group_id: target }) => {
            group_id == target
        },
        _ => false,
    }
}

fn check_view_invariants(client: &Client) -> Result<(), TestCaseError> {
    let ids: Vec<u64> = client.messages().iter().map(|m| m.id).collect();
    let unique: HashSet<u64> = ids.iter().copied().collect();
    prop_assert_eq!(ids.len(), unique.len(), "visible message ids must be unique");

    match client.active_conversation() {
        Some(active) => {
            for message in client.messages() {
                prop_assert!(
                    is_routable(active.key, message),
                    "visible message {} is not routable to the active conversation",
                    message.id
                );
            }
        },
        None => prop_assert!(client.messages().is_empty()),
    }

    Ok(())
}

proptest! {
    #[test]
    fn prop_view_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let mut app = App::new();
        let mut bridge = Bridge::new(session());
        for event in bridge.handle_socket_event(SocketEvent::Connected) {
            let _ = app.handle(event);
        }

        for step in steps {
            apply(&mut app, &mut bridge, step);
            check_view_invariants(bridge.client())?;
        }
    }

    #[test]
    fn prop_app_events_always_render(message in ".{0,20}") {
        let mut app = App::new();

        for event in [
            AppEvent::ConnectionChanged,
            AppEvent::ConversationsUpdated,
            AppEvent::MessagesUpdated,
            AppEvent::Notice { message: message.clone() },
            AppEvent::Error { message },
        ] {
            let actions = app.handle(event);
            prop_assert_eq!(actions, vec![AppAction::Render]);
        }
    }
}
