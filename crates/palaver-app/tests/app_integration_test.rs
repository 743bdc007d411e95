//! Integration tests for App and Bridge behavior.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The engine's observable view reflects the expected conversation
//! - Outgoing commands and fetch requests match the intent
//! - Stale fetch results never leak across a conversation switch

#![allow(clippy::unwrap_used)]

use chrono::DateTime;
use palaver_app::{App, AppAction, AppEvent, Bridge, FetchRequest};
use palaver_client::SocketEvent;
use palaver_proto::{
    ClientCommand, Conversation, ConversationKey, Message, Recipient, ServerEvent, Session, User,
};

const LOCAL_USER: u64 = 1;

fn session() -> Session {
    Session {
        user: User { id: LOCAL_USER, username: "alice".into(), email: "alice@example.com".into() },
        token: "s3cr3t".into(),
    }
}

/// Create a connected App/Bridge pair ready for testing.
fn connected_pair() -> (App, Bridge) {
    let mut app = App::new();
    let mut bridge = Bridge::new(session());

    for event in bridge.handle_socket_event(SocketEvent::Connected) {
        let _ = app.handle(event);
    }
    let _ = bridge.take_fetch_requests();

    (app, bridge)
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

/// Process actions from App through Bridge and update App state.
fn process_actions(app: &mut App, bridge: &mut Bridge, actions: Vec<AppAction>) {
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

#[test]
fn select_send_and_echo_flow() {
    let (mut app, mut bridge) = connected_pair();
    let key = ConversationKey::Group { group_id: 7 };

    // Open the group: history fetch queued, room joined.
    let actions = app.select_conversation(key, "backend");
    process_actions(&mut app, &mut bridge, actions);

    assert_eq!(bridge.take_fetch_requests(), vec![FetchRequest::History(key)]);
    assert_eq!(bridge.take_outgoing(), vec![ClientCommand::JoinGroup { group_id: 7 }]);

    // History resolves.
    let loaded = vec![message(10, 3, Recipient::Group { group_id: 7 })];
    for event in bridge.handle_history_loaded(key, loaded) {
        let _ = app.handle(event);
    }
    assert_eq!(bridge.client().messages().len(), 1);

    // Send: one command, no local echo.
    let actions = app.send_message("standup in 5");
    process_actions(&mut app, &mut bridge, actions);

    assert_eq!(bridge.take_outgoing(), vec![ClientCommand::SendGroupMessage {
        group_id: 7,
        content: "standup in 5".into(),
    }]);
    assert_eq!(bridge.client().messages().len(), 1);

    // The server echo makes it visible, exactly once.
    let mut echo = message(11, LOCAL_USER, Recipient::Group { group_id: 7 });
    echo.content = "standup in 5".into();
    for event in bridge.handle_socket_event(SocketEvent::Event(ServerEvent::NewMessage(echo))) {
        let _ = app.handle(event);
    }

    let ids: Vec<u64> = bridge.client().messages().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![10, 11]);
    assert_eq!(bridge.take_fetch_requests(), vec![FetchRequest::Conversations]);
}

#[test]
fn switching_conversations_discards_the_superseded_fetch() {
    let (mut app, mut bridge) = connected_pair();
    let first = ConversationKey::Direct { peer_id: 2 };
    let second = ConversationKey::Direct { peer_id: 3 };

    let actions = app.select_conversation(first, "bob");
    process_actions(&mut app, &mut bridge, actions);
    let actions = app.select_conversation(second, "carol");
    process_actions(&mut app, &mut bridge, actions);

    // Both fetches were requested, in order.
    assert_eq!(bridge.take_fetch_requests(), vec![
        FetchRequest::History(first),
        FetchRequest::History(second),
    ]);

    // The first fetch resolves last; the engine must drop it.
    let second_history = vec![message(20, 3, Recipient::Direct { receiver_id: LOCAL_USER })];
    for event in bridge.handle_history_loaded(second, second_history) {
        let _ = app.handle(event);
    }
    let first_history = vec![message(9, 2, Recipient::Direct { receiver_id: LOCAL_USER })];
    for event in bridge.handle_history_loaded(first, first_history) {
        let _ = app.handle(event);
    }

    let ids: Vec<u64> = bridge.client().messages().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![20]);
    assert_eq!(bridge.client().active_conversation().unwrap().name, "carol");
}

#[test]
fn reconnect_replays_memberships_through_the_bridge() {
    let (mut app, mut bridge) = connected_pair();

    for group_id in [5, 8] {
        let actions = app.select_conversation(ConversationKey::Group { group_id }, "room");
        process_actions(&mut app, &mut bridge, actions);
    }
    let _ = bridge.take_outgoing();
    let _ = bridge.take_fetch_requests();

    for event in bridge.handle_socket_event(SocketEvent::Closed) {
        let _ = app.handle(event);
    }
    for event in bridge.handle_socket_event(SocketEvent::Connected) {
        let _ = app.handle(event);
    }

    let mut rejoined: Vec<u64> = bridge
        .take_outgoing()
        .into_iter()
        .filter_map(|command| match command {
            ClientCommand::JoinGroup { group_id } => Some(group_id),
            _ => None,
        })
        .collect();
    rejoined.sort_unstable();

    assert_eq!(rejoined, vec![5, 8]);
    assert_eq!(bridge.take_fetch_requests(), vec![FetchRequest::Conversations]);
}

#[test]
fn conversation_list_updates_flow_to_the_view() {
    let (mut app, mut bridge) = connected_pair();

    let conversations = vec![Conversation {
        key: ConversationKey::Group { group_id: 7 },
        name: "backend".into(),
        last_message: Some(message(10, 3, Recipient::Group { group_id: 7 })),
    }];

    let events = bridge.handle_conversations_loaded(conversations);
    assert!(events.contains(&AppEvent::ConversationsUpdated));
    for event in events {
        let _ = app.handle(event);
    }

    assert_eq!(bridge.client().conversations().len(), 1);
    assert_eq!(bridge.client().conversations()[0].name, "backend");
}

#[test]
fn logout_tears_down_view_and_connection() {
    let (mut app, mut bridge) = connected_pair();
    let actions = app.select_conversation(ConversationKey::Group { group_id: 7 }, "backend");
    process_actions(&mut app, &mut bridge, actions);

    let actions = app.logout();
    process_actions(&mut app, &mut bridge, actions);

    assert!(bridge.take_disconnect_request());
    assert!(bridge.client().active_conversation().is_none());
    assert!(bridge.client().membership().is_empty());
    assert_eq!(app.status_message(), Some("Logged out"));
}

#[test]
fn transport_failure_surfaces_but_does_not_crash() {
    let (mut app, mut bridge) = connected_pair();
    let actions = app.select_conversation(ConversationKey::Group { group_id: 7 }, "backend");
    process_actions(&mut app, &mut bridge, actions);
    let _ = bridge.take_outgoing();

    let events = bridge.handle_command_failed(
        ClientCommand::JoinGroup { group_id: 7 },
        "socket closed".into(),
    );
    for event in events {
        let _ = app.handle(event);
    }

    // The optimistic join was rolled back and the failure surfaced.
    assert!(!bridge.client().membership().contains(7));
    assert!(app.status_message().unwrap().contains("transport failure"));
}
