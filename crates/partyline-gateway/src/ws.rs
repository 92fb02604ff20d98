// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket endpoint: bridges sockets into the connection registry.
//!
//! Each socket gets a fresh connection id and an outbound mpsc queue that is
//! registered with [`ConnectionRegistry`]. A spawned forwarder drains the
//! queue into JSON text frames; the receive loop applies subscribe and
//! unsubscribe commands. Malformed frames answer with an error event and the
//! connection stays up. Every exit path deregisters the connection, which
//! drops all of its subscriptions.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use partyline_chat::ConnectionRegistry;
use partyline_core::events::{ChannelName, ChatEvent, ClientCommand};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::server::GatewayState;

/// `GET /ws`: upgrades the connection and hands the socket off.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let conn_id = uuid::Uuid::new_v4().to_string();

    let (tx, mut rx) = mpsc::channel::<ChatEvent>(state.fanout_buffer);
    state.registry.register(&conn_id, tx.clone());
    info!(conn_id = %conn_id, "websocket connected");

    // Forward queued events to the socket as JSON text frames.
    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => handle_frame(&state.registry, &conn_id, &tx, &text).await,
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Cleanup.
    state.registry.deregister(&conn_id);
    sender_task.abort();
    info!(conn_id = %conn_id, "websocket disconnected");
}

/// Applies one client frame. Malformed frames and bad channel names answer
/// with an error event; they never tear the connection down.
async fn handle_frame(
    registry: &ConnectionRegistry,
    conn_id: &str,
    tx: &mpsc::Sender<ChatEvent>,
    frame: &str,
) {
    let command: ClientCommand = match serde_json::from_str(frame) {
        Ok(command) => command,
        Err(e) => {
            warn!(conn_id = %conn_id, error = %e, "malformed websocket frame");
            let event = ChatEvent::Error {
                message: format!("malformed frame: {e}"),
            };
            send_event(tx, event).await;
            return;
        }
    };
    match command {
        ClientCommand::Subscribe { channel } => match channel.parse::<ChannelName>() {
            Ok(parsed) => {
                registry.subscribe(parsed, conn_id);
                debug!(conn_id = %conn_id, channel = %channel, "subscribed");
                send_event(tx, ChatEvent::Subscribed { channel }).await;
            }
            Err(e) => {
                send_event(
                    tx,
                    ChatEvent::Error {
                        message: e.to_string(),
                    },
                )
                .await;
            }
        },
        ClientCommand::Unsubscribe { channel } => match channel.parse::<ChannelName>() {
            Ok(parsed) => {
                registry.unsubscribe(&parsed, conn_id);
                debug!(conn_id = %conn_id, channel = %channel, "unsubscribed");
                send_event(tx, ChatEvent::Unsubscribed { channel }).await;
            }
            Err(e) => {
                send_event(
                    tx,
                    ChatEvent::Error {
                        message: e.to_string(),
                    },
                )
                .await;
            }
        },
    }
}

async fn send_event(tx: &mpsc::Sender<ChatEvent>, event: ChatEvent) {
    // A send can only fail while the connection is being torn down.
    if tx.send(event).await.is_err() {
        debug!("outbound queue closed before the event could be sent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wired_connection() -> (ConnectionRegistry, mpsc::Sender<ChatEvent>, mpsc::Receiver<ChatEvent>)
    {
        let registry = ConnectionRegistry::new();
        let (tx, rx) = mpsc::channel(8);
        registry.register("c-1", tx.clone());
        (registry, tx, rx)
    }

    #[tokio::test]
    async fn subscribe_frames_register_and_ack() {
        let (registry, tx, mut rx) = wired_connection();

        handle_frame(
            &registry,
            "c-1",
            &tx,
            r#"{"op":"subscribe","channel":"chat:c-9"}"#,
        )
        .await;

        let channel: ChannelName = "chat:c-9".parse().unwrap();
        assert!(registry.is_subscribed(&channel, "c-1"));
        assert_eq!(
            rx.try_recv().unwrap(),
            ChatEvent::Subscribed {
                channel: "chat:c-9".into()
            }
        );
    }

    #[tokio::test]
    async fn unsubscribe_frames_remove_and_ack() {
        let (registry, tx, mut rx) = wired_connection();
        registry.subscribe("chat:c-9".parse().unwrap(), "c-1");

        handle_frame(
            &registry,
            "c-1",
            &tx,
            r#"{"op":"unsubscribe","channel":"chat:c-9"}"#,
        )
        .await;

        let channel: ChannelName = "chat:c-9".parse().unwrap();
        assert!(!registry.is_subscribed(&channel, "c-1"));
        assert_eq!(
            rx.try_recv().unwrap(),
            ChatEvent::Unsubscribed {
                channel: "chat:c-9".into()
            }
        );
    }

    #[tokio::test]
    async fn malformed_frames_answer_with_an_error() {
        let (registry, tx, mut rx) = wired_connection();

        handle_frame(&registry, "c-1", &tx, "not json at all").await;

        match rx.try_recv().unwrap() {
            ChatEvent::Error { message } => assert!(message.contains("malformed frame")),
            other => panic!("expected an error event, got {other:?}"),
        }
        // The connection itself survives.
        assert_eq!(registry.connection_count(), 1);
    }

    #[tokio::test]
    async fn unknown_channel_prefixes_answer_with_an_error() {
        let (registry, tx, mut rx) = wired_connection();

        handle_frame(
            &registry,
            "c-1",
            &tx,
            r#"{"op":"subscribe","channel":"presence:u-1"}"#,
        )
        .await;

        match rx.try_recv().unwrap() {
            ChatEvent::Error { message } => assert!(message.contains("unknown channel prefix")),
            other => panic!("expected an error event, got {other:?}"),
        }
        let channel: ChannelName = "chat:u-1".parse().unwrap();
        assert!(!registry.is_subscribed(&channel, "c-1"));
    }
}
