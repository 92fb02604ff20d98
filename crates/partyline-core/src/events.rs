// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel addressing and the event frames exchanged with connected clients.
//!
//! Channels are runtime routing keys, never persisted. The wire syntax is
//! `chat:{chat_id}` for per-conversation updates and `notification:{user_id}`
//! for per-user notification streams.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::types::{ChatId, Message, UserId};

/// A typed channel address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelName {
    /// Updates for one chat; carries the full refreshed log on every append.
    Chat(ChatId),
    /// Per-user notification stream; carries new-message pings.
    Notification(UserId),
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelName::Chat(id) => write!(f, "chat:{id}"),
            ChannelName::Notification(id) => write!(f, "notification:{id}"),
        }
    }
}

impl FromStr for ChannelName {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, rest) = s.split_once(':').ok_or_else(|| {
            ChatError::InvalidArgument(format!("malformed channel name: {s:?}"))
        })?;
        if rest.is_empty() {
            return Err(ChatError::InvalidArgument(format!(
                "channel name has an empty id: {s:?}"
            )));
        }
        match prefix {
            "chat" => Ok(ChannelName::Chat(ChatId(rest.to_string()))),
            "notification" => Ok(ChannelName::Notification(UserId(rest.to_string()))),
            other => Err(ChatError::InvalidArgument(format!(
                "unknown channel prefix: {other:?}"
            ))),
        }
    }
}

/// Discriminator for notification payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    NewMessage,
}

/// A server-to-client frame, JSON-encoded on the WebSocket with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Acknowledges a subscribe command.
    Subscribed { channel: String },
    /// Acknowledges an unsubscribe command.
    Unsubscribed { channel: String },
    /// The full ordered log of a chat, pushed on every append.
    History {
        chat_id: ChatId,
        messages: Vec<Message>,
    },
    /// A ping on a user's notification channel: someone wrote to them.
    Notification {
        kind: NotificationKind,
        chat_id: ChatId,
        sender_display_name: String,
    },
    /// A non-fatal protocol error (malformed frame, bad channel name).
    Error { message: String },
}

/// A client-to-server frame, JSON-encoded with an `op` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientCommand {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_use_the_wire_syntax() {
        let chat = ChannelName::Chat(ChatId("c-1".into()));
        let notif = ChannelName::Notification(UserId("u-1".into()));
        assert_eq!(chat.to_string(), "chat:c-1");
        assert_eq!(notif.to_string(), "notification:u-1");
    }

    #[test]
    fn channel_names_parse_back() {
        let parsed: ChannelName = "chat:c-1".parse().unwrap();
        assert_eq!(parsed, ChannelName::Chat(ChatId("c-1".into())));
        let parsed: ChannelName = "notification:u-9".parse().unwrap();
        assert_eq!(parsed, ChannelName::Notification(UserId("u-9".into())));
    }

    #[test]
    fn bad_channel_names_are_rejected() {
        assert!("chat".parse::<ChannelName>().is_err());
        assert!("chat:".parse::<ChannelName>().is_err());
        assert!("presence:u-1".parse::<ChannelName>().is_err());
    }

    #[test]
    fn notification_event_wire_shape() {
        let event = ChatEvent::Notification {
            kind: NotificationKind::NewMessage,
            chat_id: ChatId("c-1".into()),
            sender_display_name: "Ada".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["kind"], "new-message");
        assert_eq!(json["chat_id"], "c-1");
        assert_eq!(json["sender_display_name"], "Ada");
    }

    #[test]
    fn client_commands_parse() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"op":"subscribe","channel":"chat:c-1"}"#).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::Subscribe {
                channel: "chat:c-1".into()
            }
        );
    }
}
