// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the chat core, storage, and gateway.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Unique identifier for a chat. UUID v4, assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub String);

/// Unique identifier for a user, owned by the board application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a post, owned by the board application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

/// Unique identifier for a message. UUID v4, assigned at append.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl ChatId {
    /// Generates a fresh chat id.
    pub fn generate() -> Self {
        ChatId(uuid::Uuid::new_v4().to_string())
    }
}

impl MessageId {
    /// Generates a fresh message id.
    pub fn generate() -> Self {
        MessageId(uuid::Uuid::new_v4().to_string())
    }
}

macro_rules! impl_id_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

impl_id_display!(ChatId, UserId, PostId, MessageId);

/// The two participants of a chat, held in canonical (sorted) order so that
/// lookups are independent of who initiated the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantPair {
    lo: UserId,
    hi: UserId,
}

impl ParticipantPair {
    /// Builds the canonical pair for two users.
    ///
    /// Fails with [`ChatError::InvalidOperation`] when both sides are the
    /// same user; a chat with oneself is never valid.
    pub fn new(a: UserId, b: UserId) -> Result<Self, ChatError> {
        if a == b {
            return Err(ChatError::InvalidOperation(format!(
                "user {a} cannot open a chat with themselves"
            )));
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Ok(ParticipantPair { lo, hi })
    }

    /// The lexicographically smaller participant id.
    pub fn lo(&self) -> &UserId {
        &self.lo
    }

    /// The lexicographically larger participant id.
    pub fn hi(&self) -> &UserId {
        &self.hi
    }

    /// Whether `id` is one of the two participants.
    pub fn contains(&self, id: &UserId) -> bool {
        &self.lo == id || &self.hi == id
    }

    /// The participant that is not `id`, or `None` if `id` is not a member.
    pub fn other(&self, id: &UserId) -> Option<&UserId> {
        if &self.lo == id {
            Some(&self.hi)
        } else if &self.hi == id {
            Some(&self.lo)
        } else {
            None
        }
    }

    /// Both ids in canonical order.
    pub fn ids(&self) -> [&UserId; 2] {
        [&self.lo, &self.hi]
    }
}

/// A user as reported by the external user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// A stand-in profile for a user the directory no longer knows.
    ///
    /// Conversations outlive accounts; summaries and fan-out fall back to
    /// the raw id rather than erroring or hiding the chat.
    pub fn placeholder(id: UserId) -> Self {
        let display_name = id.0.clone();
        UserProfile {
            id,
            display_name,
            avatar_url: None,
        }
    }
}

/// A post as reported by the external post store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: PostId,
    pub title: String,
    pub author_id: UserId,
}

/// A single immutable message in a chat's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub text: String,
    /// Position in the chat's log, starting at 1. Append order is the only
    /// order; `seq` makes it a stored fact rather than a timestamp tiebreak.
    pub seq: i64,
    /// Server-assigned, non-decreasing within a chat.
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

/// A chat row as persisted: identity, key, and activity bookkeeping.
/// The message log is stored separately and joined on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub id: ChatId,
    pub post_id: Option<PostId>,
    pub participants: ParticipantPair,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// A fully hydrated chat: the record plus resolved participant profiles and
/// the complete ordered message log. This is what the open/fetch endpoints
/// return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    pub id: ChatId,
    pub post_id: Option<PostId>,
    pub participants: [UserProfile; 2],
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// One inbox entry: enough to render a conversation list row without
/// loading the full log.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub chat_id: ChatId,
    pub post_id: Option<PostId>,
    /// Title of the related post, when it still resolves.
    pub post_title: Option<String>,
    /// The participant who is not the inbox owner.
    pub partner: UserProfile,
    pub last_message: Option<Message>,
    pub last_activity_at: DateTime<Utc>,
}
