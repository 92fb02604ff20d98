// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for chats and their message logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ChatError;
use crate::types::{ChatId, ChatRecord, Message, ParticipantPair, PostId, UserId};

/// Storage seam the chat components run on.
///
/// Implementations must provide two atomicity guarantees:
///
/// - `find_or_create` resolves concurrent calls for the same key to a
///   single chat row; callers never observe duplicates.
/// - `append_message` inserts the message and advances the chat's
///   `last_activity_at` in one transaction; the two are never observably
///   separate, and assigned timestamps never decrease within a chat.
#[async_trait]
pub trait ChatStore: Send + Sync + 'static {
    /// Returns the chat for `(post_id, participants)`, creating it with a
    /// fresh id and empty log when none exists. The flag is `true` when this
    /// call created the row.
    async fn find_or_create(
        &self,
        post_id: Option<&PostId>,
        participants: &ParticipantPair,
    ) -> Result<(ChatRecord, bool), ChatError>;

    /// Fetches a chat row by id.
    async fn chat_by_id(&self, id: &ChatId) -> Result<Option<ChatRecord>, ChatError>;

    /// All chats the user participates in, most recent activity first,
    /// ties broken by ascending chat id.
    async fn chats_for_user(&self, user_id: &UserId) -> Result<Vec<ChatRecord>, ChatError>;

    /// Appends a message and touches the chat's activity timestamp.
    ///
    /// Participant membership and text validation happen in the caller;
    /// the store fails with [`ChatError::NotFound`] if the chat row is gone.
    async fn append_message(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<Message, ChatError>;

    /// The full ordered log of a chat, oldest first.
    async fn messages_for_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, ChatError>;

    /// The most recent message of a chat, if any.
    async fn last_message(&self, chat_id: &ChatId) -> Result<Option<Message>, ChatError>;

    /// Deletes every chat whose `last_activity_at` is older than `cutoff`,
    /// message logs included. Returns the number of chats removed.
    async fn purge_idle_chats(&self, cutoff: DateTime<Utc>) -> Result<u64, ChatError>;
}
