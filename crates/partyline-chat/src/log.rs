// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated access to a chat's append-only message log.

use std::sync::Arc;

use partyline_config::model::ChatConfig;
use partyline_core::error::{ChatError, ResourceKind};
use partyline_core::traits::ChatStore;
use partyline_core::types::{ChatId, Message, UserId};
use tracing::debug;

/// Append and read operations on chat message logs.
///
/// All request-level validation lives here; the store below only enforces
/// the append+activity transaction. Nothing is written when validation
/// fails, so a rejected append leaves the log exactly as it was.
#[derive(Clone)]
pub struct MessageLog {
    store: Arc<dyn ChatStore>,
    max_message_len: usize,
}

impl MessageLog {
    pub fn new(store: Arc<dyn ChatStore>, config: &ChatConfig) -> Self {
        Self {
            store,
            max_message_len: config.max_message_len,
        }
    }

    /// Appends a message to a chat's log.
    ///
    /// Fails with [`ChatError::InvalidArgument`] for empty or oversized
    /// text, [`ChatError::NotFound`] when the chat does not resolve, and
    /// [`ChatError::Forbidden`] when the sender is not a participant.
    pub async fn append(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<Message, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::InvalidArgument(
                "message text is empty".to_string(),
            ));
        }
        if text.len() > self.max_message_len {
            return Err(ChatError::InvalidArgument(format!(
                "message text exceeds {} bytes",
                self.max_message_len
            )));
        }

        let chat = self
            .store
            .chat_by_id(chat_id)
            .await?
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::Chat,
                id: chat_id.to_string(),
            })?;
        if !chat.participants.contains(sender_id) {
            return Err(ChatError::Forbidden(format!(
                "user {sender_id} is not a participant of chat {chat_id}"
            )));
        }

        let message = self.store.append_message(chat_id, sender_id, text).await?;
        debug!(chat_id = %chat_id, seq = message.seq, "message appended");
        Ok(message)
    }

    /// The full ordered log of a chat, oldest first.
    ///
    /// Fails with [`ChatError::NotFound`] when the chat does not resolve;
    /// an existing chat with no messages yields an empty vec.
    pub async fn history(&self, chat_id: &ChatId) -> Result<Vec<Message>, ChatError> {
        if self.store.chat_by_id(chat_id).await?.is_none() {
            return Err(ChatError::NotFound {
                kind: ResourceKind::Chat,
                id: chat_id.to_string(),
            });
        }
        self.store.messages_for_chat(chat_id).await
    }
}
