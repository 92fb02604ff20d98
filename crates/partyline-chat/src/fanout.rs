// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Send pipeline: persist a message, then push updates to live connections.
//!
//! Every successful send publishes twice: the full refreshed log to the
//! chat's own channel, and a new-message ping to the recipient's
//! notification channel. Publishing is fire-and-forget; the durable log is
//! the source of truth and clients that missed an event converge on the
//! next fetch.

use std::sync::Arc;

use partyline_core::error::ChatError;
use partyline_core::events::{ChannelName, ChatEvent, NotificationKind};
use partyline_core::traits::{ChatStore, UserDirectory};
use partyline_core::types::{ChatId, Message, UserId};
use tracing::debug;

use crate::log::MessageLog;
use crate::registry::ConnectionRegistry;

/// Orchestrates append, re-read, and publish for one sent message.
#[derive(Clone)]
pub struct FanoutDispatcher {
    log: MessageLog,
    registry: Arc<ConnectionRegistry>,
    store: Arc<dyn ChatStore>,
    users: Arc<dyn UserDirectory>,
}

impl FanoutDispatcher {
    pub fn new(
        log: MessageLog,
        registry: Arc<ConnectionRegistry>,
        store: Arc<dyn ChatStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            log,
            registry,
            store,
            users,
        }
    }

    /// Appends `text` to the chat and fans the update out.
    ///
    /// Validation and persistence come first; if the append fails, nothing
    /// is published. Returns the single appended message.
    pub async fn send_message(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<Message, ChatError> {
        // 1. Validate and persist through the log.
        let message = self.log.append(chat_id, sender_id, text).await?;

        // 2. Re-read the full log so every subscriber converges on the same
        //    history, then push it to the chat channel.
        let messages = self.log.history(chat_id).await?;
        let delivered = self.registry.publish(
            &ChannelName::Chat(chat_id.clone()),
            &ChatEvent::History {
                chat_id: chat_id.clone(),
                messages,
            },
        );

        // 3. Ping the other participant's notification stream.
        self.notify_recipient(chat_id, sender_id).await?;

        debug!(chat_id = %chat_id, seq = message.seq, delivered, "message fanned out");
        Ok(message)
    }

    async fn notify_recipient(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
    ) -> Result<(), ChatError> {
        // The row was appended a moment ago; it can only be missing if the
        // sweeper purged it in between, and then there is nobody to notify.
        let Some(record) = self.store.chat_by_id(chat_id).await? else {
            return Ok(());
        };
        let Some(recipient) = record.participants.other(sender_id) else {
            return Ok(());
        };

        let sender_display_name = match self.users.get_user(sender_id).await {
            Ok(profile) => profile.display_name,
            // A vanished sender still notifies, under the raw id.
            Err(ChatError::NotFound { .. }) => sender_id.to_string(),
            Err(e) => return Err(e),
        };

        self.registry.publish(
            &ChannelName::Notification(recipient.clone()),
            &ChatEvent::Notification {
                kind: NotificationKind::NewMessage,
                chat_id: chat_id.clone(),
                sender_display_name,
            },
        );
        Ok(())
    }
}
