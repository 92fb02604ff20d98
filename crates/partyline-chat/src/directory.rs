// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat identity: one conversation per post and participant pair.
//!
//! The directory owns the open-or-create flow. Opening a chat is always
//! expressed against a post; the post's author becomes the second
//! participant. Identity is the `(post, unordered pair)` key, so reopening
//! from either side lands on the same conversation.

use std::sync::Arc;

use partyline_core::error::{ChatError, ResourceKind};
use partyline_core::traits::{ChatStore, PostStore, UserDirectory};
use partyline_core::types::{
    Chat, ChatId, ChatRecord, ParticipantPair, PostId, UserId, UserProfile,
};
use tracing::{debug, info};

/// Find-or-create directory over the chat store.
pub struct ChatDirectory {
    store: Arc<dyn ChatStore>,
    users: Arc<dyn UserDirectory>,
    posts: Arc<dyn PostStore>,
}

impl ChatDirectory {
    pub fn new(
        store: Arc<dyn ChatStore>,
        users: Arc<dyn UserDirectory>,
        posts: Arc<dyn PostStore>,
    ) -> Self {
        Self {
            store,
            users,
            posts,
        }
    }

    /// Opens the conversation between `requester_id` and the author of
    /// `post_id`, creating it if this is the first contact.
    ///
    /// Fails with [`ChatError::NotFound`] when the post or requester does
    /// not resolve and [`ChatError::InvalidOperation`] when the requester
    /// authored the post. Concurrent opens for the same key all return the
    /// same chat; the store resolves the race to a single row.
    pub async fn open_or_create(
        &self,
        post_id: &PostId,
        requester_id: &UserId,
    ) -> Result<Chat, ChatError> {
        // The post anchors the conversation and names the second participant.
        let post = self.posts.get_post(post_id).await?;
        if &post.author_id == requester_id {
            return Err(ChatError::InvalidOperation(format!(
                "user {requester_id} cannot open a chat on their own post"
            )));
        }

        // The requester's profile goes into the response, so it must resolve.
        self.users.get_user(requester_id).await?;

        let participants = ParticipantPair::new(requester_id.clone(), post.author_id.clone())?;
        let (record, created) = self.store.find_or_create(Some(post_id), &participants).await?;
        if created {
            info!(chat_id = %record.id, post_id = %post_id, "chat created");
        } else {
            debug!(chat_id = %record.id, "existing chat reopened");
        }

        self.hydrate(record).await
    }

    /// Fetches a chat by id, hydrated like [`Self::open_or_create`].
    pub async fn by_id(&self, chat_id: &ChatId) -> Result<Chat, ChatError> {
        let record = self
            .store
            .chat_by_id(chat_id)
            .await?
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::Chat,
                id: chat_id.to_string(),
            })?;
        self.hydrate(record).await
    }

    /// All chat rows the user participates in, most recent activity first.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ChatRecord>, ChatError> {
        self.store.chats_for_user(user_id).await
    }

    /// Resolves a participant profile, degrading to a placeholder when the
    /// directory no longer knows the id. Conversations outlive accounts.
    pub(crate) async fn resolve_profile(&self, id: &UserId) -> Result<UserProfile, ChatError> {
        match self.users.get_user(id).await {
            Ok(profile) => Ok(profile),
            Err(ChatError::NotFound { .. }) => Ok(UserProfile::placeholder(id.clone())),
            Err(e) => Err(e),
        }
    }

    async fn hydrate(&self, record: ChatRecord) -> Result<Chat, ChatError> {
        let [first, second] = record.participants.ids();
        let participants = [
            self.resolve_profile(first).await?,
            self.resolve_profile(second).await?,
        ];
        let messages = self.store.messages_for_chat(&record.id).await?;
        Ok(Chat {
            id: record.id,
            post_id: record.post_id,
            participants,
            messages,
            created_at: record.created_at,
            last_activity_at: record.last_activity_at,
        })
    }
}
