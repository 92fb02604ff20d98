// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation list, built fresh on every request.

use std::sync::Arc;

use partyline_core::error::ChatError;
use partyline_core::traits::{ChatStore, PostStore};
use partyline_core::types::{ChatSummary, UserId};

use crate::directory::ChatDirectory;

/// Builds the recency-sorted inbox for a user.
///
/// Each entry carries just enough to render a conversation row: the other
/// participant's profile, the related post's title when it still resolves,
/// and the last message as a preview. There is no server-held cursor; every
/// call returns a fresh snapshot.
#[derive(Clone)]
pub struct InboxBuilder {
    directory: Arc<ChatDirectory>,
    store: Arc<dyn ChatStore>,
    posts: Arc<dyn PostStore>,
}

impl InboxBuilder {
    pub fn new(
        directory: Arc<ChatDirectory>,
        store: Arc<dyn ChatStore>,
        posts: Arc<dyn PostStore>,
    ) -> Self {
        Self {
            directory,
            store,
            posts,
        }
    }

    /// All conversations the user participates in, most recent activity
    /// first, ties broken by ascending chat id.
    ///
    /// A user unknown to the directory simply has an empty inbox; vanished
    /// partners appear as placeholder profiles and vanished posts drop
    /// their title, but neither hides the conversation.
    pub async fn build_inbox(&self, user_id: &UserId) -> Result<Vec<ChatSummary>, ChatError> {
        let records = self.directory.list_for_user(user_id).await?;

        let mut summaries = Vec::with_capacity(records.len());
        for record in records {
            let Some(partner_id) = record.participants.other(user_id) else {
                // list_for_user only returns chats the user belongs to.
                continue;
            };
            let partner = self.directory.resolve_profile(partner_id).await?;

            let post_title = match record.post_id.as_ref() {
                Some(post_id) => match self.posts.get_post(post_id).await {
                    Ok(post) => Some(post.title),
                    Err(ChatError::NotFound { .. }) => None,
                    Err(e) => return Err(e),
                },
                None => None,
            };

            let last_message = self.store.last_message(&record.id).await?;

            summaries.push(ChatSummary {
                chat_id: record.id,
                post_id: record.post_id,
                post_title,
                partner,
                last_message,
                last_activity_at: record.last_activity_at,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partyline_core::types::PostId;
    use partyline_test_utils::TestHarness;

    #[tokio::test]
    async fn entries_carry_partner_title_and_preview() {
        let h = TestHarness::builder().build().await.unwrap();
        let ada = h.seed_user("u-ada", "Ada").await;
        let bob = h.seed_user("u-bob", "Bob").await;
        let post = h.seed_post("p-1", "Climbing partner wanted", "u-bob").await;
        let chat = h.directory.open_or_create(&post.id, &ada.id).await.unwrap();
        h.fanout
            .send_message(&chat.id, &ada.id, "saw your post!")
            .await
            .unwrap();

        let inbox = h.inbox.build_inbox(&bob.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        let entry = &inbox[0];
        assert_eq!(entry.chat_id, chat.id);
        assert_eq!(entry.partner.display_name, "Ada");
        assert_eq!(entry.post_title.as_deref(), Some("Climbing partner wanted"));
        assert_eq!(
            entry.last_message.as_ref().map(|m| m.text.as_str()),
            Some("saw your post!")
        );
    }

    #[tokio::test]
    async fn most_recently_active_chat_comes_first() {
        let h = TestHarness::builder().build().await.unwrap();
        let ada = h.seed_user("u-ada", "Ada").await;
        h.seed_user("u-bob", "Bob").await;
        h.seed_user("u-eve", "Eve").await;
        let bob_post = h.seed_post("p-1", "Hiking buddy", "u-bob").await;
        let eve_post = h.seed_post("p-2", "Chess opponent", "u-eve").await;

        let with_bob = h
            .directory
            .open_or_create(&bob_post.id, &ada.id)
            .await
            .unwrap();
        let with_eve = h
            .directory
            .open_or_create(&eve_post.id, &ada.id)
            .await
            .unwrap();

        // Writing into the older chat moves it back to the top. Timestamps
        // have millisecond precision, so step past the creation instant.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        h.fanout
            .send_message(&with_bob.id, &ada.id, "still up for it?")
            .await
            .unwrap();

        let inbox = h.inbox.build_inbox(&ada.id).await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].chat_id, with_bob.id);
        assert_eq!(inbox[1].chat_id, with_eve.id);
    }

    #[tokio::test]
    async fn vanished_partner_is_listed_with_a_placeholder() {
        let h = TestHarness::builder().build().await.unwrap();
        let ada = h.seed_user("u-ada", "Ada").await;
        h.seed_user("u-bob", "Bob").await;
        let post = h.seed_post("p-1", "Climbing partner wanted", "u-bob").await;
        h.directory.open_or_create(&post.id, &ada.id).await.unwrap();

        h.users.remove(&UserId("u-bob".to_string())).await;

        let inbox = h.inbox.build_inbox(&ada.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].partner.display_name, "u-bob");
    }

    #[tokio::test]
    async fn vanished_post_drops_only_the_title() {
        let h = TestHarness::builder().build().await.unwrap();
        let ada = h.seed_user("u-ada", "Ada").await;
        h.seed_user("u-bob", "Bob").await;
        let post = h.seed_post("p-1", "Climbing partner wanted", "u-bob").await;
        let chat = h.directory.open_or_create(&post.id, &ada.id).await.unwrap();

        h.posts.remove(&PostId("p-1".to_string())).await;

        let inbox = h.inbox.build_inbox(&ada.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].chat_id, chat.id);
        assert_eq!(inbox[0].post_title, None);
        assert_eq!(inbox[0].post_id.as_ref(), Some(&post.id));
    }

    #[tokio::test]
    async fn quiet_chats_have_no_preview() {
        let h = TestHarness::builder().build().await.unwrap();
        let ada = h.seed_user("u-ada", "Ada").await;
        h.seed_user("u-bob", "Bob").await;
        let post = h.seed_post("p-1", "Climbing partner wanted", "u-bob").await;
        h.directory.open_or_create(&post.id, &ada.id).await.unwrap();

        let inbox = h.inbox.build_inbox(&ada.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].last_message.is_none());
    }

    #[tokio::test]
    async fn strangers_have_empty_inboxes() {
        let h = TestHarness::builder().build().await.unwrap();
        let inbox = h
            .inbox
            .build_inbox(&UserId("u-nobody".to_string()))
            .await
            .unwrap();
        assert!(inbox.is_empty());
    }
}
