// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seed helpers for the SQLite reference tables.
//!
//! The board application owns users and posts; in production their rows
//! arrive out of band. Tests that run the server against the real store
//! (rather than the in-memory mocks) use these to put reference rows in
//! place first.

use partyline_core::error::ChatError;
use partyline_core::types::{PostId, PostRef, UserId, UserProfile};
use partyline_store::SqliteStore;

/// Upserts a user row and returns the profile.
pub async fn seed_user_row(
    store: &SqliteStore,
    id: &str,
    display_name: &str,
) -> Result<UserProfile, ChatError> {
    let profile = UserProfile {
        id: UserId(id.to_string()),
        display_name: display_name.to_string(),
        avatar_url: None,
    };
    store.upsert_user(&profile).await?;
    Ok(profile)
}

/// Upserts a post row and returns the reference. The author row must exist.
pub async fn seed_post_row(
    store: &SqliteStore,
    id: &str,
    title: &str,
    author_id: &str,
) -> Result<PostRef, ChatError> {
    let post = PostRef {
        id: PostId(id.to_string()),
        title: title.to_string(),
        author_id: UserId(author_id.to_string()),
    };
    store.upsert_post(&post).await?;
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use partyline_core::traits::{PostStore, UserDirectory};

    use crate::TestHarness;

    #[tokio::test]
    async fn seeded_rows_resolve_through_the_store_traits() {
        let h = TestHarness::builder().build().await.unwrap();

        seed_user_row(&h.store, "u-ada", "Ada").await.unwrap();
        seed_post_row(&h.store, "p-1", "Climbing partner wanted", "u-ada")
            .await
            .unwrap();

        let user = h
            .store
            .get_user(&UserId("u-ada".to_string()))
            .await
            .unwrap();
        assert_eq!(user.display_name, "Ada");

        let post = h.store.get_post(&PostId("p-1".to_string())).await.unwrap();
        assert_eq!(post.title, "Climbing partner wanted");
        assert_eq!(post.author_id.0, "u-ada");
    }
}
