// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory post store for deterministic testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use partyline_core::error::{ChatError, ResourceKind};
use partyline_core::traits::PostStore;
use partyline_core::types::{PostId, PostRef};

/// A `PostStore` backed by a plain map.
pub struct MockPosts {
    posts: Mutex<HashMap<PostId, PostRef>>,
}

impl MockPosts {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(HashMap::new()),
        }
    }

    /// Adds or replaces a post.
    pub async fn insert(&self, post: PostRef) {
        self.posts.lock().await.insert(post.id.clone(), post);
    }

    /// Removes a post; subsequent lookups fail with `NotFound`.
    pub async fn remove(&self, id: &PostId) {
        self.posts.lock().await.remove(id);
    }
}

impl Default for MockPosts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MockPosts {
    async fn get_post(&self, id: &PostId) -> Result<PostRef, ChatError> {
        self.posts
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::Post,
                id: id.to_string(),
            })
    }
}
