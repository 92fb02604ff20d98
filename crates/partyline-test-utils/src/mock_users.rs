// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory user directory for deterministic testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use partyline_core::error::{ChatError, ResourceKind};
use partyline_core::traits::UserDirectory;
use partyline_core::types::{UserId, UserProfile};

/// A `UserDirectory` backed by a plain map.
///
/// Profiles can be inserted and removed at any point, which makes account
/// deletion mid-conversation trivial to simulate.
pub struct MockUsers {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl MockUsers {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Adds or replaces a profile.
    pub async fn insert(&self, profile: UserProfile) {
        self.users.lock().await.insert(profile.id.clone(), profile);
    }

    /// Removes a profile; subsequent lookups fail with `NotFound`.
    pub async fn remove(&self, id: &UserId) {
        self.users.lock().await.remove(id);
    }

    /// Number of known profiles.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    /// Whether the directory is empty.
    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

impl Default for MockUsers {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MockUsers {
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, ChatError> {
        self.users
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::User,
                id: id.to_string(),
            })
    }
}
