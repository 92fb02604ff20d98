// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only contract to the board application's user directory.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::{UserId, UserProfile};

/// Resolves user ids to display data.
///
/// The chat service never creates, mutates, or deletes users; account
/// lifecycle belongs to the board application.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Looks up a user by id.
    ///
    /// Fails with [`ChatError::NotFound`] when the id does not resolve.
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, ChatError>;
}
