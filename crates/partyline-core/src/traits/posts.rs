// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only contract to the board application's post catalog.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::{PostId, PostRef};

/// Resolves post ids to title and authorship.
///
/// Posts are the matchmaking board's ads ("looking for a climbing
/// partner"); every product-flow chat hangs off one.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Looks up a post by id.
    ///
    /// Fails with [`ChatError::NotFound`] when the id does not resolve.
    async fn get_post(&self, id: &PostId) -> Result<PostRef, ChatError>;
}
