// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the core storage traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use partyline_config::model::StorageConfig;
use partyline_core::types::{
    ChatId, ChatRecord, Message, ParticipantPair, PostId, PostRef, UserId, UserProfile,
};
use partyline_core::{ChatError, ChatStore, PostStore, ResourceKind, UserDirectory};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for chats, messages, users, and posts.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteStore::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database at the configured path and run migrations.
    pub async fn initialize(&self) -> Result<(), ChatError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ChatError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Checkpoint the WAL so a crash after shutdown loses nothing.
    pub async fn close(&self) -> Result<(), ChatError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, ChatError> {
        self.db.get().ok_or_else(|| ChatError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }

    /// Insert or refresh a user profile row.
    pub async fn upsert_user(&self, profile: &UserProfile) -> Result<(), ChatError> {
        queries::users::upsert_user(self.db()?, profile).await
    }

    /// Insert or refresh a post row. The author row must already exist.
    pub async fn upsert_post(&self, post: &PostRef) -> Result<(), ChatError> {
        queries::posts::upsert_post(self.db()?, post).await
    }
}

#[async_trait]
impl ChatStore for SqliteStore {
    async fn find_or_create(
        &self,
        post_id: Option<&PostId>,
        participants: &ParticipantPair,
    ) -> Result<(ChatRecord, bool), ChatError> {
        queries::chats::find_or_create(self.db()?, post_id, participants).await
    }

    async fn chat_by_id(&self, id: &ChatId) -> Result<Option<ChatRecord>, ChatError> {
        queries::chats::chat_by_id(self.db()?, id).await
    }

    async fn chats_for_user(&self, user_id: &UserId) -> Result<Vec<ChatRecord>, ChatError> {
        queries::chats::chats_for_user(self.db()?, user_id).await
    }

    async fn append_message(
        &self,
        chat_id: &ChatId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<Message, ChatError> {
        queries::messages::append_message(self.db()?, chat_id, sender_id, text)
            .await?
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::Chat,
                id: chat_id.0.clone(),
            })
    }

    async fn messages_for_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, ChatError> {
        queries::messages::messages_for_chat(self.db()?, chat_id).await
    }

    async fn last_message(&self, chat_id: &ChatId) -> Result<Option<Message>, ChatError> {
        queries::messages::last_message(self.db()?, chat_id).await
    }

    async fn purge_idle_chats(&self, cutoff: DateTime<Utc>) -> Result<u64, ChatError> {
        queries::chats::purge_idle_chats(self.db()?, cutoff).await
    }
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, ChatError> {
        queries::users::get_user(self.db()?, id)
            .await?
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::User,
                id: id.0.clone(),
            })
    }
}

#[async_trait]
impl PostStore for SqliteStore {
    async fn get_post(&self, id: &PostId) -> Result<PostRef, ChatError> {
        queries::posts::get_post(self.db()?, id)
            .await?
            .ok_or_else(|| ChatError::NotFound {
                kind: ResourceKind::Post,
                id: id.0.clone(),
            })
    }
}
