// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end chat testing.
//!
//! `TestHarness` assembles the full chat stack over a temp SQLite database:
//! real store, mock user directory and post store, connection registry, and
//! the directory/log/fanout/inbox components wired the same way the server
//! wires them.

use std::sync::Arc;

use partyline_chat::{
    ChatDirectory, ConnectionRegistry, FanoutDispatcher, InboxBuilder, MessageLog,
};
use partyline_config::model::{ChatConfig, PartylineConfig, StorageConfig};
use partyline_core::error::ChatError;
use partyline_core::events::ChatEvent;
use partyline_core::traits::{ChatStore, PostStore, UserDirectory};
use partyline_core::types::{PostId, PostRef, UserId, UserProfile};
use partyline_store::SqliteStore;
use tokio::sync::mpsc;

use crate::mock_posts::MockPosts;
use crate::mock_users::MockUsers;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    chat: Option<ChatConfig>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self { chat: None }
    }

    /// Overrides the chat behavior settings (limits, expiry windows).
    pub fn with_chat_config(mut self, chat: ChatConfig) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Builds the test harness, creating all required components.
    pub async fn build(self) -> Result<TestHarness, ChatError> {
        // Temp directory for SQLite, kept alive for the harness lifetime.
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| ChatError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("partyline.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let store = SqliteStore::new(storage_config.clone());
        store.initialize().await?;
        let store = Arc::new(store);

        let users = Arc::new(MockUsers::new());
        let posts = Arc::new(MockPosts::new());
        let registry = Arc::new(ConnectionRegistry::new());

        let chat_config = self.chat.unwrap_or_default();
        let chat_store: Arc<dyn ChatStore> = store.clone();
        let user_directory: Arc<dyn UserDirectory> = users.clone();
        let post_store: Arc<dyn PostStore> = posts.clone();

        let directory = Arc::new(ChatDirectory::new(
            chat_store.clone(),
            user_directory.clone(),
            post_store.clone(),
        ));
        let log = MessageLog::new(chat_store.clone(), &chat_config);
        let fanout = FanoutDispatcher::new(
            log.clone(),
            registry.clone(),
            chat_store.clone(),
            user_directory,
        );
        let inbox = InboxBuilder::new(directory.clone(), chat_store, post_store);

        let config = PartylineConfig {
            storage: storage_config,
            chat: chat_config,
            ..PartylineConfig::default()
        };

        Ok(TestHarness {
            store,
            users,
            posts,
            registry,
            directory,
            log,
            fanout,
            inbox,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete chat environment over a temp database.
///
/// All components are public for direct driving and assertion; `seed_user`,
/// `seed_post`, and `attach` cover the common setup moves.
pub struct TestHarness {
    /// The real SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteStore>,
    /// Mock user directory serving the `UserDirectory` seam.
    pub users: Arc<MockUsers>,
    /// Mock post store serving the `PostStore` seam.
    pub posts: Arc<MockPosts>,
    /// Connection registry for subscriptions and fan-out.
    pub registry: Arc<ConnectionRegistry>,
    /// Chat directory (open-or-create, hydration).
    pub directory: Arc<ChatDirectory>,
    /// Validated message log access.
    pub log: MessageLog,
    /// Send pipeline: append + publish.
    pub fanout: FanoutDispatcher,
    /// Inbox builder for conversation lists.
    pub inbox: InboxBuilder,
    /// The configuration the components were built from.
    pub config: PartylineConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Creates a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Registers a user in the mock directory and returns the profile.
    pub async fn seed_user(&self, id: &str, display_name: &str) -> UserProfile {
        let profile = UserProfile {
            id: UserId(id.to_string()),
            display_name: display_name.to_string(),
            avatar_url: None,
        };
        self.users.insert(profile.clone()).await;
        profile
    }

    /// Registers a post in the mock store and returns the reference.
    pub async fn seed_post(&self, id: &str, title: &str, author_id: &str) -> PostRef {
        let post = PostRef {
            id: PostId(id.to_string()),
            title: title.to_string(),
            author_id: UserId(author_id.to_string()),
        };
        self.posts.insert(post.clone()).await;
        post
    }

    /// Registers a connection with the registry and returns the receiving
    /// end of its outbound event queue.
    pub fn attach(&self, conn_id: &str, capacity: usize) -> mpsc::Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel(capacity);
        self.registry.register(conn_id, tx);
        rx
    }
}
