// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `partyline serve` command implementation.
//!
//! Wires the SQLite store, the chat components, the expiry sweeper and the
//! gateway together, then serves until SIGINT or SIGTERM.

use std::sync::Arc;

use partyline_chat::shutdown;
use partyline_chat::{
    ChatDirectory, ConnectionRegistry, FanoutDispatcher, InboxBuilder, MessageLog, Sweeper,
};
use partyline_config::PartylineConfig;
use partyline_core::error::ChatError;
use partyline_core::traits::{ChatStore, PostStore, UserDirectory};
use partyline_gateway::{GatewayState, ServerConfig};
use partyline_store::SqliteStore;
use tracing::info;

/// Runs the `partyline serve` command.
///
/// The SQLite store backs all three collaborator traits: chats and messages
/// are owned by this service, while the user and post reference tables are
/// kept in sync by the board application.
pub async fn run_serve(config: PartylineConfig) -> Result<(), ChatError> {
    init_tracing(&config.log.level);

    info!("starting partyline serve");

    // Initialize storage.
    let store = {
        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        Arc::new(store)
    };

    let chat_store: Arc<dyn ChatStore> = store.clone();
    let users: Arc<dyn UserDirectory> = store.clone();
    let posts: Arc<dyn PostStore> = store.clone();

    // Wire the chat components.
    let registry = Arc::new(ConnectionRegistry::new());
    let directory = Arc::new(ChatDirectory::new(
        chat_store.clone(),
        users.clone(),
        posts.clone(),
    ));
    let log = MessageLog::new(chat_store.clone(), &config.chat);
    let fanout = Arc::new(FanoutDispatcher::new(
        log,
        registry.clone(),
        chat_store.clone(),
        users,
    ));
    let inbox = Arc::new(InboxBuilder::new(
        directory.clone(),
        chat_store.clone(),
        posts,
    ));

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    // Spawn the expiry sweeper.
    let sweeper = Sweeper::new(chat_store, &config.chat);
    let sweeper_cancel = cancel.clone();
    tokio::spawn(async move {
        sweeper.run(sweeper_cancel).await;
    });
    info!(
        inactivity_window_secs = config.chat.inactivity_window_secs,
        sweep_interval_secs = config.chat.sweep_interval_secs,
        "expiry sweeper started"
    );

    // Serve until the token fires.
    let state = GatewayState::new(
        directory,
        fanout,
        inbox,
        registry,
        config.chat.fanout_buffer,
    );
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    partyline_gateway::start_server(&server_config, state, cancel).await?;

    // Checkpoint the WAL on the way out.
    store.close().await?;

    info!("partyline serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("partyline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
