// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `partyline sweep` command implementation.
//!
//! Runs one expiry pass against the configured database and prints the
//! number of purged chats. Useful for deployments that prefer an external
//! scheduler over the in-process sweeper.

use std::sync::Arc;

use partyline_chat::Sweeper;
use partyline_config::PartylineConfig;
use partyline_core::error::ChatError;
use partyline_core::traits::ChatStore;
use partyline_store::SqliteStore;

use crate::serve::init_tracing;

/// Runs the `partyline sweep` command.
pub async fn run_sweep(config: PartylineConfig) -> Result<(), ChatError> {
    init_tracing(&config.log.level);

    let store = {
        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        Arc::new(store)
    };

    let chat_store: Arc<dyn ChatStore> = store.clone();
    let sweeper = Sweeper::new(chat_store, &config.chat);
    let purged = sweeper.purge_expired().await?;
    println!("purged {purged} idle chats");

    store.close().await?;
    Ok(())
}
