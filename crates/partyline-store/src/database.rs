// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes; the
//! [`Database`] struct IS the single writer, and query modules go through
//! [`Database::connection`].

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use partyline_core::ChatError;

use crate::migrations;

/// Handle to the SQLite database.
///
/// Wraps a single `tokio_rusqlite::Connection` whose background thread
/// serializes every closure passed to `call`, which eliminates
/// `SQLITE_BUSY` errors under concurrent access.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs, and
    /// run any pending migrations.
    ///
    /// Foreign keys are always enforced; chat expiry relies on
    /// `ON DELETE CASCADE` to drop message logs with their chat.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Database, ChatError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(ChatError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(ChatError::storage)?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(ChatError::storage)?;
                conn.pragma_update(None, "synchronous", "NORMAL")
                    .map_err(ChatError::storage)?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(ChatError::storage)?;
            conn.busy_timeout(Duration::from_secs(5))
                .map_err(ChatError::storage)?;
            migrations::run_migrations(conn)
        })
        .await
        .map_err(ChatError::storage)?;

        debug!(path, wal_mode, "database opened");
        Ok(Database { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the handle. The background thread
    /// exits once the last clone of the connection is dropped.
    pub async fn close(self) -> Result<(), ChatError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into the crate-wide storage error.
pub(crate) fn map_tr_err(err: tokio_rusqlite::Error<rusqlite::Error>) -> ChatError {
    ChatError::Storage {
        source: Box::new(err),
    }
}
