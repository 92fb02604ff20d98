// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migrations embedded at build time.
//!
//! refinery's `embed_migrations!` compiles everything under `migrations/`
//! into the crate, and [`Database::open`](crate::database::Database::open)
//! applies them before handing out the connection, so a fresh file and an
//! up-to-date one go through the same code path.

use partyline_core::ChatError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply any migrations the database has not seen yet.
///
/// Applied versions are tracked in refinery's own `refinery_schema_history`
/// table, which makes reopening an up-to-date database a no-op.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), ChatError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(ChatError::storage)?;
    Ok(())
}
