// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User profile rows.

use rusqlite::params;

use partyline_core::ChatError;
use partyline_core::types::{UserId, UserProfile};

use crate::database::Database;

/// Insert or refresh a profile row.
pub async fn upsert_user(db: &Database, profile: &UserProfile) -> Result<(), ChatError> {
    let id = profile.id.0.clone();
    let display_name = profile.display_name.clone();
    let avatar_url = profile.avatar_url.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, display_name, avatar_url) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     display_name = excluded.display_name,
                     avatar_url = excluded.avatar_url",
                params![id, display_name, avatar_url],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_user(db: &Database, id: &UserId) -> Result<Option<UserProfile>, ChatError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, display_name, avatar_url FROM users WHERE id = ?1")?;
            let row = stmt.query_row(params![id], |row| {
                Ok(UserProfile {
                    id: UserId(row.get(0)?),
                    display_name: row.get(1)?,
                    avatar_url: row.get(2)?,
                })
            });
            match row {
                Ok(profile) => Ok(Some(profile)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
