// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat row operations: find-or-create, lookup, listing, and expiry.

use chrono::{DateTime, Utc};
use rusqlite::params;

use partyline_core::ChatError;
use partyline_core::types::{ChatId, ChatRecord, ParticipantPair, PostId, UserId};

use crate::database::Database;
use crate::models::{format_ts, map_chat_row};

const CHAT_COLUMNS: &str =
    "id, post_id, participant_lo, participant_hi, created_at, last_activity_at";

/// Find the chat for `(post_id, participants)` or create it.
///
/// The whole find-then-insert runs inside one `call` closure, so the single
/// writer thread serializes it against every other in-process operation.
/// Should another process sharing the database win an insert race, the
/// unique index on `(COALESCE(post_id,''), participant_lo, participant_hi)`
/// rejects ours and the winner's row is returned instead. Callers therefore
/// never observe a duplicate chat.
pub async fn find_or_create(
    db: &Database,
    post_id: Option<&PostId>,
    participants: &ParticipantPair,
) -> Result<(ChatRecord, bool), ChatError> {
    let post_id = post_id.map(|p| p.0.clone());
    let lo = participants.lo().0.clone();
    let hi = participants.hi().0.clone();
    let fresh_id = ChatId::generate().0;
    let now = format_ts(&Utc::now());

    db.connection()
        .call(move |conn| {
            if let Some(existing) = select_by_key(conn, post_id.as_deref(), &lo, &hi)? {
                return Ok((existing, false));
            }

            let inserted = conn.execute(
                "INSERT INTO chats (id, post_id, participant_lo, participant_hi, created_at, last_activity_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![fresh_id, post_id, lo, hi, now],
            );
            let created = match inserted {
                Ok(_) => true,
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    // An external writer got there first; fall through to
                    // fetch the winning row.
                    false
                }
                Err(e) => return Err(e),
            };

            let Some(record) = select_by_key(conn, post_id.as_deref(), &lo, &hi)? else {
                // Only reachable if an external writer deleted the winning
                // row between our insert attempt and this re-select.
                return Err(rusqlite::Error::QueryReturnedNoRows);
            };
            Ok((record, created))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a chat row by id.
pub async fn chat_by_id(db: &Database, id: &ChatId) -> Result<Option<ChatRecord>, ChatError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], map_chat_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All chats a user participates in, most recent activity first, ties broken
/// by ascending chat id so the order is stable.
pub async fn chats_for_user(db: &Database, user_id: &UserId) -> Result<Vec<ChatRecord>, ChatError> {
    let user_id = user_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHAT_COLUMNS} FROM chats
                 WHERE participant_lo = ?1 OR participant_hi = ?1
                 ORDER BY last_activity_at DESC, id ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], map_chat_row)?;
            let mut chats = Vec::new();
            for row in rows {
                chats.push(row?);
            }
            Ok(chats)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every chat idle since before `cutoff`. Message logs go with their
/// chat via `ON DELETE CASCADE`. Returns the number of chats removed.
pub async fn purge_idle_chats(db: &Database, cutoff: DateTime<Utc>) -> Result<u64, ChatError> {
    let cutoff = format_ts(&cutoff);
    db.connection()
        .call(move |conn| {
            let purged = conn.execute(
                "DELETE FROM chats WHERE last_activity_at < ?1",
                params![cutoff],
            )?;
            Ok(purged as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn select_by_key(
    conn: &rusqlite::Connection,
    post_id: Option<&str>,
    lo: &str,
    hi: &str,
) -> rusqlite::Result<Option<ChatRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHAT_COLUMNS} FROM chats
         WHERE COALESCE(post_id, '') = COALESCE(?1, '')
           AND participant_lo = ?2 AND participant_hi = ?3"
    ))?;
    match stmt.query_row(params![post_id, lo, hi], map_chat_row) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::tempdir;

    use partyline_core::types::UserId;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn pair(a: &str, b: &str) -> ParticipantPair {
        ParticipantPair::new(UserId(a.into()), UserId(b.into())).unwrap()
    }

    #[tokio::test]
    async fn create_then_find_returns_the_same_chat() {
        let (db, _dir) = setup_db().await;
        let post = PostId("p-1".into());
        let participants = pair("u-a", "u-b");

        let (created, was_created) = find_or_create(&db, Some(&post), &participants)
            .await
            .unwrap();
        assert!(was_created);

        let (found, was_created) = find_or_create(&db, Some(&post), &participants)
            .await
            .unwrap();
        assert!(!was_created);
        assert_eq!(created.id, found.id);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn lookup_is_independent_of_participant_order() {
        let (db, _dir) = setup_db().await;
        let post = PostId("p-1".into());

        let (first, _) = find_or_create(&db, Some(&post), &pair("u-b", "u-a"))
            .await
            .unwrap();
        let (second, _) = find_or_create(&db, Some(&post), &pair("u-a", "u-b"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_pair_different_posts_are_distinct_chats() {
        let (db, _dir) = setup_db().await;
        let participants = pair("u-a", "u-b");

        let (on_p1, _) = find_or_create(&db, Some(&PostId("p-1".into())), &participants)
            .await
            .unwrap();
        let (on_p2, _) = find_or_create(&db, Some(&PostId("p-2".into())), &participants)
            .await
            .unwrap();
        assert_ne!(on_p1.id, on_p2.id);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn postless_chats_are_unique_per_pair() {
        let (db, _dir) = setup_db().await;
        let participants = pair("u-a", "u-b");

        let (first, was_created) = find_or_create(&db, None, &participants).await.unwrap();
        assert!(was_created);
        let (second, was_created) = find_or_create(&db, None, &participants).await.unwrap();
        assert!(!was_created);
        assert_eq!(first.id, second.id);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_opens_yield_exactly_one_chat() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("race.db");
        let db = Arc::new(
            Database::open(db_path.to_str().unwrap(), true)
                .await
                .unwrap(),
        );

        let mut handles = Vec::new();
        for _ in 0..10 {
            let db = Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                let participants = pair("u-a", "u-b");
                find_or_create(&db, Some(&PostId("p-1".into())), &participants)
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        let mut creations = 0;
        for handle in handles {
            let (record, was_created) = handle.await.unwrap();
            ids.insert(record.id.0);
            if was_created {
                creations += 1;
            }
        }
        assert_eq!(ids.len(), 1, "all racers must land on one chat");
        assert_eq!(creations, 1, "exactly one call creates the row");
    }

    #[tokio::test]
    async fn chats_for_user_sorted_by_recency_then_id() {
        let (db, _dir) = setup_db().await;

        let (c1, _) = find_or_create(&db, Some(&PostId("p-1".into())), &pair("u-a", "u-b"))
            .await
            .unwrap();
        let (c2, _) = find_or_create(&db, Some(&PostId("p-2".into())), &pair("u-a", "u-c"))
            .await
            .unwrap();
        let (c3, _) = find_or_create(&db, Some(&PostId("p-3".into())), &pair("u-a", "u-d"))
            .await
            .unwrap();

        // Spread activity: c2 most recent, c1 oldest, c3 between.
        for (chat, ts) in [
            (&c1, "2026-01-01T00:00:00.000Z"),
            (&c3, "2026-01-02T00:00:00.000Z"),
            (&c2, "2026-01-03T00:00:00.000Z"),
        ] {
            let id = chat.id.0.clone();
            let ts = ts.to_string();
            db.connection()
                .call(move |conn| -> Result<(), rusqlite::Error> {
                    conn.execute(
                        "UPDATE chats SET last_activity_at = ?1 WHERE id = ?2",
                        params![ts, id],
                    )?;
                    Ok(())
                })
                .await
                .unwrap();
        }

        let chats = chats_for_user(&db, &UserId("u-a".into())).await.unwrap();
        assert_eq!(chats.len(), 3);
        assert_eq!(chats[0].id, c2.id);
        assert_eq!(chats[1].id, c3.id);
        assert_eq!(chats[2].id, c1.id);

        // u-b participates only in c1.
        let chats = chats_for_user(&db, &UserId("u-b".into())).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, c1.id);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn equal_activity_breaks_ties_by_ascending_id() {
        let (db, _dir) = setup_db().await;

        let (c1, _) = find_or_create(&db, Some(&PostId("p-1".into())), &pair("u-a", "u-b"))
            .await
            .unwrap();
        let (c2, _) = find_or_create(&db, Some(&PostId("p-2".into())), &pair("u-a", "u-c"))
            .await
            .unwrap();

        let ts = "2026-01-01T00:00:00.000Z".to_string();
        db.connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("UPDATE chats SET last_activity_at = ?1", params![ts])?;
                Ok(())
            })
            .await
            .unwrap();

        let chats = chats_for_user(&db, &UserId("u-a".into())).await.unwrap();
        let mut expected = [c1.id.0.as_str(), c2.id.0.as_str()];
        expected.sort_unstable();
        assert_eq!(chats[0].id.0, expected[0]);
        assert_eq!(chats[1].id.0, expected[1]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn purge_removes_only_idle_chats() {
        let (db, _dir) = setup_db().await;

        let (stale, _) = find_or_create(&db, Some(&PostId("p-1".into())), &pair("u-a", "u-b"))
            .await
            .unwrap();
        let (fresh, _) = find_or_create(&db, Some(&PostId("p-2".into())), &pair("u-a", "u-c"))
            .await
            .unwrap();

        let stale_id = stale.id.0.clone();
        db.connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "UPDATE chats SET last_activity_at = '2020-01-01T00:00:00.000Z' WHERE id = ?1",
                    params![stale_id],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let cutoff = Utc::now() - chrono::Duration::days(7);
        let purged = purge_idle_chats(&db, cutoff).await.unwrap();
        assert_eq!(purged, 1);

        assert!(chat_by_id(&db, &stale.id).await.unwrap().is_none());
        assert!(chat_by_id(&db, &fresh.id).await.unwrap().is_some());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn purge_cascades_to_the_message_log() {
        let (db, _dir) = setup_db().await;

        let (chat, _) = find_or_create(&db, Some(&PostId("p-1".into())), &pair("u-a", "u-b"))
            .await
            .unwrap();
        crate::queries::messages::append_message(&db, &chat.id, &UserId("u-a".into()), "hi")
            .await
            .unwrap()
            .unwrap();

        let chat_id = chat.id.0.clone();
        db.connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "UPDATE chats SET last_activity_at = '2020-01-01T00:00:00.000Z' WHERE id = ?1",
                    params![chat_id],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let purged = purge_idle_chats(&db, Utc::now() - chrono::Duration::days(7))
            .await
            .unwrap();
        assert_eq!(purged, 1);

        let orphans: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                let count = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
            .unwrap();
        assert_eq!(orphans, 0, "messages must be deleted with their chat");

        db.close().await.unwrap();
    }
}
