// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message log operations. The log is append-only; rows are never updated
//! or deleted individually, only dropped wholesale when their chat expires.

use rusqlite::params;

use partyline_core::ChatError;
use partyline_core::types::{ChatId, Message, MessageId, UserId};

use crate::database::Database;
use crate::models::{format_ts, map_message_row, parse_ts};

const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, seq, text, timestamp, is_read";

/// Append a message and advance the chat's `last_activity_at`, both inside
/// one transaction so no reader can observe the message without the bumped
/// activity (or the reverse).
///
/// The assigned timestamp is clamped to `max(now, last_activity_at)`, which
/// keeps the log's timestamps non-decreasing even if the wall clock steps
/// backwards between appends. `seq` records true append order regardless.
///
/// Returns `Ok(None)` when the chat row does not exist (deleted by the
/// expiry sweep, say); permission checks happen in the caller.
pub async fn append_message(
    db: &Database,
    chat_id: &ChatId,
    sender_id: &UserId,
    text: &str,
) -> Result<Option<Message>, ChatError> {
    let chat_id = chat_id.0.clone();
    let sender_id = sender_id.0.clone();
    let text = text.to_string();
    let message_id = MessageId::generate().0;
    let now = format_ts(&chrono::Utc::now());

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let last_activity: String = match tx.query_row(
                "SELECT last_activity_at FROM chats WHERE id = ?1",
                params![chat_id],
                |row| row.get(0),
            ) {
                Ok(ts) => ts,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e),
            };

            // RFC 3339 with fixed precision sorts chronologically, so the
            // clamp is a plain string comparison.
            let ts = if now > last_activity { now } else { last_activity };

            let seq: i64 = tx.query_row(
                "SELECT COALESCE(MAX(seq), 0) + 1 FROM messages WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO messages (id, chat_id, sender_id, seq, text, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![message_id, chat_id, sender_id, seq, text, ts],
            )?;
            tx.execute(
                "UPDATE chats SET last_activity_at = ?1 WHERE id = ?2",
                params![ts, chat_id],
            )?;
            tx.commit()?;

            let timestamp = parse_ts(5, ts)?;
            Ok(Some(Message {
                id: MessageId(message_id),
                chat_id: ChatId(chat_id),
                sender_id: UserId(sender_id),
                text,
                seq,
                timestamp,
                is_read: false,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Full log for a chat in append order.
pub async fn messages_for_chat(db: &Database, chat_id: &ChatId) -> Result<Vec<Message>, ChatError> {
    let chat_id = chat_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE chat_id = ?1 ORDER BY seq ASC"
            ))?;
            let rows = stmt.query_map(params![chat_id], map_message_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recently appended message, if any.
pub async fn last_message(db: &Database, chat_id: &ChatId) -> Result<Option<Message>, ChatError> {
    let chat_id = chat_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE chat_id = ?1 ORDER BY seq DESC LIMIT 1"
            ))?;
            match stmt.query_row(params![chat_id], map_message_row) {
                Ok(message) => Ok(Some(message)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
